//! Page rendering and RSS assembly for the dino feed pipeline.
//!
//! Both halves are pure: they read [`FeedMetadata`] and a slice of
//! [`Post`](dino_store::Post)s and return text. Writing the results anywhere
//! is the pipeline's job.
//!
//! - [`Renderer`] turns one post into one HTML page through a `minijinja`
//!   template ([`DEFAULT_TEMPLATE`] unless overridden).
//! - [`assemble`] builds the RSS 2.0 channel for the recent-posts window.

mod assemble;
mod metadata;
mod template;

pub use assemble::{FeedDocument, assemble, assemble_at};
pub use metadata::{DEFAULT_FEED_FILENAME, FeedMetadata, page_name};
pub use template::{DEFAULT_TEMPLATE, IMAGE_MEDIA_TYPES, PageContext, RenderError, Renderer};
