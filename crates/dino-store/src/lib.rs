//! Durable post log for the dino feed pipeline.
//!
//! Posts are appended to a single SQLite table and read back newest first.
//! The store never edits or deletes a post, and ids come from an
//! `AUTOINCREMENT` column so they are never reused. That id is what keys each
//! rendered page (`<id>.html`), so it must stay stable for the store's lifetime.
//!
//! # Connection ownership
//!
//! - [`PostStore::connect`] opens its own pool and closes it in [`PostStore::close`].
//! - [`PostStore::with_pool`] borrows a caller-supplied pool and leaves it open.
//!
//! # Example
//!
//! ```ignore
//! use dino_store::{DEFAULT_WINDOW, PostStore};
//!
//! let store = PostStore::connect("sqlite::memory:").await?;
//! let id = store.append("hello", None, None).await?;
//! let posts = store.recent(DEFAULT_WINDOW).await?;
//! assert_eq!(posts[0].id, id);
//! ```

mod error;
mod post;
mod store;

pub use error::StoreError;
pub use post::{Enclosure, Post, format_timestamp};
pub use store::{DEFAULT_WINDOW, PostStore};
