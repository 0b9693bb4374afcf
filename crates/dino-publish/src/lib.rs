//! Artifact sets and publication backends for the dino feed pipeline.
//!
//! A materialization pass produces an [`ArtifactSet`]: the staged media file
//! (if any), one page per recent post, and the RSS document, all written under
//! a staging root. A [`Publisher`] makes that set publicly reachable.
//!
//! # Backends
//!
//! - [`LocalPublisher`]: the staging root is the public location; publishing
//!   only confirms every artifact is in place.
//! - [`S3Publisher`]: uploads each artifact under its file name.
//! - [`Backend`]: closed set of the above, picked from configuration.
//! - [`MemoryPublisher`]: records publishes for tests (behind the `mock` feature).

mod artifact;
mod backend;
mod local;
#[cfg(feature = "mock")]
mod mock;
mod publisher;
mod s3;

pub use artifact::{Artifact, ArtifactSet, content_type_for};
pub use backend::Backend;
pub use local::LocalPublisher;
#[cfg(feature = "mock")]
pub use mock::MemoryPublisher;
pub use publisher::{PublishError, Publisher};
pub use s3::{S3Config, S3Credentials, S3Publisher};
