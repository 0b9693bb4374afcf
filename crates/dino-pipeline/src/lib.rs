//! Ingest, materialize and publish pipeline for dino feeds.
//!
//! [`Pipeline`] owns a [`PostStore`](dino_store::PostStore), the feed
//! metadata and a staging directory, and drives one update cycle:
//!
//! ```text
//! update(text) ──► append ──► materialize ──► publish ──► ArtifactSet
//!                   │            │               │
//!                   │            │               └─► Publisher (local / S3)
//!                   │            ├─► Renderer × recent posts ──► <id>.html
//!                   │            └─► assemble ──► rss.xml
//!                   └─► PostStore (SQLite)
//! ```
//!
//! Every step runs to completion before the next starts; nothing is spawned.
//! A failed publication does not roll back the stored post.

mod error;
mod media;
mod pipeline;
mod staging;

pub use error::PipelineError;
pub use media::{Detection, MediaKind, ResolvedMedia, detect, resolve};
pub use pipeline::{Phase, Pipeline, PipelineOptions};
pub use staging::StagingDir;
