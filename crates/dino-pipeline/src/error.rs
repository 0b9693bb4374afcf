//! Pipeline error type.

use std::io;

use dino_feed::RenderError;
use dino_publish::{ArtifactSet, PublishError};
use dino_store::StoreError;

/// Error returned by [`Pipeline`](crate::Pipeline) operations.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Rejected before anything was persisted.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Media type could not be detected or has no known extension.
    #[error("Unsupported media type: {0}; pass both media type and extension explicitly")]
    UnsupportedMediaType(String),

    #[error("Storage error: {0}")]
    Storage(#[source] StoreError),

    #[error(transparent)]
    Template(#[from] RenderError),

    #[error("Feed serialization error: {0}")]
    Feed(#[from] rss::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The artifacts were materialized but the backend failed. The post is
    /// already stored; `artifacts` can be handed to the publisher again.
    #[error("Publishing via {backend} failed: {source}")]
    Publication {
        backend: &'static str,
        source: PublishError,
        artifacts: Box<ArtifactSet>,
    },
}

impl From<StoreError> for PipelineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidInput(msg) => Self::InvalidInput(msg),
            other => Self::Storage(other),
        }
    }
}
