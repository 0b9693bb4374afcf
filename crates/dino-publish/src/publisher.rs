//! Publication capability.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::artifact::ArtifactSet;

/// Error returned by a [`Publisher`].
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Artifact missing from staging area: {}", .0.display())]
    Missing(PathBuf),
    #[error("S3 error: {0}")]
    S3(String),
    #[error("Publish rejected: {0}")]
    Rejected(String),
}

/// Makes a materialized [`ArtifactSet`] externally visible.
///
/// Publishing the same set twice must be safe: every update regenerates the
/// feed and all recent pages and publishes them again.
pub trait Publisher: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    /// Publish every artifact in `artifacts`.
    fn publish(
        &self,
        artifacts: &ArtifactSet,
    ) -> impl Future<Output = Result<(), PublishError>> + Send;
}

impl<T: Publisher> Publisher for &T {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn publish(
        &self,
        artifacts: &ArtifactSet,
    ) -> impl Future<Output = Result<(), PublishError>> + Send {
        (**self).publish(artifacts)
    }
}

impl<T: Publisher> Publisher for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn publish(
        &self,
        artifacts: &ArtifactSet,
    ) -> impl Future<Output = Result<(), PublishError>> + Send {
        (**self).publish(artifacts)
    }
}
