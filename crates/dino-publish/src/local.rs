//! Local staging publisher.

use crate::artifact::ArtifactSet;
use crate::publisher::{PublishError, Publisher};

/// Publisher for setups where the staging directory is served directly.
///
/// Artifacts are already in place once materialized, so publishing only
/// checks that each one exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalPublisher;

impl Publisher for LocalPublisher {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn publish(&self, artifacts: &ArtifactSet) -> Result<(), PublishError> {
        for artifact in artifacts {
            let path = artifacts.path_of(artifact);
            if !path.is_file() {
                return Err(PublishError::Missing(path));
            }
        }
        tracing::debug!(
            root = %artifacts.root().display(),
            count = artifacts.len(),
            "Artifacts present in staging area"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::artifact::Artifact;

    #[tokio::test]
    async fn test_publish_confirms_present_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("1.html"), "<html></html>").unwrap();
        fs::write(temp_dir.path().join("rss.xml"), "<rss/>").unwrap();

        let mut set = ArtifactSet::new(temp_dir.path());
        set.push(Artifact::new("1.html", b"<html></html>".to_vec(), "text/html"));
        set.push(Artifact::new("rss.xml", b"<rss/>".to_vec(), "application/rss+xml"));

        LocalPublisher.publish(&set).await.unwrap();
    }

    #[tokio::test]
    async fn test_publish_reports_missing_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let mut set = ArtifactSet::new(temp_dir.path());
        set.push(Artifact::new("1.html", b"<html></html>".to_vec(), "text/html"));

        let err = LocalPublisher.publish(&set).await.unwrap_err();

        assert!(matches!(err, PublishError::Missing(path) if path == temp_dir.path().join("1.html")));
    }

    #[tokio::test]
    async fn test_publish_empty_set() {
        let temp_dir = TempDir::new().unwrap();
        LocalPublisher
            .publish(&ArtifactSet::new(temp_dir.path()))
            .await
            .unwrap();
    }
}
