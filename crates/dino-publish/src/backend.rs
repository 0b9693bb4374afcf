//! Closed set of publication backends.

use crate::artifact::ArtifactSet;
use crate::local::LocalPublisher;
use crate::publisher::{PublishError, Publisher};
use crate::s3::S3Publisher;

/// Publication backend selected from configuration.
#[derive(Debug)]
pub enum Backend {
    Local(LocalPublisher),
    S3(S3Publisher),
}

impl From<LocalPublisher> for Backend {
    fn from(publisher: LocalPublisher) -> Self {
        Self::Local(publisher)
    }
}

impl From<S3Publisher> for Backend {
    fn from(publisher: S3Publisher) -> Self {
        Self::S3(publisher)
    }
}

impl Publisher for Backend {
    fn name(&self) -> &'static str {
        match self {
            Self::Local(p) => p.name(),
            Self::S3(p) => p.name(),
        }
    }

    async fn publish(&self, artifacts: &ArtifactSet) -> Result<(), PublishError> {
        match self {
            Self::Local(p) => p.publish(artifacts).await,
            Self::S3(p) => p.publish(artifacts).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::s3::S3Config;

    #[test]
    fn test_name_follows_variant() {
        let local = Backend::from(LocalPublisher);
        let s3 = Backend::from(S3Publisher::new(S3Config {
            bucket: "b".to_owned(),
            region: "us-east-1".to_owned(),
            endpoint: None,
            root_path: None,
            credentials: None,
        }));

        assert_eq!(local.name(), "local");
        assert_eq!(s3.name(), "s3");
    }

    #[tokio::test]
    async fn test_local_variant_delegates() {
        let temp_dir = TempDir::new().unwrap();
        let backend = Backend::Local(LocalPublisher);

        backend
            .publish(&ArtifactSet::new(temp_dir.path()))
            .await
            .unwrap();
    }
}
