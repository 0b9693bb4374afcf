//! S3 publishing.

use std::error::Error;

use aws_sdk_s3::Client;
use aws_sdk_s3::config::Credentials;

use crate::artifact::ArtifactSet;
use crate::publisher::{PublishError, Publisher};

/// Static access key pair. Without one the default AWS credential chain is used.
#[derive(Clone)]
pub struct S3Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl std::fmt::Debug for S3Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Configuration for S3 publishing.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// S3 bucket name.
    pub bucket: String,
    /// AWS region.
    pub region: String,
    /// S3-compatible endpoint URL.
    pub endpoint: Option<String>,
    /// Optional key prefix within the bucket.
    pub root_path: Option<String>,
    /// Optional static credentials.
    pub credentials: Option<S3Credentials>,
}

/// Uploads every artifact to S3 under its file name.
///
/// Existing objects with the same key are overwritten. The first failed
/// upload aborts the rest; objects uploaded before it stay in place.
#[derive(Debug)]
pub struct S3Publisher {
    config: S3Config,
}

impl S3Publisher {
    #[must_use]
    pub fn new(config: S3Config) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &S3Config {
        &self.config
    }

    async fn build_client(&self) -> Client {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(self.config.region.clone()));

        if let Some(endpoint) = &self.config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        if let Some(credentials) = &self.config.credentials {
            loader = loader.credentials_provider(Credentials::new(
                credentials.access_key.clone(),
                credentials.secret_key.clone(),
                None,
                None,
                "dino-config",
            ));
        }

        let sdk_config = loader.load().await;

        // Custom endpoints (LocalStack, MinIO) need path-style addressing
        // (endpoint/bucket/key) instead of virtual-hosted-style (bucket.endpoint/key).
        if self.config.endpoint.is_some() {
            let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
                .force_path_style(true)
                .build();
            return Client::from_conf(s3_config);
        }

        Client::new(&sdk_config)
    }

    fn build_key(&self, name: &str) -> String {
        match &self.config.root_path {
            Some(root) => format!("{}/{name}", root.trim_end_matches('/')),
            None => name.to_owned(),
        }
    }
}

impl Publisher for S3Publisher {
    fn name(&self) -> &'static str {
        "s3"
    }

    async fn publish(&self, artifacts: &ArtifactSet) -> Result<(), PublishError> {
        let client = self.build_client().await;

        for artifact in artifacts {
            let key = self.build_key(artifact.name());

            client
                .put_object()
                .bucket(&self.config.bucket)
                .key(&key)
                .body(artifact.contents().to_vec().into())
                .content_type(artifact.content_type())
                .send()
                .await
                .map_err(|e| PublishError::S3(error_chain(&e)))?;

            tracing::debug!(bucket = %self.config.bucket, key = %key, "Uploaded");
        }

        Ok(())
    }
}

/// Walk the error source chain and join all messages.
fn error_chain(err: &dyn Error) -> String {
    let mut msgs = vec![err.to_string()];
    let mut source = err.source();
    while let Some(s) = source {
        msgs.push(s.to_string());
        source = s.source();
    }
    msgs.join(": ")
}
