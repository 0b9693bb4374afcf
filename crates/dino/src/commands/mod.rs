//! CLI command implementations.

mod list;
mod post;
mod rebuild;

use dino_config::{BackendKind, Config};
use dino_feed::FeedMetadata;
use dino_pipeline::{Pipeline, PipelineError, PipelineOptions};
use dino_publish::{
    ArtifactSet, Backend, LocalPublisher, Publisher, S3Config, S3Credentials, S3Publisher,
};
use dino_store::PostStore;

pub(crate) use list::ListArgs;
pub(crate) use post::PostArgs;
pub(crate) use rebuild::RebuildArgs;

use crate::error::CliError;
use crate::output::Output;

/// Build the feed metadata from `[feed]`, reading the template file if set.
fn feed_metadata(config: &Config) -> Result<FeedMetadata, CliError> {
    let feed = &config.feed;
    let mut metadata = FeedMetadata::new(
        feed.title.as_str(),
        feed.link.as_str(),
        feed.description.as_str(),
        feed.base_url.as_str(),
    )
    .with_feed_filename(feed.filename.as_str());
    if let Some(template) = config.read_template()? {
        metadata = metadata.with_template(template);
    }
    Ok(metadata)
}

/// Build the configured publication backend.
fn backend(config: &Config) -> Result<Backend, CliError> {
    match config.publish.backend {
        BackendKind::Local => Ok(LocalPublisher.into()),
        BackendKind::S3 => {
            let s3 = config.require_s3()?;
            let credentials = s3.credentials().map(|(access_key, secret_key)| S3Credentials {
                access_key: access_key.to_owned(),
                secret_key: secret_key.to_owned(),
            });
            Ok(S3Publisher::new(S3Config {
                bucket: s3.bucket.clone(),
                region: s3.region.clone(),
                endpoint: s3.endpoint.clone(),
                root_path: s3.root_path.clone(),
                credentials,
            })
            .into())
        }
    }
}

/// Open the store and assemble a pipeline from `config`.
async fn open_pipeline(config: &Config) -> Result<Pipeline<Backend>, CliError> {
    let output = Output::new();
    if config.publish.backend == BackendKind::Local && config.output.dir.is_none() {
        output.warning(
            "Local backend without [output] dir: files are written to a temporary directory and removed on exit",
        );
    }

    let metadata = feed_metadata(config)?;
    let publisher = backend(config)?;
    let store = PostStore::connect(&config.store.url).await?;
    let options = PipelineOptions {
        window: config.feed.window,
        staging_dir: config.output.dir.clone(),
    };
    Ok(Pipeline::new(store, metadata, publisher, options)?)
}

/// Recovery advice after a failed publication.
///
/// `dino rebuild` picks media up from the staging directory, so it only
/// recovers attachments when that directory outlives the process.
fn publication_hint(temporary_staging: bool) -> &'static str {
    if temporary_staging {
        "Post is saved, but staged media was in a temporary directory and is discarded; \
         set [output] dir (or --output-dir) so `dino rebuild` can republish attachments"
    } else {
        "Post is saved; run `dino rebuild` to retry publishing"
    }
}

/// Tear the pipeline down and report the outcome of a publishing command.
async fn finish(
    pipeline: Pipeline<Backend>,
    result: Result<ArtifactSet, PipelineError>,
) -> Result<(), CliError> {
    let output = Output::new();
    let feed_url = pipeline.metadata().feed_url();
    let backend = pipeline.publisher().name();
    let temporary_staging = pipeline.owns_staging_dir();

    let outcome = match result {
        Ok(artifacts) => {
            output.success(&format!(
                "Published {} files via {backend}",
                artifacts.len()
            ));
            for name in artifacts.names() {
                output.detail(name);
            }
            output.info(&format!("Feed: {feed_url}"));
            Ok(())
        }
        Err(err @ PipelineError::Publication { .. }) => {
            output.warning(publication_hint(temporary_staging));
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    };

    pipeline.teardown().await?;
    outcome
}
