//! CLI error types.

use dino_config::ConfigError;
use dino_pipeline::PipelineError;
use dino_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("Failed to read media file {}: {source}", path.display())]
    Media {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}
