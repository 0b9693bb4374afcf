//! `dino post` command implementation.

use std::path::PathBuf;

use clap::Args;
use dino_config::Config;

use super::{finish, open_pipeline};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the post command.
#[derive(Args)]
pub(crate) struct PostArgs {
    /// Post text. Used as the item title and description.
    text: String,

    /// Media file to attach as the item enclosure.
    #[arg(short, long)]
    media: Option<PathBuf>,

    /// Media type of the attached file (detected for PNG, GIF and JPEG).
    #[arg(long, requires = "media")]
    media_type: Option<String>,

    /// File extension for the attached file, without the dot.
    #[arg(long, requires = "media")]
    ext: Option<String>,
}

impl PostArgs {
    pub(crate) async fn execute(self, config: &Config) -> Result<(), CliError> {
        let output = Output::new();
        let media = self
            .media
            .as_ref()
            .map(|path| {
                std::fs::read(path).map_err(|source| CliError::Media {
                    path: path.clone(),
                    source,
                })
            })
            .transpose()?;

        let mut pipeline = open_pipeline(config).await?;
        output.highlight(&format!("Posting to {}", config.feed.title));

        let result = match &media {
            Some(bytes) => {
                pipeline
                    .update_with_media(
                        &self.text,
                        bytes,
                        self.media_type.as_deref(),
                        self.ext.as_deref(),
                    )
                    .await
            }
            None => pipeline.update(&self.text).await,
        };

        finish(pipeline, result).await
    }
}
