//! `dino rebuild` command implementation.

use clap::Args;
use dino_config::Config;

use super::{finish, open_pipeline};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the rebuild command.
#[derive(Args)]
pub(crate) struct RebuildArgs {
    /// Materialize into the output directory without publishing.
    #[arg(long)]
    no_publish: bool,
}

impl RebuildArgs {
    pub(crate) async fn execute(self, config: &Config) -> Result<(), CliError> {
        let output = Output::new();
        let mut pipeline = open_pipeline(config).await?;
        output.highlight(&format!("Rebuilding {}", config.feed.title));

        let artifacts = match pipeline.materialize().await {
            Ok(artifacts) => artifacts,
            Err(err) => {
                pipeline.teardown().await?;
                return Err(err.into());
            }
        };

        if self.no_publish {
            output.success(&format!(
                "Wrote {} files to {}",
                artifacts.len(),
                artifacts.root().display()
            ));
            pipeline.teardown().await?;
            return Ok(());
        }

        let result = pipeline.publish(&artifacts).await.map(|()| artifacts);
        finish(pipeline, result).await
    }
}
