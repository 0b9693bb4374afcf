//! `dino list` command implementation.

use clap::Args;
use dino_config::Config;
use dino_store::PostStore;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the list command.
#[derive(Args)]
pub(crate) struct ListArgs {
    /// Maximum number of posts to show.
    #[arg(short = 'n', long, default_value_t = 10)]
    limit: u32,
}

impl ListArgs {
    pub(crate) async fn execute(self, config: &Config) -> Result<(), CliError> {
        let output = Output::new();
        let store = PostStore::connect(&config.store.url).await?;

        let total = store.count().await?;
        let posts = store.recent(self.limit).await?;
        output.highlight(&format!(
            "{} ({} of {total} posts)",
            config.feed.title,
            posts.len()
        ));

        for post in &posts {
            output.info(&format!("#{} {} {}", post.id, post.timestamp(), post.text));
            if let Some(enclosure) = &post.enclosure {
                output.detail(&format!("{} ({})", enclosure.url, enclosure.media_type));
            }
        }

        store.close().await;
        Ok(())
    }
}
