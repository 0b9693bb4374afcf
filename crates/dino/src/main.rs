//! dino CLI - publish short posts as an RSS feed.
//!
//! Provides commands for:
//! - `post`: Store a post (optionally with media) and republish the feed
//! - `rebuild`: Re-render the recent window and republish without a new post
//! - `list`: Show stored posts, newest first

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dino_config::CliSettings;
use tracing_subscriber::EnvFilter;

use commands::{ListArgs, PostArgs, RebuildArgs};
use error::CliError;
use output::Output;

/// dino - post-to-RSS feed publisher.
#[derive(Parser)]
#[command(name = "dino", version, about)]
struct Cli {
    /// Path to dino.toml (searched for in parent directories by default).
    #[arg(short, long, global = true, env = "DINO_CONFIG")]
    config: Option<PathBuf>,

    /// Override the post store URL.
    #[arg(long, global = true)]
    store_url: Option<String>,

    /// Override the output directory.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Enable verbose output (show INFO logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a post and republish the feed.
    Post(PostArgs),
    /// Re-render recent posts and republish the feed.
    Rebuild(RebuildArgs),
    /// List stored posts.
    List(ListArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = CliSettings {
        store_url: cli.store_url,
        output_dir: cli.output_dir,
    };
    let config = dino_config::Config::load(cli.config.as_deref(), Some(&settings))?;
    tracing::debug!(path = ?config.config_path, "Loaded configuration");

    let rt = tokio::runtime::Runtime::new()?;
    match cli.command {
        Commands::Post(args) => rt.block_on(args.execute(&config)),
        Commands::Rebuild(args) => rt.block_on(args.execute(&config)),
        Commands::List(args) => rt.block_on(args.execute(&config)),
    }
}
