//! memovox - Voice-memo recording and playback in the terminal
//!
//! Entry point for the memovox CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use memovox::cli::{Cli, Commands};
use memovox::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG overrides the verbosity flag
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Completions { shell } => {
            memovox::cli::completions::print(shell);
        }
        command => {
            // Load configuration only for runtime commands.
            let settings = Settings::load()?;

            match command {
                Commands::Record { title } => {
                    memovox::cli::commands::record_memo(&settings, title).await?;
                }
                Commands::List {
                    limit,
                    search,
                    json,
                } => {
                    memovox::cli::commands::list_memos(&settings, limit, search, json)?;
                }
                Commands::Play { id } => {
                    memovox::cli::commands::play_memo(&settings, &id).await?;
                }
                Commands::Rename { id, title } => {
                    memovox::cli::commands::rename_memo(&settings, &id, &title)?;
                }
                Commands::Delete { id } => {
                    memovox::cli::commands::delete_memo(&settings, &id)?;
                }
                Commands::Tui => {
                    memovox::tui::run(&settings).await?;
                }
                Commands::Config(config_cmd) => {
                    memovox::cli::commands::config_command(&settings, config_cmd)?;
                }
                Commands::Completions { .. } => unreachable!(),
            }
        }
    }

    Ok(())
}
