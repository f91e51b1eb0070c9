//! CLI argument definitions using clap

use clap::{Parser, Subcommand};

/// memovox - Record, browse, and play back voice memos
#[derive(Parser, Debug)]
#[command(name = "memovox")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a new voice memo interactively
    Record {
        /// Title applied when the memo is saved
        #[arg(short, long)]
        title: Option<String>,
    },

    /// List memos found in the memos directory
    List {
        /// Maximum number of memos to show
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Filter memos by title substring
        #[arg(short, long)]
        search: Option<String>,

        /// Emit the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play a memo with a progress readout
    Play {
        /// Memo ID or partial ID
        id: String,
    },

    /// Rename a memo, preserving its file extension
    Rename {
        /// Memo ID or partial ID
        id: String,

        /// New title
        title: String,
    },

    /// Delete a memo from disk
    Delete {
        /// Memo ID or partial ID
        id: String,
    },

    /// Launch the interactive TUI
    Tui,

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
