//! memovox - A terminal voice-memo recorder with waveform playback
//!
//! Record memos from the microphone, browse the ones already on disk,
//! and play them back with a waveform scrubber.

pub mod audio;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod session;
pub mod tui;
pub mod waveform;

use thiserror::Error;

/// Main error type for memovox
#[derive(Error, Debug)]
pub enum MemovoxError {
    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, MemovoxError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "memovox";
