//! TUI screens

mod browser;
mod playback;
mod record;

pub use browser::BrowserScreen;
pub use playback::PlaybackScreen;
pub use record::{RecordOutcome, RecordScreen};
