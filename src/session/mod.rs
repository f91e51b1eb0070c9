//! Recording and playback session controllers
//!
//! Each controller owns one capability device at a time and is the
//! single writer of its own session state; periodic ticks and
//! user-triggered transitions never run concurrently.

mod player;
mod recorder;

pub use player::{PlayerController, PlayerState};
pub use recorder::{AmplitudeWindow, RecorderController, RecorderState};
