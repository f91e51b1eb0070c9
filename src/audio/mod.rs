//! Audio capability layer for memovox
//!
//! Wraps the platform capture and playback devices behind traits so
//! the session controllers can be driven by fakes in tests.

mod amplitudes;
mod capture;
mod playback;
mod probe;

pub use amplitudes::extract_amplitudes;
pub use capture::CpalCapture;
pub use playback::RodioPlayback;
pub use probe::probe_duration_ms;

use anyhow::Result;
use std::path::Path;

/// Microphone-to-file encoder.
///
/// At most one device is captured at a time; the recorder controller
/// enforces this by owning a single instance per session.
pub trait CaptureDevice {
    /// Prepare the device and start writing to `output_path`.
    /// Fails if the device cannot be configured; there is no retry.
    fn start(&mut self, output_path: &Path) -> Result<()>;

    /// Suspend capture without finalizing the file
    fn pause(&mut self) -> Result<()>;

    /// Resume a paused capture
    fn resume(&mut self) -> Result<()>;

    /// Finalize the output file and release the device
    fn stop(&mut self) -> Result<()>;

    /// Instantaneous amplitude on a 0-100 scale, 0 when idle.
    /// Reports the peak observed since the previous read.
    fn current_amplitude(&self) -> u16;

    /// Backend name for logging
    fn backend_name(&self) -> &'static str;
}

/// File-to-speaker decoder/player with seek support
pub trait PlaybackDevice {
    /// Attach a source file. Fails if the file is missing or the
    /// format is unsupported.
    fn load(&mut self, path: &Path) -> Result<()>;

    /// Total duration of the loaded source in milliseconds
    fn duration_ms(&self) -> u64;

    /// Current playback position in milliseconds
    fn position_ms(&self) -> u64;

    /// Whether the device is actively producing audio
    fn is_playing(&self) -> bool;

    /// Start or resume playback
    fn play(&mut self);

    /// Pause playback, keeping the position
    fn pause(&mut self);

    /// Seek to an absolute position in milliseconds
    fn seek_to_ms(&mut self, position_ms: u64) -> Result<()>;
}
