//! TUI widgets

mod waveform;

pub use waveform::WaveformView;
