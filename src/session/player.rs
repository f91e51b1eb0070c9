//! Playback session controller

use std::path::Path;

use crate::audio::PlaybackDevice;
use crate::config::Settings;
use crate::{MemovoxError, Result};

/// State of a playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// No source attached
    Idle,
    /// The device is producing audio and the position poll is live
    Playing,
    /// A source is attached but not playing
    Paused,
}

/// Owns one playback session at a time: load, play/pause, seek, and
/// the position poll that drives the progress fraction.
pub struct PlayerController<P: PlaybackDevice> {
    device: P,
    state: PlayerState,
    position_ms: u64,
    duration_ms: u64,
    seek_step_ms: u64,
    amplitudes: Option<Vec<u16>>,
}

impl<P: PlaybackDevice> PlayerController<P> {
    pub fn new(device: P, settings: &Settings) -> Self {
        Self {
            device,
            state: PlayerState::Idle,
            position_ms: 0,
            duration_ms: 0,
            seek_step_ms: settings.playback.seek_step_ms,
            amplitudes: None,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn position_ms(&self) -> u64 {
        self.position_ms
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Progress fraction in [0, 1]. The duration is clamped to at
    /// least 1 ms on load, so the division is always defined.
    pub fn progress(&self) -> f32 {
        if self.state == PlayerState::Idle {
            return 0.0;
        }
        (self.position_ms as f32 / self.duration_ms as f32).clamp(0.0, 1.0)
    }

    /// Static waveform amplitudes, absent until extraction completes
    pub fn amplitudes(&self) -> Option<&[u16]> {
        self.amplitudes.as_deref()
    }

    pub fn set_amplitudes(&mut self, amplitudes: Vec<u16>) {
        self.amplitudes = Some(amplitudes);
    }

    /// Attach a source file. A missing or unreadable source is a hard
    /// error; the session stays Idle rather than silently loading a
    /// zero-length track.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        self.state = PlayerState::Idle;
        self.amplitudes = None;

        self.device
            .load(path)
            .map_err(|err| MemovoxError::Playback(err.to_string()))?;

        // Never divide by a zero duration in progress math
        self.duration_ms = self.device.duration_ms().max(1);
        self.position_ms = 0;
        self.state = PlayerState::Paused;
        Ok(())
    }

    pub fn play(&mut self) -> Result<()> {
        if self.state == PlayerState::Idle {
            return Err(MemovoxError::InvalidTransition(
                "play with no source loaded".to_string(),
            ));
        }
        self.device.play();
        self.state = PlayerState::Playing;
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.state == PlayerState::Playing {
            self.device.pause();
            self.state = PlayerState::Paused;
        }
    }

    /// One poll interval: refresh the position from the device and
    /// detect end of track. The poll loop is the sole writer of the
    /// position while playing.
    pub fn poll(&mut self) {
        if self.state != PlayerState::Playing {
            return;
        }

        self.position_ms = self.device.position_ms();

        if !self.device.is_playing() {
            if self.position_ms >= self.duration_ms {
                self.position_ms = self.duration_ms;
            }
            self.state = PlayerState::Paused;
        }
    }

    /// Seek to an absolute position, clamped to [0, duration]. The
    /// session position updates immediately rather than waiting for
    /// the next poll.
    pub fn seek_to_ms(&mut self, position_ms: u64) -> Result<()> {
        if self.state == PlayerState::Idle {
            return Err(MemovoxError::InvalidTransition(
                "seek with no source loaded".to_string(),
            ));
        }

        let clamped = position_ms.min(self.duration_ms);
        self.device
            .seek_to_ms(clamped)
            .map_err(|err| MemovoxError::Playback(err.to_string()))?;
        self.position_ms = clamped;
        Ok(())
    }

    /// Seek by progress fraction; values outside [0, 1] clamp.
    pub fn seek_to_fraction(&mut self, fraction: f32) -> Result<()> {
        let fraction = fraction.clamp(0.0, 1.0);
        self.seek_to_ms((fraction * self.duration_ms as f32) as u64)
    }

    /// Step back by the configured offset, clamped to 0
    pub fn step_back(&mut self) -> Result<()> {
        self.seek_to_ms(self.position_ms.saturating_sub(self.seek_step_ms))
    }

    /// Step forward by the configured offset, clamped to the duration
    pub fn step_forward(&mut self) -> Result<()> {
        self.seek_to_ms(self.position_ms.saturating_add(self.seek_step_ms))
    }
}
