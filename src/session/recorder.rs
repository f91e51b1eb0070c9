//! Recorder session state machine and amplitude sampler

use chrono::Utc;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::audio::CaptureDevice;
use crate::config::Settings;
use crate::{MemovoxError, Result};

/// State of a recording session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    /// No session; the capture device is released
    Idle,
    /// Capture is running and the sampler is appending amplitudes
    Recording,
    /// Capture is suspended; elapsed time and sampling halt
    Paused,
    /// The output file is finalized, awaiting save or cancel
    Stopped,
}

/// Live amplitude sequence for the recording waveform.
///
/// With a configured capacity the sequence is a sliding window that
/// drops the oldest sample on overflow; without one it grows for the
/// whole session.
#[derive(Debug, Clone)]
pub struct AmplitudeWindow {
    samples: VecDeque<u16>,
    capacity: Option<usize>,
}

impl AmplitudeWindow {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            samples: VecDeque::new(),
            capacity,
        }
    }

    pub fn push(&mut self, amplitude: u16) {
        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return;
            }
            while self.samples.len() >= capacity {
                self.samples.pop_front();
            }
        }
        self.samples.push_back(amplitude);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn to_vec(&self) -> Vec<u16> {
        self.samples.iter().copied().collect()
    }
}

/// Owns one capture session at a time and drives the state machine
/// Idle -> Recording <-> Paused -> Stopped -> (cancel | save) -> Idle.
pub struct RecorderController<C: CaptureDevice> {
    capture: C,
    state: RecorderState,
    output_path: Option<PathBuf>,
    elapsed_ms: u64,
    tick_ms: u64,
    amplitudes: AmplitudeWindow,
}

impl<C: CaptureDevice> RecorderController<C> {
    pub fn new(capture: C, settings: &Settings) -> Self {
        Self {
            capture,
            state: RecorderState::Idle,
            output_path: None,
            elapsed_ms: 0,
            tick_ms: settings.recorder.tick_ms,
            amplitudes: AmplitudeWindow::new(settings.recorder.amplitude_window),
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn tick_ms(&self) -> u64 {
        self.tick_ms
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    pub fn amplitudes(&self) -> &AmplitudeWindow {
        &self.amplitudes
    }

    /// Allocate a timestamped output file under `memos_dir` and start
    /// capturing into it. Fails fatally if the device cannot be
    /// prepared; there is no retry.
    pub fn start(&mut self, memos_dir: &Path, extension: &str) -> Result<()> {
        if self.state != RecorderState::Idle {
            return Err(MemovoxError::InvalidTransition(format!(
                "start from {:?}",
                self.state
            )));
        }

        std::fs::create_dir_all(memos_dir)?;

        // Millisecond timestamp keeps concurrent sessions on distinct files
        let path = memos_dir.join(format!(
            "memo_{}.{}",
            Utc::now().timestamp_millis(),
            extension
        ));

        self.capture
            .start(&path)
            .map_err(|err| MemovoxError::Capture(err.to_string()))?;

        self.output_path = Some(path);
        self.elapsed_ms = 0;
        self.amplitudes.clear();
        self.state = RecorderState::Recording;
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        if self.state != RecorderState::Recording {
            return Err(MemovoxError::InvalidTransition(format!(
                "pause from {:?}",
                self.state
            )));
        }
        self.capture
            .pause()
            .map_err(|err| MemovoxError::Capture(err.to_string()))?;
        self.state = RecorderState::Paused;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        if self.state != RecorderState::Paused {
            return Err(MemovoxError::InvalidTransition(format!(
                "resume from {:?}",
                self.state
            )));
        }
        self.capture
            .resume()
            .map_err(|err| MemovoxError::Capture(err.to_string()))?;
        self.state = RecorderState::Recording;
        Ok(())
    }

    /// Finalize the output file; the session stays around until the
    /// user decides between save and cancel.
    pub fn stop(&mut self) -> Result<()> {
        if self.state != RecorderState::Recording && self.state != RecorderState::Paused {
            return Err(MemovoxError::InvalidTransition(format!(
                "stop from {:?}",
                self.state
            )));
        }
        self.capture
            .stop()
            .map_err(|err| MemovoxError::Capture(err.to_string()))?;
        self.state = RecorderState::Stopped;
        Ok(())
    }

    /// One sampler tick: accumulate elapsed time and append the
    /// instantaneous amplitude. No-op outside the Recording state.
    pub fn tick(&mut self) {
        if self.state != RecorderState::Recording {
            return;
        }
        self.elapsed_ms += self.tick_ms;
        self.amplitudes.push(self.capture.current_amplitude());
    }

    /// Discard a stopped session, deleting its output file.
    /// Deleting a file that no longer exists is a no-op.
    pub fn cancel(&mut self) -> Result<()> {
        if self.state != RecorderState::Stopped {
            return Err(MemovoxError::InvalidTransition(format!(
                "cancel from {:?}",
                self.state
            )));
        }

        if let Some(path) = self.output_path.take() {
            if path.exists() {
                std::fs::remove_file(&path)?;
                tracing::info!("Deleted {}", path.display());
            }
        }

        self.reset();
        Ok(())
    }

    /// Persist a stopped session, optionally renaming the output file
    /// to `title` while preserving the extension. Returns the final
    /// path of the saved memo.
    pub fn save(&mut self, title: Option<&str>) -> Result<PathBuf> {
        if self.state != RecorderState::Stopped {
            return Err(MemovoxError::InvalidTransition(format!(
                "save from {:?}",
                self.state
            )));
        }

        let path = self
            .output_path
            .take()
            .ok_or_else(|| MemovoxError::Other("No output file for session".to_string()))?;

        let final_path = match title.map(str::trim).filter(|t| !t.is_empty()) {
            Some(title) => {
                let mut target = path.with_file_name(title);
                if let Some(ext) = path.extension() {
                    target.set_extension(ext);
                }
                // Renaming a file that was already removed is a no-op
                if path.exists() {
                    std::fs::rename(&path, &target)?;
                    tracing::info!("Saved memo as {}", target.display());
                }
                target
            }
            None => path,
        };

        self.reset();
        Ok(final_path)
    }

    fn reset(&mut self) {
        self.state = RecorderState::Idle;
        self.output_path = None;
        self.elapsed_ms = 0;
        self.amplitudes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sliding_window_drops_oldest_sample() {
        let mut window = AmplitudeWindow::new(Some(3));
        for amplitude in [10, 20, 30, 40] {
            window.push(amplitude);
        }
        assert_eq!(window.to_vec(), vec![20, 30, 40]);
    }

    #[test]
    fn unbounded_window_keeps_everything() {
        let mut window = AmplitudeWindow::new(None);
        for amplitude in 0..500 {
            window.push(amplitude);
        }
        assert_eq!(window.len(), 500);
    }
}
