//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// Audio capture settings
    #[serde(default)]
    pub audio: AudioSettings,

    /// Recorder session settings
    #[serde(default)]
    pub recorder: RecorderSettings,

    /// Playback session settings
    #[serde(default)]
    pub playback: PlaybackSettings,

    /// Waveform rendering settings
    #[serde(default)]
    pub waveform: WaveformSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Directory scanned for memos and used for new recordings
    #[serde(default = "default_memos_dir")]
    pub memos_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Sample rate for recording
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Number of audio channels (1 = mono, 2 = stereo)
    #[serde(default = "default_channels")]
    pub channels: u16,

    /// File extension recognized by the catalog scanner and written
    /// by the recorder
    #[serde(default = "default_extension")]
    pub extension: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecorderSettings {
    /// Interval between amplitude samples in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Maximum number of live amplitude samples kept for the waveform.
    /// When set, the sequence is a sliding window; when absent it
    /// grows for the whole session.
    #[serde(default = "default_amplitude_window")]
    pub amplitude_window: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackSettings {
    /// Interval between position polls in milliseconds
    #[serde(default = "default_poll_ms")]
    pub poll_ms: u64,

    /// Offset for relative seek shortcuts in milliseconds
    #[serde(default = "default_seek_step_ms")]
    pub seek_step_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveformSettings {
    /// Maximum drawable width in display units
    #[serde(default = "default_max_width")]
    pub max_width: f32,

    /// Width of one amplitude bar
    #[serde(default = "default_bar_width")]
    pub bar_width: f32,

    /// Spacing between amplitude bars
    #[serde(default = "default_bar_spacing")]
    pub bar_spacing: f32,
}

// Default value functions

fn default_memos_dir() -> PathBuf {
    ProjectDirs::from("com", "memovox", "memovox")
        .map(|dirs| dirs.data_dir().join("memos"))
        .unwrap_or_else(|| PathBuf::from("~/.local/share/memovox/memos"))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_sample_rate() -> u32 {
    44100
}

fn default_channels() -> u16 {
    1
}

fn default_extension() -> String {
    "wav".to_string()
}

fn default_tick_ms() -> u64 {
    100
}

fn default_amplitude_window() -> Option<usize> {
    Some(40)
}

fn default_poll_ms() -> u64 {
    50
}

fn default_seek_step_ms() -> u64 {
    5000
}

fn default_max_width() -> f32 {
    400.0
}

fn default_bar_width() -> f32 {
    2.0
}

fn default_bar_spacing() -> f32 {
    8.0
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            memos_dir: default_memos_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            channels: default_channels(),
            extension: default_extension(),
        }
    }
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            amplitude_window: default_amplitude_window(),
        }
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            poll_ms: default_poll_ms(),
            seek_step_ms: default_seek_step_ms(),
        }
    }
}

impl Default for WaveformSettings {
    fn default() -> Self {
        Self {
            max_width: default_max_width(),
            bar_width: default_bar_width(),
            bar_spacing: default_bar_spacing(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            audio: AudioSettings::default(),
            recorder: RecorderSettings::default(),
            playback: PlaybackSettings::default(),
            waveform: WaveformSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!("No config file found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        Ok(settings)
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "memovox", "memovox")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &PathBuf) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Ensure the memos directory exists
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.general.memos_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_progress_math_safe() {
        let settings = Settings::default();
        assert!(settings.playback.poll_ms > 0);
        assert!(settings.recorder.tick_ms > 0);
        assert_eq!(settings.playback.seek_step_ms, 5000);
    }

    #[test]
    fn default_waveform_budget_matches_display_cap() {
        let settings = Settings::default();
        assert_eq!(settings.waveform.max_width, 400.0);
    }
}
