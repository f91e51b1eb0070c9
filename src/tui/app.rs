//! Main TUI application state and logic

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::prelude::*;

use crate::catalog;
use crate::config::Settings;
use crate::tui::screens::{BrowserScreen, PlaybackScreen, RecordOutcome, RecordScreen};
use crate::waveform::WaveformParams;

/// Current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Browser,
    Record,
    Playback,
}

/// Main application state
pub struct App {
    settings: Settings,
    params: WaveformParams,
    current_screen: AppScreen,

    // Screen states; record/playback exist only while their session does
    browser: BrowserScreen,
    record: Option<RecordScreen>,
    playback: Option<PlaybackScreen>,

    /// One-shot message shown on the browser's footer
    status: Option<String>,
}

impl App {
    /// Create a new app instance with a fresh catalog scan
    pub fn new(settings: Settings) -> Self {
        let entries = catalog::scan(&settings.general.memos_dir, &settings.audio.extension);
        let params = WaveformParams::from_settings(&settings);

        Self {
            settings,
            params,
            current_screen: AppScreen::Browser,
            browser: BrowserScreen::new(entries),
            record: None,
            playback: None,
            status: None,
        }
    }

    /// Draw the current screen
    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();

        match self.current_screen {
            AppScreen::Browser => {
                self.browser.draw(frame, area, self.status.as_deref());
            }
            AppScreen::Record => {
                if let Some(record) = &mut self.record {
                    record.draw(frame, area, &self.params);
                }
            }
            AppScreen::Playback => {
                if let Some(playback) = &mut self.playback {
                    playback.draw(frame, area, &self.params);
                }
            }
        }
    }

    /// Handle key input. Returns true when the app should exit.
    pub async fn handle_key(&mut self, key: KeyCode) -> Result<bool> {
        match self.current_screen {
            AppScreen::Browser => self.handle_browser_key(key),
            AppScreen::Record => {
                self.handle_record_key(key)?;
                Ok(false)
            }
            AppScreen::Playback => {
                self.handle_playback_key(key)?;
                Ok(false)
            }
        }
    }

    /// Drive session polls between input events
    pub async fn update(&mut self) {
        match self.current_screen {
            AppScreen::Record => {
                if let Some(record) = &mut self.record {
                    record.update();
                }
            }
            AppScreen::Playback => {
                if let Some(playback) = &mut self.playback {
                    playback.update().await;
                }
            }
            AppScreen::Browser => {}
        }
    }

    fn handle_browser_key(&mut self, key: KeyCode) -> Result<bool> {
        if self.browser.in_search() {
            self.browser.handle_key(key);
            return Ok(false);
        }

        self.status = None;

        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Up | KeyCode::Char('k') => self.browser.previous(),
            KeyCode::Down | KeyCode::Char('j') => self.browser.next(),
            KeyCode::Enter => {
                if let Some(entry) = self.browser.selected().cloned() {
                    match PlaybackScreen::new(&self.settings, &entry, &self.params) {
                        Ok(screen) => {
                            self.playback = Some(screen);
                            self.current_screen = AppScreen::Playback;
                        }
                        Err(err) => {
                            self.status = Some(format!("Cannot play {}: {}", entry.title, err));
                        }
                    }
                }
            }
            KeyCode::Char('r') => match RecordScreen::new(&self.settings) {
                Ok(screen) => {
                    self.record = Some(screen);
                    self.current_screen = AppScreen::Record;
                }
                Err(err) => {
                    // Recording degrades; browsing keeps working
                    self.status = Some(format!("Cannot record: {err}"));
                }
            },
            KeyCode::Char('/') => self.browser.start_search(),
            KeyCode::Char('x') => {
                if let Some(entry) = self.browser.selected().cloned() {
                    if entry.path.exists() {
                        std::fs::remove_file(&entry.path)?;
                    }
                    self.status = Some(format!("Deleted {}", entry.title));
                    self.rescan();
                }
            }
            _ => {}
        }

        Ok(false)
    }

    fn handle_record_key(&mut self, key: KeyCode) -> Result<()> {
        let Some(record) = &mut self.record else {
            self.current_screen = AppScreen::Browser;
            return Ok(());
        };

        match record.handle_key(key)? {
            RecordOutcome::Continue => {}
            RecordOutcome::Saved(path) => {
                self.status = Some(format!("Saved {}", path.display()));
                self.leave_record();
            }
            RecordOutcome::Cancelled => {
                self.status = Some("Recording discarded".to_string());
                self.leave_record();
            }
        }

        Ok(())
    }

    fn handle_playback_key(&mut self, key: KeyCode) -> Result<()> {
        if key == KeyCode::Esc {
            if let Some(playback) = &mut self.playback {
                playback.teardown();
            }
            self.playback = None;
            self.current_screen = AppScreen::Browser;
            return Ok(());
        }

        if let Some(playback) = &mut self.playback {
            playback.handle_key(key)?;
        }
        Ok(())
    }

    fn leave_record(&mut self) {
        self.record = None;
        self.current_screen = AppScreen::Browser;
        self.rescan();
    }

    fn rescan(&mut self) {
        let entries = catalog::scan(
            &self.settings.general.memos_dir,
            &self.settings.audio.extension,
        );
        self.browser.set_entries(entries);
    }
}
