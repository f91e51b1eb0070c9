//! Record screen - live waveform and recording controls

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::audio::CpalCapture;
use crate::catalog::format_duration_ms;
use crate::config::Settings;
use crate::session::{RecorderController, RecorderState};
use crate::tui::widgets::WaveformView;
use crate::waveform::{self, WaveformParams};

/// Canvas height amplitudes are scaled against
const CANVAS_HEIGHT: f32 = 100.0;

/// What the screen decided after a key press
pub enum RecordOutcome {
    /// Stay on the record screen
    Continue,
    /// Session saved; the file lives at the returned path
    Saved(PathBuf),
    /// Session discarded and its file deleted
    Cancelled,
}

/// Record screen state
pub struct RecordScreen {
    recorder: RecorderController<CpalCapture>,
    sliding_window: bool,
    last_tick: Instant,
    save_prompt: bool,
    title_input: String,
}

impl RecordScreen {
    /// Build the screen and start capturing immediately.
    /// Fails if the capture device cannot be prepared; the caller
    /// surfaces the error and stays on the browser.
    pub fn new(settings: &Settings) -> Result<Self> {
        let capture = CpalCapture::new(settings);
        let mut recorder = RecorderController::new(capture, settings);

        recorder
            .start(&settings.general.memos_dir, &settings.audio.extension)
            .context("Failed to start recording")?;

        Ok(Self {
            recorder,
            sliding_window: settings.recorder.amplitude_window.is_some(),
            last_tick: Instant::now(),
            save_prompt: false,
            title_input: String::new(),
        })
    }

    /// Advance the sampler by however many tick intervals elapsed
    /// since the last update
    pub fn update(&mut self) {
        let tick = Duration::from_millis(self.recorder.tick_ms());
        while self.last_tick.elapsed() >= tick {
            self.recorder.tick();
            self.last_tick += tick;
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Result<RecordOutcome> {
        if self.save_prompt {
            return self.handle_prompt_key(key);
        }

        match key {
            KeyCode::Char(' ') => match self.recorder.state() {
                RecorderState::Recording => {
                    self.recorder.pause()?;
                }
                RecorderState::Paused => {
                    self.recorder.resume()?;
                    self.last_tick = Instant::now();
                }
                _ => {}
            },
            KeyCode::Enter => {
                if matches!(
                    self.recorder.state(),
                    RecorderState::Recording | RecorderState::Paused
                ) {
                    self.recorder.stop()?;
                    self.save_prompt = true;
                }
            }
            KeyCode::Esc => {
                if matches!(
                    self.recorder.state(),
                    RecorderState::Recording | RecorderState::Paused
                ) {
                    self.recorder.stop()?;
                }
                self.recorder.cancel()?;
                return Ok(RecordOutcome::Cancelled);
            }
            _ => {}
        }

        Ok(RecordOutcome::Continue)
    }

    fn handle_prompt_key(&mut self, key: KeyCode) -> Result<RecordOutcome> {
        match key {
            KeyCode::Char(c) => {
                self.title_input.push(c);
            }
            KeyCode::Backspace => {
                self.title_input.pop();
            }
            KeyCode::Enter => {
                let title = self.title_input.trim();
                let title = (!title.is_empty()).then_some(title);
                let path = self.recorder.save(title)?;
                return Ok(RecordOutcome::Saved(path));
            }
            KeyCode::Esc => {
                self.recorder.cancel()?;
                return Ok(RecordOutcome::Cancelled);
            }
            _ => {}
        }
        Ok(RecordOutcome::Continue)
    }

    pub fn draw(&mut self, frame: &mut Frame, area: Rect, params: &WaveformParams) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status
                Constraint::Min(8),    // Waveform
                Constraint::Length(3), // Help / save prompt
            ])
            .split(area);

        let (state_label, state_color) = match self.recorder.state() {
            RecorderState::Recording => ("● Recording", Color::Red),
            RecorderState::Paused => ("⏸ Paused", Color::Yellow),
            RecorderState::Stopped => ("■ Stopped", Color::Green),
            RecorderState::Idle => ("Idle", Color::DarkGray),
        };

        let status = Paragraph::new(Line::from(vec![
            Span::styled(state_label, Style::default().fg(state_color)),
            Span::raw("  "),
            Span::styled(
                format_duration_ms(self.recorder.elapsed_ms()),
                Style::default().fg(Color::White),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL).title(" Session "));
        frame.render_widget(status, chunks[0]);

        // Live waveform
        let canvas_width = params.max_width;
        let segments = waveform::segment_count(canvas_width, params);
        let start_index = if self.sliding_window {
            0
        } else {
            waveform::live_start_index(self.recorder.elapsed_ms(), segments)
        };
        let amplitudes = self.recorder.amplitudes().to_vec();
        let wave_frame = waveform::render_live(
            &amplitudes,
            canvas_width,
            CANVAS_HEIGHT,
            self.recorder.elapsed_ms(),
            start_index,
            params,
        );
        frame.render_widget(
            WaveformView::new(&wave_frame, canvas_width, CANVAS_HEIGHT, "Waveform"),
            chunks[1],
        );

        // Help bar or save prompt
        let footer = if self.save_prompt {
            Paragraph::new(format!("Save as: {}█  (Enter save, Esc discard)", self.title_input))
                .style(Style::default().fg(Color::Yellow))
                .alignment(Alignment::Center)
        } else {
            Paragraph::new(Line::from(vec![
                Span::styled(" Space ", Style::default().fg(Color::Black).bg(Color::Cyan)),
                Span::raw(" Pause/Resume  "),
                Span::styled(" Enter ", Style::default().fg(Color::Black).bg(Color::Cyan)),
                Span::raw(" Stop & Save  "),
                Span::styled(" Esc ", Style::default().fg(Color::Black).bg(Color::Cyan)),
                Span::raw(" Discard"),
            ]))
            .alignment(Alignment::Center)
        };
        frame.render_widget(footer, chunks[2]);
    }
}
