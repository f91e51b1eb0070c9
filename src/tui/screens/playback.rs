//! Playback screen - static waveform with a progress scrubber

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph},
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::audio::{extract_amplitudes, RodioPlayback};
use crate::catalog::{format_duration_ms, CatalogEntry};
use crate::config::Settings;
use crate::session::{PlayerController, PlayerState};
use crate::tui::widgets::WaveformView;
use crate::waveform::{self, WaveformParams};

/// Canvas height amplitudes are scaled against
const CANVAS_HEIGHT: f32 = 100.0;

/// Playback screen state
pub struct PlaybackScreen {
    player: PlayerController<RodioPlayback>,
    title: String,
    /// In-flight amplitude extraction for the static waveform
    extraction: Option<JoinHandle<Result<Vec<u16>>>>,
    /// Cancels the extraction pass on teardown
    extraction_cancel: Arc<AtomicBool>,
    waveform_missing: bool,
}

impl PlaybackScreen {
    /// Load the memo and kick off amplitude extraction off the
    /// interactive path. A load failure is returned to the caller
    /// rather than presented as an empty session.
    pub fn new(settings: &Settings, entry: &CatalogEntry, params: &WaveformParams) -> Result<Self> {
        let device = RodioPlayback::new()?;
        let mut player = PlayerController::new(device, settings);
        player.load(&entry.path)?;

        let cancel = Arc::new(AtomicBool::new(false));
        let buckets = waveform::segment_count(params.max_width, params).max(1);
        let extraction = {
            let path = entry.path.clone();
            let cancel = cancel.clone();
            tokio::task::spawn_blocking(move || extract_amplitudes(&path, buckets, &cancel))
        };

        Ok(Self {
            player,
            title: entry.title.clone(),
            extraction: Some(extraction),
            extraction_cancel: cancel,
            waveform_missing: false,
        })
    }

    /// Poll the playback position and collect the extraction result
    /// once it completes
    pub async fn update(&mut self) {
        self.player.poll();

        let finished = self
            .extraction
            .as_ref()
            .map(|handle| handle.is_finished())
            .unwrap_or(false);

        if finished {
            if let Some(handle) = self.extraction.take() {
                match handle.await {
                    Ok(Ok(amplitudes)) => self.player.set_amplitudes(amplitudes),
                    Ok(Err(err)) => {
                        // Playback continues without a waveform
                        tracing::warn!("Amplitude extraction failed: {}", err);
                        self.waveform_missing = true;
                    }
                    Err(err) => {
                        tracing::warn!("Amplitude extraction task aborted: {}", err);
                        self.waveform_missing = true;
                    }
                }
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Result<()> {
        match key {
            KeyCode::Char(' ') => match self.player.state() {
                PlayerState::Playing => self.player.pause(),
                PlayerState::Paused => self.player.play()?,
                PlayerState::Idle => {}
            },
            KeyCode::Left => self.player.step_back()?,
            KeyCode::Right => self.player.step_forward()?,
            KeyCode::Home => self.player.seek_to_ms(0)?,
            KeyCode::End => self.player.seek_to_fraction(1.0)?,
            _ => {}
        }
        Ok(())
    }

    /// Release the session; cancels any extraction still in flight
    pub fn teardown(&mut self) {
        self.extraction_cancel.store(true, Ordering::Relaxed);
        if let Some(handle) = self.extraction.take() {
            handle.abort();
        }
        self.player.pause();
    }

    pub fn draw(&mut self, frame: &mut Frame, area: Rect, params: &WaveformParams) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(8),    // Waveform
                Constraint::Length(3), // Progress
                Constraint::Length(3), // Help
            ])
            .split(area);

        let state_label = match self.player.state() {
            PlayerState::Playing => "▶",
            PlayerState::Paused => "⏸",
            PlayerState::Idle => " ",
        };
        let title = Paragraph::new(format!("{} {}", state_label, self.title))
            .block(Block::default().borders(Borders::ALL).title(" Playback "));
        frame.render_widget(title, chunks[0]);

        // Static waveform with the linear progress cursor
        let canvas_width = params.max_width;
        let amplitudes = self.player.amplitudes().unwrap_or(&[]);
        let wave_frame = waveform::render_playback(
            amplitudes,
            canvas_width,
            CANVAS_HEIGHT,
            self.player.progress(),
            params,
        );
        let wave_title = if self.player.amplitudes().is_some() {
            "Waveform"
        } else if self.waveform_missing {
            "Waveform unavailable"
        } else {
            "Waveform (extracting...)"
        };
        frame.render_widget(
            WaveformView::new(&wave_frame, canvas_width, CANVAS_HEIGHT, wave_title),
            chunks[1],
        );

        // Progress gauge with time labels
        let label = format!(
            "{} / {}",
            format_duration_ms(self.player.position_ms()),
            format_duration_ms(self.player.duration_ms())
        );
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::Cyan))
            .ratio(self.player.progress() as f64)
            .label(label);
        frame.render_widget(gauge, chunks[2]);

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Space ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Play/Pause  "),
            Span::styled(" ←/→ ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Seek 5s  "),
            Span::styled(" Home/End ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Jump  "),
            Span::styled(" Esc ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Back"),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(help, chunks[3]);
    }
}
