//! Waveform canvas widget
//!
//! Projects the renderer's drawing primitives onto a ratatui canvas.
//! All geometry comes from the pure renderer; this widget only maps
//! bars and the cursor line to canvas strokes.

use ratatui::{
    prelude::*,
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, Borders,
    },
};

use crate::waveform::WaveformFrame;

/// Renders one waveform frame inside a bordered block
pub struct WaveformView<'a> {
    frame: &'a WaveformFrame,
    /// Logical canvas width the frame was laid out for
    width: f32,
    /// Logical canvas height amplitudes were scaled to
    height: f32,
    title: &'a str,
}

impl<'a> WaveformView<'a> {
    pub fn new(frame: &'a WaveformFrame, width: f32, height: f32, title: &'a str) -> Self {
        Self {
            frame,
            width,
            height,
            title,
        }
    }
}

impl Widget for WaveformView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let canvas = Canvas::default()
            .block(
                Block::default()
                    .title(format!(" {} ", self.title))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Blue)),
            )
            .x_bounds([0.0, self.width as f64])
            .y_bounds([0.0, self.height as f64])
            .paint(|ctx| {
                for bar in &self.frame.bars {
                    // Bars grow symmetrically from the vertical center
                    let y1 = (self.height - bar.height) as f64 / 2.0;
                    let y2 = (self.height + bar.height) as f64 / 2.0;
                    ctx.draw(&CanvasLine {
                        x1: bar.x as f64,
                        y1,
                        x2: bar.x as f64,
                        y2,
                        color: Color::White,
                    });
                }

                ctx.draw(&CanvasLine {
                    x1: self.frame.cursor_x as f64,
                    y1: 0.0,
                    x2: self.frame.cursor_x as f64,
                    y2: self.height as f64,
                    color: Color::Cyan,
                });
            });

        canvas.render(area, buf);
    }
}
