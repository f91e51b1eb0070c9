//! Waveform rendering geometry
//!
//! Pure mapping from an amplitude sequence plus a cursor to drawing
//! primitives. The live-recording view and the playback view place
//! their cursors by different rules, kept as separate functions: the
//! live cursor wraps by time modulo the visible span, the playback
//! cursor moves linearly with the progress fraction.

use crate::config::Settings;

/// Time represented by one live-waveform segment
pub const LIVE_SEGMENT_MS: u64 = 200;

/// Geometry knobs for the renderer
#[derive(Debug, Clone, Copy)]
pub struct WaveformParams {
    /// Cap on the drawable width in display units
    pub max_width: f32,
    /// Width of one vertical bar
    pub bar_width: f32,
    /// Spacing between bars
    pub bar_spacing: f32,
}

impl WaveformParams {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_width: settings.waveform.max_width,
            bar_width: settings.waveform.bar_width,
            bar_spacing: settings.waveform.bar_spacing,
        }
    }

    fn stride(&self) -> f32 {
        self.bar_width + self.bar_spacing
    }
}

impl Default for WaveformParams {
    fn default() -> Self {
        Self {
            max_width: 400.0,
            bar_width: 2.0,
            bar_spacing: 8.0,
        }
    }
}

/// One vertical amplitude bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Horizontal offset of the bar
    pub x: f32,
    /// Bar height; amplitude 100 fills the canvas height
    pub height: f32,
}

/// Drawing primitives for one waveform frame
#[derive(Debug, Clone)]
pub struct WaveformFrame {
    pub bars: Vec<Bar>,
    /// Horizontal position of the cursor line
    pub cursor_x: f32,
}

/// Number of bars that fit into `width`, after capping at the
/// configured maximum
pub fn segment_count(width: f32, params: &WaveformParams) -> usize {
    let usable = width.min(params.max_width);
    (usable / params.stride()) as usize
}

/// Render the live-recording waveform.
///
/// `start_index` offsets into the amplitude sequence so the visible
/// window can scroll; indices past the end render as zero-height
/// bars. The cursor wraps around by elapsed time modulo the span of
/// the visible segments.
pub fn render_live(
    amplitudes: &[u16],
    width: f32,
    height: f32,
    elapsed_ms: u64,
    start_index: usize,
    params: &WaveformParams,
) -> WaveformFrame {
    let segments = segment_count(width, params);
    let bars = layout_bars(amplitudes, segments, start_index, height, params);

    let cursor_x = if segments == 0 {
        0.0
    } else {
        let span_ms = segments as u64 * LIVE_SEGMENT_MS;
        (elapsed_ms % span_ms) as f32 / LIVE_SEGMENT_MS as f32 * params.stride()
    };

    WaveformFrame { bars, cursor_x }
}

/// Render the static playback waveform with a linear progress cursor.
pub fn render_playback(
    amplitudes: &[u16],
    width: f32,
    height: f32,
    progress: f32,
    params: &WaveformParams,
) -> WaveformFrame {
    let segments = segment_count(width, params);
    let bars = layout_bars(amplitudes, segments, 0, height, params);

    let cursor_x = progress.clamp(0.0, 1.0) * segments as f32 * params.stride();

    WaveformFrame { bars, cursor_x }
}

/// Start index for the live view so the cursor stays centered once
/// the recording outgrows half the visible segments
pub fn live_start_index(elapsed_ms: u64, max_segments: usize) -> usize {
    let segment = (elapsed_ms / LIVE_SEGMENT_MS) as usize;
    let half = max_segments / 2;
    segment.saturating_sub(half).min(segment)
}

fn layout_bars(
    amplitudes: &[u16],
    segments: usize,
    start_index: usize,
    height: f32,
    params: &WaveformParams,
) -> Vec<Bar> {
    (0..segments)
        .map(|i| {
            let amplitude = amplitudes.get(i + start_index).copied().unwrap_or(0);
            Bar {
                x: i as f32 * params.stride(),
                height: amplitude as f32 / 100.0 * height,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> WaveformParams {
        WaveformParams::default()
    }

    #[test]
    fn width_budget_is_capped() {
        // 1000 units wide, but only 400 are usable: 400 / (2 + 8) = 40
        assert_eq!(segment_count(1000.0, &params()), 40);
        assert_eq!(segment_count(100.0, &params()), 10);
        assert_eq!(segment_count(0.0, &params()), 0);
    }

    #[test]
    fn out_of_range_indices_render_zero_height() {
        let frame = render_live(&[50, 100], 100.0, 200.0, 0, 0, &params());
        assert_eq!(frame.bars.len(), 10);
        assert_eq!(frame.bars[0].height, 100.0);
        assert_eq!(frame.bars[1].height, 200.0);
        for bar in &frame.bars[2..] {
            assert_eq!(bar.height, 0.0);
        }
    }

    #[test]
    fn live_cursor_wraps_by_time_modulo() {
        // 10 segments of 200 ms = 2000 ms span, stride 10
        let frame = render_live(&[], 100.0, 50.0, 500, 0, &params());
        assert_eq!(frame.cursor_x, 25.0);

        let wrapped = render_live(&[], 100.0, 50.0, 2500, 0, &params());
        assert_eq!(wrapped.cursor_x, 25.0);
    }

    #[test]
    fn playback_cursor_is_linear_in_progress() {
        let frame = render_playback(&[], 100.0, 50.0, 0.5, &params());
        assert_eq!(frame.cursor_x, 50.0);

        let done = render_playback(&[], 100.0, 50.0, 1.0, &params());
        assert_eq!(done.cursor_x, 100.0);

        // Out-of-range progress clamps
        let over = render_playback(&[], 100.0, 50.0, 1.5, &params());
        assert_eq!(over.cursor_x, 100.0);
        let under = render_playback(&[], 100.0, 50.0, -0.5, &params());
        assert_eq!(under.cursor_x, 0.0);
    }

    #[test]
    fn start_index_scrolls_once_past_half_window() {
        assert_eq!(live_start_index(0, 40), 0);
        assert_eq!(live_start_index(3800, 40), 0);
        // 4000 ms / 200 = segment 20 = half of 40
        assert_eq!(live_start_index(4000, 40), 0);
        assert_eq!(live_start_index(4200, 40), 1);
        assert_eq!(live_start_index(8000, 40), 20);
    }
}
