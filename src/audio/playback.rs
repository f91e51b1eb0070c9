//! Playback implementation using rodio

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use crate::audio::{probe_duration_ms, PlaybackDevice};

/// rodio-backed playback device
pub struct RodioPlayback {
    /// Keeps the output device alive for the sink's lifetime
    _stream: OutputStream,

    handle: OutputStreamHandle,

    /// Active sink, present once a source is loaded
    sink: Option<Sink>,

    /// Duration of the loaded source in milliseconds
    duration_ms: u64,
}

impl RodioPlayback {
    /// Open the default output device
    pub fn new() -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().context("No output device available")?;

        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
            duration_ms: 0,
        })
    }
}

impl PlaybackDevice for RodioPlayback {
    fn load(&mut self, path: &Path) -> Result<()> {
        // Tear down any previous source first
        self.sink.take();
        self.duration_ms = 0;

        let file = File::open(path)
            .with_context(|| format!("Failed to open audio file: {}", path.display()))?;
        let source = Decoder::new(BufReader::new(file))
            .with_context(|| format!("Unsupported audio format: {}", path.display()))?;

        let sink = Sink::try_new(&self.handle).context("Failed to create playback sink")?;
        sink.append(source);
        sink.pause();

        self.duration_ms = probe_duration_ms(path).unwrap_or(0);
        self.sink = Some(sink);

        tracing::info!(
            "Loaded {} ({} ms)",
            path.display(),
            self.duration_ms
        );
        Ok(())
    }

    fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    fn position_ms(&self) -> u64 {
        self.sink
            .as_ref()
            .map(|sink| sink.get_pos().as_millis() as u64)
            .unwrap_or(0)
    }

    fn is_playing(&self) -> bool {
        self.sink
            .as_ref()
            .map(|sink| !sink.is_paused() && !sink.empty())
            .unwrap_or(false)
    }

    fn play(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn seek_to_ms(&mut self, position_ms: u64) -> Result<()> {
        if let Some(sink) = &self.sink {
            sink.try_seek(Duration::from_millis(position_ms))
                .map_err(|err| anyhow::anyhow!("Seek failed: {err}"))?;
        }
        Ok(())
    }
}
