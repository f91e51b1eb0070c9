//! Microphone capture implementation using cpal

use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream, StreamConfig};
use hound::{WavSpec, WavWriter};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::sync::{Arc, Mutex};

use crate::audio::CaptureDevice;
use crate::config::Settings;

type WavWriterHandle = Arc<Mutex<Option<WavWriter<std::io::BufWriter<std::fs::File>>>>>;

/// cpal-backed capture device writing 16-bit WAV
pub struct CpalCapture {
    /// WAV writer, shared with the stream callback
    writer: WavWriterHandle,

    /// Audio stream, held alive while capturing
    stream: Option<Stream>,

    /// Gate for the stream callback; cleared while paused
    writing: Arc<AtomicBool>,

    /// Peak amplitude (0-100) observed since the last read
    peak: Arc<AtomicU16>,

    /// Requested sample rate
    sample_rate: u32,

    /// Requested number of channels
    channels: u16,
}

impl CpalCapture {
    /// Create a new capture device from settings
    pub fn new(settings: &Settings) -> Self {
        Self {
            writer: Arc::new(Mutex::new(None)),
            stream: None,
            writing: Arc::new(AtomicBool::new(false)),
            peak: Arc::new(AtomicU16::new(0)),
            sample_rate: settings.audio.sample_rate,
            channels: settings.audio.channels,
        }
    }
}

impl CaptureDevice for CpalCapture {
    fn start(&mut self, output_path: &Path) -> Result<()> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .context("No input device available")?;

        tracing::info!("Using audio device: {}", device.name().unwrap_or_default());

        let supported_configs = device
            .supported_input_configs()
            .context("Failed to get supported configs")?;

        let config = find_suitable_config(supported_configs, self.sample_rate, self.channels)?;

        tracing::info!(
            "Audio config: {} Hz, {} channels, {:?}",
            config.sample_rate().0,
            config.channels(),
            config.sample_format()
        );

        let stream_config = StreamConfig {
            channels: config.channels(),
            sample_rate: config.sample_rate(),
            buffer_size: cpal::BufferSize::Default,
        };

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let spec = WavSpec {
            channels: config.channels(),
            sample_rate: config.sample_rate().0,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let writer = WavWriter::create(output_path, spec)
            .with_context(|| format!("Failed to create WAV file: {}", output_path.display()))?;

        if let Ok(mut guard) = self.writer.lock() {
            *guard = Some(writer);
        }

        self.writing.store(true, Ordering::SeqCst);
        self.peak.store(0, Ordering::SeqCst);

        let writer = self.writer.clone();
        let writing = self.writing.clone();
        let peak = self.peak.clone();

        let stream = match config.sample_format() {
            SampleFormat::I8 => build_stream::<i8>(&device, &stream_config, writer, writing, peak)?,
            SampleFormat::I16 => {
                build_stream::<i16>(&device, &stream_config, writer, writing, peak)?
            }
            SampleFormat::I32 => {
                build_stream::<i32>(&device, &stream_config, writer, writing, peak)?
            }
            SampleFormat::U8 => build_stream::<u8>(&device, &stream_config, writer, writing, peak)?,
            SampleFormat::U16 => {
                build_stream::<u16>(&device, &stream_config, writer, writing, peak)?
            }
            SampleFormat::U32 => {
                build_stream::<u32>(&device, &stream_config, writer, writing, peak)?
            }
            SampleFormat::F32 => {
                build_stream::<f32>(&device, &stream_config, writer, writing, peak)?
            }
            SampleFormat::F64 => {
                build_stream::<f64>(&device, &stream_config, writer, writing, peak)?
            }
            format => anyhow::bail!("Unsupported sample format: {:?}", format),
        };

        stream.play().context("Failed to start audio stream")?;
        self.stream = Some(stream);

        tracing::info!("Recording started: {}", output_path.display());
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.writing.store(false, Ordering::SeqCst);
        self.peak.store(0, Ordering::SeqCst);
        tracing::info!("Recording paused");
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        self.writing.store(true, Ordering::SeqCst);
        tracing::info!("Recording resumed");
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.writing.store(false, Ordering::SeqCst);
        self.peak.store(0, Ordering::SeqCst);

        // Drop the stream to stop capture
        self.stream.take();

        // Finalize the WAV file
        if let Ok(mut guard) = self.writer.lock() {
            if let Some(writer) = guard.take() {
                writer.finalize().context("Failed to finalize WAV file")?;
            }
        }

        tracing::info!("Recording stopped");
        Ok(())
    }

    fn current_amplitude(&self) -> u16 {
        self.peak.swap(0, Ordering::SeqCst)
    }

    fn backend_name(&self) -> &'static str {
        "cpal"
    }
}

impl Drop for CpalCapture {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// Find a suitable audio configuration
fn find_suitable_config(
    configs: cpal::SupportedInputConfigs,
    target_sample_rate: u32,
    target_channels: u16,
) -> Result<cpal::SupportedStreamConfig> {
    let configs: Vec<_> = configs.collect();

    // Try to find exact match first
    for config in &configs {
        if config.channels() == target_channels
            && config.min_sample_rate().0 <= target_sample_rate
            && config.max_sample_rate().0 >= target_sample_rate
        {
            return Ok(config
                .clone()
                .with_sample_rate(cpal::SampleRate(target_sample_rate)));
        }
    }

    // Fall back to any config that supports the sample rate
    for config in &configs {
        if config.min_sample_rate().0 <= target_sample_rate
            && config.max_sample_rate().0 >= target_sample_rate
        {
            return Ok(config
                .clone()
                .with_sample_rate(cpal::SampleRate(target_sample_rate)));
        }
    }

    // Just use the first available config
    configs
        .into_iter()
        .next()
        .map(|c| c.with_max_sample_rate())
        .context("No supported audio configuration found")
}

/// Build an audio stream for a specific sample format
fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    writer: WavWriterHandle,
    writing: Arc<AtomicBool>,
    peak: Arc<AtomicU16>,
) -> Result<Stream>
where
    T: cpal::Sample + cpal::SizedSample + 'static,
    i16: cpal::FromSample<T>,
{
    let err_fn = |err| tracing::error!("Audio stream error: {}", err);

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            if !writing.load(Ordering::SeqCst) {
                return;
            }

            let mut batch_peak: u16 = 0;
            if let Ok(mut guard) = writer.lock() {
                if let Some(ref mut writer) = *guard {
                    for &sample in data {
                        let sample_i16: i16 = cpal::Sample::from_sample(sample);
                        let scaled =
                            (sample_i16.unsigned_abs() as u32 * 100 / i16::MAX as u32) as u16;
                        batch_peak = batch_peak.max(scaled);
                        if writer.write_sample(sample_i16).is_err() {
                            break;
                        }
                    }
                }
            }
            peak.fetch_max(batch_peak, Ordering::SeqCst);
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}
