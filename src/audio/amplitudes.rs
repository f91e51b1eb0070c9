//! Full-file amplitude extraction for static waveforms

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// How often the cancellation flag is checked, in samples
const CANCEL_CHECK_INTERVAL: usize = 4096;

/// Decode `path` and reduce it to `buckets` peak amplitudes on a
/// 0-100 scale, one bucket per waveform segment.
///
/// Runs as a single pass over the decoded samples. The `cancel` flag
/// lets the owning view abort the pass on teardown; a cancelled or
/// failed extraction leaves playback usable without a waveform.
pub fn extract_amplitudes(
    path: &Path,
    buckets: usize,
    cancel: &Arc<AtomicBool>,
) -> Result<Vec<u16>> {
    anyhow::ensure!(buckets > 0, "Bucket count must be nonzero");

    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;

    let spec = reader.spec();
    let total_samples = reader.len() as usize;
    if total_samples == 0 {
        return Ok(vec![0; buckets]);
    }

    let samples_per_bucket = (total_samples / buckets).max(1);
    let mut amplitudes = vec![0u16; buckets];

    match spec.sample_format {
        hound::SampleFormat::Float => {
            fold_samples(
                reader.samples::<f32>().map(|s| s.map(|v| v.abs().min(1.0))),
                samples_per_bucket,
                &mut amplitudes,
                cancel,
            )?;
        }
        hound::SampleFormat::Int => {
            let full_scale = ((1u64 << (spec.bits_per_sample - 1)) - 1) as f32;
            fold_samples(
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| (v.unsigned_abs() as f32 / full_scale).min(1.0))),
                samples_per_bucket,
                &mut amplitudes,
                cancel,
            )?;
        }
    }

    tracing::debug!(
        "Extracted {} amplitude buckets from {}",
        buckets,
        path.display()
    );
    Ok(amplitudes)
}

fn fold_samples<I>(
    samples: I,
    samples_per_bucket: usize,
    amplitudes: &mut [u16],
    cancel: &Arc<AtomicBool>,
) -> Result<()>
where
    I: Iterator<Item = std::result::Result<f32, hound::Error>>,
{
    for (i, sample) in samples.enumerate() {
        if i % CANCEL_CHECK_INTERVAL == 0 && cancel.load(Ordering::Relaxed) {
            anyhow::bail!("Amplitude extraction cancelled");
        }

        let normalized = sample.context("Failed to decode sample")?;
        let scaled = (normalized * 100.0) as u16;
        let bucket = (i / samples_per_bucket).min(amplitudes.len() - 1);
        amplitudes[bucket] = amplitudes[bucket].max(scaled);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_wav(path: &std::path::Path, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn loud_sections_produce_taller_buckets() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("halves.wav");

        // First half silent, second half full scale
        let mut samples = vec![0i16; 1000];
        samples.extend(std::iter::repeat(i16::MAX).take(1000));
        write_wav(&path, &samples);

        let cancel = Arc::new(AtomicBool::new(false));
        let amplitudes = extract_amplitudes(&path, 4, &cancel).unwrap();

        assert_eq!(amplitudes.len(), 4);
        assert_eq!(amplitudes[0], 0);
        assert_eq!(amplitudes[1], 0);
        assert!(amplitudes[2] >= 99);
        assert!(amplitudes[3] >= 99);
        assert!(amplitudes.iter().all(|&a| a <= 100));
    }

    #[test]
    fn cancelled_extraction_fails_instead_of_returning_partial_data() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("long.wav");
        write_wav(&path, &vec![1000i16; 20_000]);

        let cancel = Arc::new(AtomicBool::new(true));
        assert!(extract_amplitudes(&path, 8, &cancel).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let tmp = tempdir().unwrap();
        let cancel = Arc::new(AtomicBool::new(false));
        assert!(extract_amplitudes(&tmp.path().join("gone.wav"), 8, &cancel).is_err());
    }
}
