//! Container metadata probing

use std::path::Path;

/// Read the duration of a WAV file in milliseconds.
///
/// Returns `None` when the file cannot be opened or the header is
/// unreadable; callers treat that as a zero duration.
pub fn probe_duration_ms(path: &Path) -> Option<u64> {
    let reader = match hound::WavReader::open(path) {
        Ok(reader) => reader,
        Err(err) => {
            tracing::debug!("Failed to probe {}: {}", path.display(), err);
            return None;
        }
    };

    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return None;
    }

    let frames = reader.duration() as u64;
    Some(frames * 1000 / spec.sample_rate as u64)
}
