//! Catalog entry model and display formatting

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;

/// A memo discovered by the scanner.
///
/// Rebuilt from scratch on every scan; identity across scans is only
/// as stable as the filename it derives from.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    /// Identifier derived from the file stem
    pub id: String,

    /// Display title (same as the file stem until renamed on disk)
    pub title: String,

    /// Last-modified time of the file
    pub modified_at: DateTime<Local>,

    /// Duration in milliseconds, 0 when the container is unreadable
    pub duration_ms: u64,

    /// File size in bytes
    pub size_bytes: u64,

    /// Absolute path to the audio file
    pub path: PathBuf,
}

impl CatalogEntry {
    /// Date label in day-month-year form
    pub fn date_label(&self) -> String {
        self.modified_at.format("%d-%m-%Y").to_string()
    }

    /// Duration label as minutes:seconds
    pub fn duration_label(&self) -> String {
        format_duration_ms(self.duration_ms)
    }

    /// Human-readable size label
    pub fn size_label(&self) -> String {
        format_size(self.size_bytes)
    }
}

/// Format a duration in milliseconds as `MM:SS`
pub fn format_duration_ms(duration_ms: u64) -> String {
    let total_secs = duration_ms / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Format a byte count using the largest unit that yields a nonzero
/// truncated integer (1024-based, truncating division)
pub fn format_size(size_bytes: u64) -> String {
    let kilo_bytes = size_bytes / 1024;
    let mega_bytes = kilo_bytes / 1024;
    if mega_bytes > 0 {
        format!("{} MB", mega_bytes)
    } else if kilo_bytes > 0 {
        format!("{} KB", kilo_bytes)
    } else {
        format!("{} Bytes", size_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_formatting_truncates_to_largest_unit() {
        assert_eq!(format_size(0), "0 Bytes");
        assert_eq!(format_size(500), "500 Bytes");
        assert_eq!(format_size(1023), "1023 Bytes");
        assert_eq!(format_size(2048), "2 KB");
        assert_eq!(format_size(2047), "1 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3 MB");
        // Truncating, not rounding
        assert_eq!(format_size(3 * 1024 * 1024 + 1024 * 1023), "3 MB");
    }

    #[test]
    fn duration_formatting_is_minutes_seconds() {
        assert_eq!(format_duration_ms(0), "00:00");
        assert_eq!(format_duration_ms(999), "00:00");
        assert_eq!(format_duration_ms(61_000), "01:01");
        assert_eq!(format_duration_ms(3_600_000), "60:00");
    }
}
