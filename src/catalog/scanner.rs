//! Recursive file-system scan producing catalog entries

use chrono::{DateTime, Local};
use std::path::Path;

use crate::audio::probe_duration_ms;
use crate::catalog::CatalogEntry;

/// Scan `root` recursively for files with the given extension.
///
/// Entries appear in the order the directory enumeration yields them;
/// unreadable directories and non-matching files are skipped without
/// surfacing an error. Nothing is cached between calls.
pub fn scan(root: &Path, extension: &str) -> Vec<CatalogEntry> {
    let mut entries = Vec::new();
    visit_dir(root, extension, &mut entries);
    tracing::debug!("Scan of {} found {} memos", root.display(), entries.len());
    entries
}

fn visit_dir(dir: &Path, extension: &str, entries: &mut Vec<CatalogEntry>) {
    let read_dir = match std::fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(err) => {
            tracing::debug!("Skipping unreadable directory {}: {}", dir.display(), err);
            return;
        }
    };

    for dir_entry in read_dir.flatten() {
        let path = dir_entry.path();
        if path.is_dir() {
            visit_dir(&path, extension, entries);
        } else if matches_extension(&path, extension) {
            if let Some(entry) = build_entry(&path) {
                entries.push(entry);
            }
        } else {
            tracing::debug!("Skipped: {}", path.display());
        }
    }
}

fn matches_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

fn build_entry(path: &Path) -> Option<CatalogEntry> {
    let stem = path.file_stem()?.to_string_lossy().to_string();

    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(err) => {
            tracing::debug!("Skipping unreadable file {}: {}", path.display(), err);
            return None;
        }
    };

    let modified_at: DateTime<Local> = metadata
        .modified()
        .map(DateTime::from)
        .unwrap_or_else(|_| Local::now());

    // Duration defaults to zero when the container cannot be probed.
    let duration_ms = probe_duration_ms(path).unwrap_or(0);

    tracing::debug!(
        "Memo found: {}, size: {} bytes",
        path.display(),
        metadata.len()
    );

    Some(CatalogEntry {
        id: stem.clone(),
        title: stem,
        modified_at,
        duration_ms,
        size_bytes: metadata.len(),
        path: path.to_path_buf(),
    })
}
