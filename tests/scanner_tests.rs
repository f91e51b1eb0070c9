use anyhow::Result;
use std::path::Path;
use tempfile::tempdir;

use memovox::catalog;

fn write_wav(path: &Path, seconds: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for _ in 0..(8000 * seconds) {
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn scan_finds_matching_files_at_any_depth() -> Result<()> {
    let tmp = tempdir()?;
    let root = tmp.path();

    write_wav(&root.join("top.wav"), 1);
    std::fs::create_dir_all(root.join("a/b"))?;
    write_wav(&root.join("a/nested.wav"), 1);
    write_wav(&root.join("a/b/deep.wav"), 2);

    // Non-matching files and empty directories are skipped
    std::fs::write(root.join("notes.txt"), "not audio")?;
    std::fs::write(root.join("a/cover.png"), [0u8; 16])?;
    std::fs::create_dir_all(root.join("empty"))?;

    let entries = catalog::scan(root, "wav");
    assert_eq!(entries.len(), 3);

    let mut ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["deep", "nested", "top"]);

    let deep = entries.iter().find(|e| e.id == "deep").unwrap();
    assert_eq!(deep.duration_ms, 2000);
    assert_eq!(deep.duration_label(), "00:02");
    assert!(deep.size_bytes > 0);

    Ok(())
}

#[test]
fn scan_of_missing_or_empty_root_is_empty() -> Result<()> {
    let tmp = tempdir()?;

    assert!(catalog::scan(tmp.path(), "wav").is_empty());
    assert!(catalog::scan(&tmp.path().join("nope"), "wav").is_empty());

    Ok(())
}

#[test]
fn extension_matching_is_case_insensitive() -> Result<()> {
    let tmp = tempdir()?;
    write_wav(&tmp.path().join("SHOUTY.WAV"), 1);

    let entries = catalog::scan(tmp.path(), "wav");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, "SHOUTY");

    Ok(())
}

#[test]
fn unreadable_container_defaults_to_zero_duration() -> Result<()> {
    let tmp = tempdir()?;
    std::fs::write(tmp.path().join("broken.wav"), b"not a riff header")?;

    let entries = catalog::scan(tmp.path(), "wav");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].duration_ms, 0);
    assert_eq!(entries[0].duration_label(), "00:00");

    Ok(())
}

#[test]
fn entry_labels_format_for_display() -> Result<()> {
    let tmp = tempdir()?;
    write_wav(&tmp.path().join("memo_123.wav"), 1);

    let entries = catalog::scan(tmp.path(), "wav");
    let entry = &entries[0];

    assert_eq!(entry.title, "memo_123");
    assert_eq!(entry.size_label(), catalog::format_size(entry.size_bytes));
    // day-month-year
    assert_eq!(entry.date_label().matches('-').count(), 2);

    Ok(())
}
