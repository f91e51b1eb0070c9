//! CLI command implementations

use anyhow::{Context, Result};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::audio::{CpalCapture, RodioPlayback};
use crate::catalog::{self, CatalogEntry};
use crate::cli::args::ConfigCommand;
use crate::config::Settings;
use crate::session::{PlayerController, PlayerState, RecorderController, RecorderState};

/// Record a new memo interactively.
///
/// Capture starts immediately; p pauses, r resumes, an empty line
/// stops and saves, c discards the take.
pub async fn record_memo(settings: &Settings, title: Option<String>) -> Result<()> {
    settings.ensure_dirs()?;

    let capture = CpalCapture::new(settings);
    let mut recorder = RecorderController::new(capture, settings);

    recorder
        .start(&settings.general.memos_dir, &settings.audio.extension)
        .context("Failed to start recording")?;

    println!(
        "Recording to {}",
        recorder
            .output_path()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    );
    println!("[p] pause  [r] resume  [c] cancel  [Enter] stop and save");

    let mut ticker = tokio::time::interval(Duration::from_millis(recorder.tick_ms()));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ticks_per_second = (1000 / recorder.tick_ms().max(1)).max(1);
    let mut tick_count: u64 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                recorder.tick();
                tick_count += 1;
                if recorder.state() == RecorderState::Recording
                    && tick_count % ticks_per_second == 0
                {
                    print!("\r  {} ", catalog::format_duration_ms(recorder.elapsed_ms()));
                    std::io::stdout().flush().ok();
                }
            }
            line = lines.next_line() => {
                let line = line?.unwrap_or_default();
                match line.trim() {
                    "p" => {
                        if recorder.state() == RecorderState::Recording {
                            recorder.pause()?;
                            println!("Paused at {}", catalog::format_duration_ms(recorder.elapsed_ms()));
                        }
                    }
                    "r" => {
                        if recorder.state() == RecorderState::Paused {
                            recorder.resume()?;
                            println!("Resumed");
                        }
                    }
                    "c" => {
                        recorder.stop()?;
                        recorder.cancel()?;
                        println!("\nRecording discarded");
                        return Ok(());
                    }
                    "" => {
                        recorder.stop()?;
                        let path = recorder.save(title.as_deref())?;
                        println!(
                            "\nSaved {} ({})",
                            path.display(),
                            catalog::format_duration_ms(probe_or_zero(&path))
                        );
                        return Ok(());
                    }
                    other => {
                        println!("Unknown command: {other}");
                    }
                }
            }
        }
    }
}

fn probe_or_zero(path: &std::path::Path) -> u64 {
    crate::audio::probe_duration_ms(path).unwrap_or(0)
}

/// List memos found in the memos directory
pub fn list_memos(
    settings: &Settings,
    limit: usize,
    search: Option<String>,
    json: bool,
) -> Result<()> {
    let mut entries = catalog::scan(&settings.general.memos_dir, &settings.audio.extension);

    if let Some(query) = search {
        let query = query.to_lowercase();
        entries.retain(|e| e.title.to_lowercase().contains(&query));
    }
    entries.truncate(limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No memos found");
        return Ok(());
    }

    println!(
        "{:<28} {:<12} {:<10} {:<10}",
        "Title", "Date", "Duration", "Size"
    );
    println!("{}", "-".repeat(62));

    for entry in &entries {
        println!(
            "{:<28} {:<12} {:<10} {:<10}",
            truncate(&entry.title, 26),
            entry.date_label(),
            entry.duration_label(),
            entry.size_label()
        );
    }

    Ok(())
}

/// Play a memo, polling the position for a progress readout
pub async fn play_memo(settings: &Settings, id: &str) -> Result<()> {
    let entry = find_memo(settings, id)?;

    let device = RodioPlayback::new()?;
    let mut player = PlayerController::new(device, settings);

    player
        .load(&entry.path)
        .with_context(|| format!("Failed to load {}", entry.path.display()))?;
    player.play()?;

    println!("Playing {}", entry.title);

    let mut ticker = tokio::time::interval(Duration::from_millis(settings.playback.poll_ms));
    loop {
        ticker.tick().await;
        player.poll();

        print!(
            "\r  {} / {} ({:>3.0}%) ",
            catalog::format_duration_ms(player.position_ms()),
            catalog::format_duration_ms(player.duration_ms()),
            player.progress() * 100.0
        );
        std::io::stdout().flush().ok();

        if player.state() != PlayerState::Playing {
            break;
        }
    }

    println!();
    Ok(())
}

/// Rename a memo on disk, preserving its extension
pub fn rename_memo(settings: &Settings, id: &str, title: &str) -> Result<()> {
    let entry = find_memo(settings, id)?;

    let mut target = entry.path.with_file_name(title);
    if let Some(ext) = entry.path.extension() {
        target.set_extension(ext);
    }

    // A vanished source is a no-op, not an error
    if entry.path.exists() {
        std::fs::rename(&entry.path, &target)
            .with_context(|| format!("Failed to rename {}", entry.path.display()))?;
        println!("Renamed {} -> {}", entry.title, title);
    }

    Ok(())
}

/// Delete a memo from disk
pub fn delete_memo(settings: &Settings, id: &str) -> Result<()> {
    let entry = find_memo(settings, id)?;

    if entry.path.exists() {
        std::fs::remove_file(&entry.path)
            .with_context(|| format!("Failed to delete {}", entry.path.display()))?;
        println!("Deleted {}", entry.title);
    }

    Ok(())
}

/// Configuration management commands
pub fn config_command(settings: &Settings, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let content = toml::to_string_pretty(settings)?;
            println!("{content}");
        }
        ConfigCommand::Path => {
            println!("{}", Settings::config_path()?.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {} (use --force to overwrite)",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Wrote default config to {}", path.display());
        }
    }
    Ok(())
}

/// Find a memo by exact or prefix ID match
fn find_memo(settings: &Settings, id: &str) -> Result<CatalogEntry> {
    let entries = catalog::scan(&settings.general.memos_dir, &settings.audio.extension);

    entries
        .iter()
        .find(|e| e.id == id)
        .or_else(|| entries.iter().find(|e| e.id.starts_with(id)))
        .cloned()
        .with_context(|| format!("No memo matching '{id}'"))
}

// Counts chars, not bytes, so multibyte titles never split mid-character
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_titles_intact() {
        assert_eq!(truncate("memo", 26), "memo");
        assert_eq!(truncate("", 26), "");
    }

    #[test]
    fn truncate_handles_multibyte_titles() {
        let title = "€".repeat(27);
        let truncated = truncate(&title, 26);
        assert_eq!(truncated, format!("{}...", "€".repeat(23)));

        assert_eq!(truncate("日本語のメモタイトルですよ", 10), "日本語のメモタ...");
    }
}
