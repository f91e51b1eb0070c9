mod common;

use common::run_memovox;

#[test]
fn memovox_help_shows_usage() {
    let output = run_memovox(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        output.status.success(),
        "--help should succeed\nstdout:\n{}\nstderr:\n{}",
        stdout,
        stderr
    );
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("Commands:"));
    assert!(stdout.contains("record"));
    assert!(stdout.contains("play"));
}

#[test]
fn memovox_version_shows_version() {
    let output = run_memovox(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("memovox "));
}

#[test]
fn completions_bash_outputs_script() {
    let output = run_memovox(&["completions", "bash"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(
        stdout.contains("memovox"),
        "expected completion output to reference command name\nstdout:\n{}",
        stdout
    );
}

#[test]
fn list_with_no_memos_reports_empty() {
    let output = run_memovox(&["list"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("No memos found"));
}

#[test]
fn list_json_emits_an_array() {
    let output = run_memovox(&["list", "--json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("list --json should emit valid JSON");
    assert!(parsed.is_array());
}

#[test]
fn config_init_writes_default_config() {
    let env = common::TestEnv::new();

    let output = env.run(&["config", "init"]);
    assert!(
        output.status.success(),
        "config init should succeed\nstderr:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let config_path = env.config_path();
    assert!(config_path.exists());

    let content = std::fs::read_to_string(&config_path).expect("read generated config");
    assert!(content.contains("[general]"));
    assert!(content.contains("[recorder]"));
    assert!(content.contains("[playback]"));

    // A second init without --force refuses to overwrite
    let again = env.run(&["config", "init"]);
    assert!(!again.status.success());
}

#[test]
fn list_survives_long_multibyte_titles() {
    let env = common::TestEnv::new();

    // Longer than the title column, all multibyte
    let title = "€".repeat(27);
    std::fs::write(env.memos_dir().join(format!("{title}.wav")), b"not audio")
        .expect("write memo file");

    let output = env.run(&["list"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        output.status.success(),
        "list should not crash on multibyte titles\nstderr:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("€€€"));
    assert!(stdout.contains("..."));
}

#[test]
fn verbose_flag_enables_debug_logging() {
    let env = common::TestEnv::new();

    let quiet = env.run(&["list"]);
    assert!(quiet.status.success());
    assert!(!String::from_utf8_lossy(&quiet.stderr).contains("found 0 memos"));

    let verbose = env.run(&["--verbose", "list"]);
    assert!(verbose.status.success());
    assert!(
        String::from_utf8_lossy(&verbose.stderr).contains("found 0 memos"),
        "expected scan debug line on stderr\nstderr:\n{}",
        String::from_utf8_lossy(&verbose.stderr)
    );
}

#[test]
fn playing_unknown_memo_fails() {
    let output = run_memovox(&["play", "does-not-exist"]);
    assert!(!output.status.success());
}
