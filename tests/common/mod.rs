use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

pub fn run_memovox(args: &[&str]) -> Output {
    TestEnv::new().run(args)
}

pub struct TestEnv {
    home: TempDir,
    config: TempDir,
    data: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temporary HOME dir"),
            config: tempfile::tempdir().expect("create temporary XDG config dir"),
            data: tempfile::tempdir().expect("create temporary XDG data dir"),
        }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_memovox"))
            .args(args)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.config.path())
            .env("XDG_DATA_HOME", self.data.path())
            .env_remove("RUST_LOG")
            .output()
            .expect("failed to execute memovox binary")
    }

    /// Memos directory the default settings resolve to under this
    /// environment's XDG data dir
    #[allow(dead_code)]
    pub fn memos_dir(&self) -> PathBuf {
        let dir = self.data.path().join("memovox").join("memos");
        std::fs::create_dir_all(&dir).expect("create memos dir");
        dir
    }

    #[allow(dead_code)]
    pub fn config_path(&self) -> PathBuf {
        let output = self.run(&["config", "path"]);
        assert!(
            output.status.success(),
            "config path should succeed\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );

        let path = String::from_utf8_lossy(&output.stdout);
        PathBuf::from(path.trim())
    }
}
