//! Common test utilities for daytally integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't pollute
//! the user's `~/.local/share/daytally/` or `~/.config/daytally/` directories.

#![allow(dead_code)]

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with isolated data and config storage.
///
/// Each `TestEnv` creates two temporary directories:
/// - `data_dir`: Holds daytally.db and config.kdl (via `DT_DATA_DIR`)
/// - `config_dir`: Stands in for the system config directory (via `DT_CONFIG_DIR`)
///
/// The `dt()` method returns a `Command` that sets both per-invocation,
/// making tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
    pub config_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with isolated directories.
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a new test environment and initialize daytally.
    pub fn init() -> Self {
        let env = Self::new();
        env.dt().args(["system", "init"]).assert().success();
        env
    }

    /// Get a Command for the dt binary with isolated directories.
    pub fn dt(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_dt"));
        cmd.current_dir(self.data_dir.path());
        cmd.env("DT_DATA_DIR", self.data_dir.path());
        cmd.env("DT_CONFIG_DIR", self.config_dir.path());
        cmd.env_remove("DT_OWNER");
        cmd.env_remove("DT_LOG");
        cmd
    }

    /// Run a command expected to succeed and parse its JSON output.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.dt().args(args).assert().success().get_output().clone();
        serde_json::from_slice(&output.stdout).unwrap()
    }

    /// Add a task and return its ID.
    pub fn add_task(&self, args: &[&str]) -> String {
        let mut full = vec!["task", "add"];
        full.extend_from_slice(args);
        self.json(&full)["id"].as_str().unwrap().to_string()
    }

    /// Get the path to the data directory.
    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
