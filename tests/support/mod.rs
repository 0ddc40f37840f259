use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// An isolated data directory for one test.
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("tasks.json")
    }

    pub fn read_db(&self) -> std::io::Result<serde_json::Value> {
        let raw = fs::read_to_string(self.db_path())?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// `tm` pointed at this home's data file, run from inside it.
    pub fn tm(&self) -> Command {
        let mut cmd = Command::cargo_bin("tm").expect("tm binary");
        cmd.current_dir(self.path())
            .env("TM_DB", self.db_path())
            .env_remove("TM_HOME")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Add a task and assert success.
    pub fn add(&self, args: &[&str]) {
        self.tm().arg("add").args(args).assert().success();
    }
}
