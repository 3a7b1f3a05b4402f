//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture file or directory.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Get a Command for the modplan binary.
pub fn modplan_cmd() -> Command {
  cargo_bin_cmd!("modplan")
}

/// A modplan command reading descriptors from `fixture`.
pub fn fixture_cmd(subcommand: &str, fixture: &str) -> Command {
  let mut cmd = modplan_cmd();
  cmd.arg(subcommand).arg("-m").arg(fixture_path(fixture));
  cmd
}

/// Isolated directory for output files.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Path of a file inside the temp directory.
  pub fn path(&self, relative: &str) -> PathBuf {
    self.temp.path().join(relative)
  }

  /// Read a file relative to the temp directory.
  pub fn read_file(&self, relative: &str) -> String {
    std::fs::read_to_string(self.path(relative)).unwrap()
  }
}
