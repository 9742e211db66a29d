//! Shared integration-test harness for running the `vitrine` binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

/// Runs `vitrine` with the given arguments and waits for it to exit.
///
/// Logging is silenced so stderr only carries the final error line.
#[allow(clippy::missing_panics_doc)]
pub fn run_vitrine(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vitrine"))
        .args(args)
        .env_remove("VITRINE_CONFIG")
        .env_remove("VITRINE_LOG_LEVEL")
        .env_remove("VITRINE_LOG_FORMAT")
        .env("VITRINE_COLOR", "never")
        .output()
        .expect("failed to spawn vitrine")
}

/// Absolute path of a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Stdout as a lossy string.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr as a lossy string.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
