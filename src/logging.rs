// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Tracing subscriber setup for the e2e framework.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Map a logger mode to a filter directive, falling back to `info`
pub fn level_for_mode(mode: &str) -> &'static str {
    match mode.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => "info",
    }
}

/// Open the log file for appending, creating its parent directory if needed
pub fn open_log_file(location: &Path) -> io::Result<File> {
    if let Some(parent) = location.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(location)
}

/// Filter for `mode`, overridden by `RUST_LOG` when set
pub fn filter_for_mode(mode: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for_mode(mode)))
}

/// Where log output goes
#[derive(Debug)]
pub enum LogTarget {
    File(File),
    /// The log file could not be opened
    Stderr(io::Error),
}

/// The log file at `location`, or stderr when it cannot be opened
pub fn log_target(location: &Path) -> LogTarget {
    match open_log_file(location) {
        Ok(file) => LogTarget::File(file),
        Err(e) => LogTarget::Stderr(e),
    }
}

/// Initialize the global subscriber writing to `location` at the level given by `mode`.
///
/// `RUST_LOG` takes precedence over `mode` when set. If the log file cannot be
/// opened, logs go to stderr instead. Returns false when a subscriber was
/// already installed, e.g. when setup runs again after teardown.
pub fn init(location: &Path, mode: &str) -> bool {
    match log_target(location) {
        LogTarget::File(file) => tracing_subscriber::fmt()
            .with_env_filter(filter_for_mode(mode))
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
            .is_ok(),
        LogTarget::Stderr(e) => {
            let installed = tracing_subscriber::fmt()
                .with_env_filter(filter_for_mode(mode))
                .with_writer(io::stderr)
                .try_init()
                .is_ok();
            warn!(
                "Unable to open log file {}: {}, logging to stderr",
                location.display(),
                e
            );
            installed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::io::Write;

    fn with_rust_log<T>(value: Option<&str>, f: impl FnOnce() -> T) -> T {
        let previous = env::var_os("RUST_LOG");
        match value {
            Some(value) => env::set_var("RUST_LOG", value),
            None => env::remove_var("RUST_LOG"),
        }
        let result = f();
        match previous {
            Some(value) => env::set_var("RUST_LOG", value),
            None => env::remove_var("RUST_LOG"),
        }
        result
    }

    #[test]
    fn test_level_for_known_modes() {
        assert_eq!(level_for_mode("debug"), "debug");
        assert_eq!(level_for_mode("DEBUG"), "debug");
        assert_eq!(level_for_mode("trace"), "trace");
        assert_eq!(level_for_mode("warning"), "warn");
        assert_eq!(level_for_mode("error"), "error");
        assert_eq!(level_for_mode("info"), "info");
    }

    #[test]
    fn test_level_for_unknown_mode_is_info() {
        assert_eq!(level_for_mode("verbose"), "info");
        assert_eq!(level_for_mode(""), "info");
    }

    #[test]
    fn test_open_log_file_creates_parent_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let location = dir.path().join("nested").join("syncer.log");

        writeln!(open_log_file(&location).unwrap(), "first").unwrap();
        writeln!(open_log_file(&location).unwrap(), "second").unwrap();

        let contents = fs::read_to_string(&location).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn test_open_log_file_fails_under_a_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        assert!(open_log_file(&blocker.join("syncer.log")).is_err());
    }

    #[test]
    #[serial]
    fn test_filter_uses_mode_without_rust_log() {
        let filter = with_rust_log(None, || filter_for_mode("DEBUG"));
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    #[serial]
    fn test_rust_log_overrides_mode() {
        let filter = with_rust_log(Some("warn"), || filter_for_mode("debug"));
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn test_log_target_is_file_when_openable() {
        let dir = tempfile::tempdir().unwrap();

        let target = log_target(&dir.path().join("log").join("syncer.log"));

        assert!(matches!(target, LogTarget::File(_)));
        assert!(dir.path().join("log").join("syncer.log").exists());
    }

    #[test]
    fn test_log_target_falls_back_to_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let target = log_target(&blocker.join("syncer.log"));

        assert!(matches!(target, LogTarget::Stderr(_)));
    }

    #[test]
    #[serial]
    fn test_second_init_keeps_installed_subscriber() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        init(&dir.path().join("first.log"), "info");
        let installed = init(&blocker.join("second.log"), "debug");

        assert!(!installed);
    }
}
