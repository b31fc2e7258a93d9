//! Log output setup.
//!
//! While the terminal UI owns the screen, events are written to a file;
//! every other command logs to stderr. `RUST_LOG` takes precedence over the
//! level passed on the command line.

use std::env;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub fn default_log_path() -> PathBuf {
    env::temp_dir().join("taskcard.log")
}

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Send log events to stderr.
pub fn init_stderr(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Append log events to `path`. The caller decides what to do when the file
/// cannot be opened; no subscriber is installed in that case.
pub fn init_file(level: &str, path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_path_is_in_temp_dir() {
        let path = default_log_path();
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("taskcard.log"));
        assert!(path.starts_with(env::temp_dir()));
    }

    #[test]
    fn test_init_file_creates_log() {
        let path = env::temp_dir().join(format!("taskcard-log-{}.log", std::process::id()));
        init_file("debug", &path).unwrap();
        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_init_file_reports_unwritable_path() {
        let path = env::temp_dir()
            .join(format!("taskcard-missing-{}", std::process::id()))
            .join("nested")
            .join("taskcard.log");
        assert!(init_file("debug", &path).is_err());
        assert!(!path.exists());
    }
}
