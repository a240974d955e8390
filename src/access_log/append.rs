//! Append-only log file shared by concurrent writers.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::types::{Error, Result};

/// Append-only log file.
///
/// One instance per file, shared through `Arc`. The lock is held for the
/// open-append-write-close sequence only, so concurrent appends never
/// interleave partial lines.
#[derive(Debug)]
pub struct AppendLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl AppendLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `text` verbatim, creating the file if needed.
    pub fn append(&self, text: &str) -> Result<()> {
        // The guard protects no data, so a poisoned lock is still usable.
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }

        let mut file = options.open(&self.path).map_err(Error::LogWrite)?;
        file.write_all(text.as_bytes()).map_err(Error::LogWrite)?;
        tracing::debug!(path = %self.path.display(), bytes = text.len(), "log line appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_append_creates_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let log = AppendLog::new(dir.path().join("api.log"));

        log.append("first\n").unwrap();
        log.append("second\n").unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn test_append_failure_is_log_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let log = AppendLog::new(dir.path().join("missing-dir").join("api.log"));

        let err = log.append("line\n").unwrap_err();
        assert!(matches!(err, Error::LogWrite(_)));

        // The lock is released on the failure path.
        let err = log.append("line\n").unwrap_err();
        assert!(matches!(err, Error::LogWrite(_)));
    }

    #[test]
    fn test_parallel_appends_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(AppendLog::new(dir.path().join("api.log")));
        let line = format!("{}\n", "x".repeat(4096));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let log = Arc::clone(&log);
                let line = line.clone();
                std::thread::spawn(move || log.append(&line).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 16);
        assert!(lines.iter().all(|l| l.len() == 4096));
    }
}
