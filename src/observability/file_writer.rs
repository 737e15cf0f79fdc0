//! Append-only line writer with size-based rotation.
//!
//! Trace lines go to a single file. Before each write the file size is
//! checked against the [`RotationPolicy`]; an oversized file is renamed to
//! `<name>.<timestamp>` and only the newest backups are kept.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

/// When to rotate and how many rotated files to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    pub max_bytes: u64,
    pub max_backups: usize,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            max_backups: 3,
        }
    }
}

/// Thread-safe rotating writer. The file is opened lazily on first write.
pub struct FileWriter {
    path: PathBuf,
    policy: RotationPolicy,
    file: Mutex<Option<File>>,
}

impl FileWriter {
    pub const fn new(path: PathBuf, policy: RotationPolicy) -> Self {
        Self {
            path,
            policy,
            file: Mutex::new(None),
        }
    }

    /// Appends `line` plus a newline and flushes.
    ///
    /// # Errors
    ///
    /// Returns an error if rotating, opening or writing the file fails, or if
    /// the lock was poisoned.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("trace writer lock poisoned: {e}")))?;

        if self.needs_rotation() {
            *guard = None;
            self.rotate()?;
        }

        if guard.is_none() {
            *guard = Some(OpenOptions::new().create(true).append(true).open(&self.path)?);
        }
        let Some(file) = guard.as_mut() else {
            return Err(io::Error::new(io::ErrorKind::Other, "trace file not open"));
        };

        writeln!(file, "{line}")?;
        file.flush()
    }

    fn needs_rotation(&self) -> bool {
        fs::metadata(&self.path).is_ok_and(|m| m.len() > self.policy.max_bytes)
    }

    fn rotate(&self) -> io::Result<()> {
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.9f");
        let mut backup = self.path.clone().into_os_string();
        backup.push(format!(".{stamp}"));

        if self.path.exists() {
            fs::rename(&self.path, PathBuf::from(backup))?;
        }
        self.prune_backups()
    }

    /// Removes the oldest backups beyond the policy's limit.
    fn prune_backups(&self) -> io::Result<()> {
        let (Some(dir), Some(name)) = (self.path.parent(), self.path.file_name().and_then(|n| n.to_str())) else {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "trace file has no name"));
        };
        let prefix = format!("{name}.");

        // Timestamp suffixes sort chronologically.
        let mut backups: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(&prefix))
            })
            .collect();
        backups.sort();

        let excess = backups.len().saturating_sub(self.policy.max_backups);
        for old in backups.iter().take(excess) {
            let _ = fs::remove_file(old);
        }
        Ok(())
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("path", &self.path)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
