//! JSON file-based storage backend.
//!
//! Each key maps to `<dir>/<key>.json`. Writes go to a temporary sibling file
//! that is then renamed over the target, so a crash mid-write leaves the
//! previous record intact.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(n) - reads the whole record
//! - **Write**: O(n) - rewrites the whole record
//! - **Best for**: a few thousand records, one write per user action

use crate::domain::error::{DirectoryError, Result};
use crate::storage::backend::Storage;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// JSON file storage backend.
///
/// # Thread Safety
///
/// This type is `Send` but not `Sync`. The store drives it from a single
/// thread, one mutation at a time.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    /// Directory holding one file per key.
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Opens a storage directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use staff_directory::storage::JsonFileStorage;
    /// use std::path::PathBuf;
    ///
    /// let storage = JsonFileStorage::new(PathBuf::from("/tmp/staff"))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(dir: PathBuf) -> Result<Self> {
        tracing::debug!(dir = ?dir, "initializing JSON file storage");
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Returns the directory records are stored in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file path backing `key`.
    ///
    /// Keys are restricted to a portable file-name alphabet so a key can never
    /// escape the storage directory.
    ///
    /// # Errors
    ///
    /// Returns a storage error for empty keys or keys with other characters.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if valid {
            Ok(self.dir.join(format!("{key}.json")))
        } else {
            Err(DirectoryError::Storage(format!("invalid storage key: {key:?}")))
        }
    }
}

impl Storage for JsonFileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        let _span = tracing::debug_span!("json_file_read", path = ?path).entered();

        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::debug!(bytes = contents.len(), "record loaded");
                Ok(Some(contents))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("no record stored yet");
                Ok(None)
            }
            Err(e) => Err(DirectoryError::Storage(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    fn write(&mut self, key: &str, contents: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let _span = tracing::debug_span!("json_file_write", path = ?path, bytes = contents.len()).entered();

        let tmp_path = path.with_extension("json.tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, contents).map_err(|e| {
            DirectoryError::Storage(format!("failed to write {}: {e}", tmp_path.display()))
        })?;

        tracing::trace!("renaming temporary file to final location");
        if let Err(e) = std::fs::rename(&tmp_path, &path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(DirectoryError::Storage(format!(
                "failed to replace {}: {e}",
                path.display()
            )));
        }

        tracing::debug!("record saved");
        Ok(())
    }
}
