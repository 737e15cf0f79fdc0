//! In-memory storage backend.
//!
//! Holds records in a shared map so a test can keep a handle to the same
//! records the store writes to, inspect them, and inject read or write
//! failures.

use crate::domain::error::{DirectoryError, Result};
use crate::storage::backend::Storage;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
}

/// Shared in-memory storage.
///
/// Clones share the same records and failure switches.
///
/// # Examples
///
/// ```
/// use staff_directory::storage::{MemoryStorage, Storage};
///
/// let handle = MemoryStorage::default();
/// let mut backend = handle.clone();
/// backend.write("staff-storage", "{}")?;
/// assert_eq!(handle.get("staff-storage").as_deref(), Some("{}"));
/// # Ok::<(), staff_directory::DirectoryError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStorage {
    /// Creates storage pre-populated with one record.
    #[must_use]
    pub fn with_record(key: &str, contents: &str) -> Self {
        let storage = Self::default();
        storage.lock().records.insert(key.to_string(), contents.to_string());
        storage
    }

    /// Returns the record stored under `key`, bypassing failure injection.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().records.get(key).cloned()
    }

    /// Makes subsequent reads fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Makes subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Every critical section is a single map operation, so poisoning is ignored.
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let inner = self.lock();
        if inner.fail_reads {
            return Err(DirectoryError::Storage(format!(
                "simulated read failure for {key}"
            )));
        }
        Ok(inner.records.get(key).cloned())
    }

    fn write(&mut self, key: &str, contents: &str) -> Result<()> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(DirectoryError::Storage(format!(
                "simulated write failure for {key}"
            )));
        }
        inner.records.insert(key.to_string(), contents.to_string());
        inner.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_write_keeps_previous_record() {
        let handle = MemoryStorage::with_record("k", "old");
        let mut backend = handle.clone();

        handle.set_fail_writes(true);
        assert!(backend.write("k", "new").is_err());
        assert_eq!(handle.get("k").as_deref(), Some("old"));
        assert_eq!(handle.write_count(), 0);

        handle.set_fail_writes(false);
        backend.write("k", "new").unwrap();
        assert_eq!(handle.get("k").as_deref(), Some("new"));
        assert_eq!(handle.write_count(), 1);
    }

    #[test]
    fn read_failure_is_a_storage_error() {
        let handle = MemoryStorage::with_record("k", "v");
        handle.set_fail_reads(true);
        assert!(matches!(handle.read("k"), Err(DirectoryError::Storage(_))));
    }
}
