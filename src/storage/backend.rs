//! Storage backend abstraction.
//!
//! This module defines the [`Storage`] trait that abstracts over durable
//! persistence. The store only ever needs one named record, so the trait is a
//! minimal keyed read/write of serialized text rather than a generic database.

use crate::domain::error::Result;

/// Abstraction over durable storage backends.
///
/// A backend holds named records of serialized text. Writes must replace the
/// whole record or leave the previous one intact; a reader never observes a
/// half-written record.
///
/// # Implementations
///
/// - [`JsonFileStorage`](crate::storage::JsonFileStorage): one JSON file per key with atomic writes (default)
/// - [`MemoryStorage`](crate::storage::MemoryStorage): in-process map with failure injection, for tests
///
/// # Examples
///
/// ```no_run
/// use staff_directory::storage::{JsonFileStorage, Storage};
/// use std::path::PathBuf;
///
/// let mut storage = JsonFileStorage::new(PathBuf::from("/tmp/staff"))?;
/// storage.write("staff-storage", "{}")?;
/// assert_eq!(storage.read("staff-storage")?.as_deref(), Some("{}"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Storage: Send {
    /// Reads the record stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing has been stored under the key yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. The previous record must remain
    /// readable in that case.
    fn write(&mut self, key: &str, contents: &str) -> Result<()>;
}
