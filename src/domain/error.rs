//! Error types for the staff directory.
//!
//! This module defines the centralized error type [`DirectoryError`] and a type alias
//! [`Result`] used throughout the crate. Every variant is a local, recoverable
//! condition: nothing here is meant to terminate the process.

use thiserror::Error;

/// The main error type for staff directory operations.
///
/// Store mutations report [`InvalidInput`](DirectoryError::InvalidInput) and
/// [`NotFound`](DirectoryError::NotFound) synchronously without touching state.
/// [`Storage`](DirectoryError::Storage) is surfaced alongside a mutation that was
/// still applied in memory.
///
/// # Examples
///
/// ```
/// use staff_directory::DirectoryError;
///
/// let err = DirectoryError::NotFound { entity: "employee", id: "42".to_string() };
/// assert_eq!(err.to_string(), "employee not found: 42");
/// ```
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// A mutation was called with required fields missing or blank.
    #[error("invalid {entity}: missing required field(s): {}", fields.join(", "))]
    InvalidInput {
        /// Entity kind the mutation targeted (`"employee"`, `"grade level"`).
        entity: &'static str,
        /// Names of the missing fields, in declaration order.
        fields: Vec<&'static str>,
    },

    /// An update targeted an id that is not in the collection.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind the update targeted.
        entity: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// Durable persistence failed to read or write.
    ///
    /// In-memory state stays authoritative when this is reported.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The persisted envelope could not be parsed or migrated.
    ///
    /// Logged during load and treated as "no prior state"; never returned from
    /// a store mutation.
    #[error("Malformed persisted data: {0}")]
    MalformedPersistedData(String),

    /// The persisted envelope was written by a newer schema version.
    ///
    /// The data is not discarded: the store keeps a backup and starts empty.
    #[error("stored data version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version found in the stored envelope.
        found: u32,
        /// Highest version this build can read.
        supported: u32,
    },

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or could not be read.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for staff directory operations.
pub type Result<T> = std::result::Result<T, DirectoryError>;
