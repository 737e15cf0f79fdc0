//! Persisted envelope format.
//!
//! The whole directory is stored as a single record:
//!
//! ```json
//! {
//!   "version": 1,
//!   "employees": [
//!     {
//!       "id": "0b8e…",
//!       "fullName": "Ann Smith",
//!       "email": "ann@example.com",
//!       "phoneNumber": "+1 555 0100",
//!       "country": "Canada",
//!       "state": "Ontario",
//!       "address": "1 King Street",
//!       "role": "Recruiter",
//!       "department": "HR",
//!       "gradeLevel": "5f2c…"
//!     }
//!   ],
//!   "gradeLevels": [{ "id": "5f2c…", "name": "Senior" }],
//!   "savedAt": "2024-05-01T09:30:00+00:00"
//! }
//! ```
//!
//! A record without `version` is legacy data and goes through
//! [`crate::storage::migration`] before it is deserialized into [`Envelope`].

use crate::domain::{Employee, GradeLevel};
use serde::{Deserialize, Serialize};

/// Version written by this build.
pub const CURRENT_VERSION: u32 = 1;

/// Top-level structure serialized to durable storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Storage format version; see [`CURRENT_VERSION`].
    pub version: u32,

    #[serde(default)]
    pub employees: Vec<Employee>,

    #[serde(default)]
    pub grade_levels: Vec<GradeLevel>,

    /// RFC 3339 timestamp of the last save. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            employees: Vec::new(),
            grade_levels: Vec::new(),
            saved_at: None,
        }
    }
}

impl Envelope {
    /// Serializes the envelope for storage, stamping the current version and time.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails, which does not happen for
    /// well-formed records.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let stamped = Self {
            version: CURRENT_VERSION,
            saved_at: Some(chrono::Utc::now().to_rfc3339()),
            ..self.clone()
        };
        serde_json::to_string_pretty(&stamped)
    }
}
