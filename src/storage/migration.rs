//! Schema migrations for the persisted envelope.
//!
//! Migrations are an ordered list of steps keyed by the version they upgrade
//! from. Loading applies only the steps between the record's version and
//! [`CURRENT_VERSION`], one after another, on the raw JSON value, and only then
//! deserializes the typed [`Envelope`].
//!
//! A record without a `version` key is version 0.

use crate::domain::error::{DirectoryError, Result};
use crate::domain::new_id;
use crate::storage::models::{Envelope, CURRENT_VERSION};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

type Object = Map<String, Value>;

/// One upgrade step from `from` to `from + 1`.
pub struct Migration {
    /// Version this step upgrades from.
    pub from: u32,

    /// Short description for logs.
    pub description: &'static str,

    apply: fn(&mut Object) -> std::result::Result<(), String>,
}

impl std::fmt::Debug for Migration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migration")
            .field("from", &self.from)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Every known step, ordered by source version.
pub const MIGRATIONS: &[Migration] = &[Migration {
    from: 0,
    description: "grade levels become {id, name} objects, employees get ids",
    apply: legacy_to_v1,
}];

/// Result of decoding a stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub envelope: Envelope,

    /// Version the record was stored with (0 for legacy records).
    pub stored_version: u32,

    /// Number of migration steps applied.
    pub steps_applied: usize,
}

impl Decoded {
    /// Whether the record must be written back in the current format.
    #[must_use]
    pub const fn was_migrated(&self) -> bool {
        self.steps_applied > 0
    }
}

/// Parses a stored record and upgrades it to the current version.
///
/// # Errors
///
/// Returns [`DirectoryError::UnsupportedVersion`] if the record was written by
/// a newer schema, and [`DirectoryError::MalformedPersistedData`] if the text
/// is not a JSON object, carries an invalid version, cannot be migrated, or
/// does not match the envelope shape after migration.
///
/// # Examples
///
/// ```
/// use staff_directory::storage::migration::decode;
///
/// let decoded = decode(r#"{"employees": [], "gradeLevels": ["Junior"]}"#)?;
/// assert_eq!(decoded.stored_version, 0);
/// assert_eq!(decoded.envelope.version, 1);
/// assert_eq!(decoded.envelope.grade_levels[0].name, "Junior");
/// # Ok::<(), staff_directory::DirectoryError>(())
/// ```
pub fn decode(text: &str) -> Result<Decoded> {
    let value: Value = serde_json::from_str(text).map_err(|e| malformed(format!("invalid JSON: {e}")))?;
    let Value::Object(mut object) = value else {
        return Err(malformed("envelope is not a JSON object"));
    };

    let stored_version = read_version(&object)?;
    let mut version = stored_version;
    let mut steps_applied = 0;

    while version < CURRENT_VERSION {
        let step = MIGRATIONS
            .iter()
            .find(|m| m.from == version)
            .ok_or_else(|| malformed(format!("no migration from version {version}")))?;

        tracing::debug!(from = step.from, description = step.description, "applying migration");
        (step.apply)(&mut object).map_err(|e| malformed(format!("migration from version {version} failed: {e}")))?;

        version += 1;
        object.insert("version".to_string(), Value::from(version));
        steps_applied += 1;
    }

    let envelope: Envelope = serde_json::from_value(Value::Object(object))
        .map_err(|e| malformed(format!("unexpected envelope shape: {e}")))?;

    Ok(Decoded {
        envelope,
        stored_version,
        steps_applied,
    })
}

fn read_version(object: &Object) -> Result<u32> {
    match object.get("version") {
        None | Some(Value::Null) => Ok(0),
        Some(value) => {
            let version = value
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| malformed(format!("invalid version: {value}")))?;
            if version > CURRENT_VERSION {
                return Err(DirectoryError::UnsupportedVersion {
                    found: version,
                    supported: CURRENT_VERSION,
                });
            }
            Ok(version)
        }
    }
}

fn legacy_to_v1(object: &mut Object) -> std::result::Result<(), String> {
    let grade_levels = take_array(object, "gradeLevels")?
        .into_iter()
        .map(|entry| match entry {
            Value::String(name) => Ok(serde_json::json!({ "id": new_id(), "name": name })),
            Value::Object(mut grade) => {
                ensure_id(&mut grade);
                Ok(Value::Object(grade))
            }
            other => Err(format!("unexpected grade level entry: {other}")),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    // Legacy employees referenced grade levels by name.
    let ids_by_name: HashMap<&str, &str> = grade_levels
        .iter()
        .filter_map(|g| Some((g.get("name")?.as_str()?, g.get("id")?.as_str()?)))
        .collect();
    let known_ids: HashSet<&str> = ids_by_name.values().copied().collect();

    let employees = take_array(object, "employees")?
        .into_iter()
        .map(|entry| match entry {
            Value::Object(mut employee) => {
                ensure_id(&mut employee);
                let renamed = match employee.get("gradeLevel").and_then(Value::as_str) {
                    Some(reference) if !known_ids.contains(reference) => {
                        ids_by_name.get(reference).map(|id| (*id).to_string())
                    }
                    _ => None,
                };
                if let Some(id) = renamed {
                    employee.insert("gradeLevel".to_string(), Value::String(id));
                }
                Ok(Value::Object(employee))
            }
            other => Err(format!("unexpected employee entry: {other}")),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    object.insert("gradeLevels".to_string(), Value::Array(grade_levels));
    object.insert("employees".to_string(), Value::Array(employees));
    Ok(())
}

fn take_array(object: &mut Object, key: &str) -> std::result::Result<Vec<Value>, String> {
    match object.remove(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(format!("{key} is not an array: {other}")),
    }
}

fn ensure_id(record: &mut Object) {
    let has_id = record
        .get("id")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.is_empty());
    if !has_id {
        record.insert("id".to_string(), Value::String(new_id()));
    }
}

fn malformed(message: impl Into<String>) -> DirectoryError {
    DirectoryError::MalformedPersistedData(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_contiguous_up_to_current_version() {
        for (index, step) in MIGRATIONS.iter().enumerate() {
            assert_eq!(step.from as usize, index);
        }
        assert_eq!(MIGRATIONS.len() as u32, CURRENT_VERSION);
    }

    #[test]
    fn legacy_string_grade_levels_become_objects() {
        let decoded = decode(
            r#"{"employees": [{"id": "e1", "fullName": "Bob", "gradeLevel": "Junior"}],
                "gradeLevels": ["Junior", "Senior"]}"#,
        )
        .unwrap();

        assert!(decoded.was_migrated());
        let names: Vec<&str> = decoded
            .envelope
            .grade_levels
            .iter()
            .map(|g| g.name.as_str())
            .collect();
        assert_eq!(names, vec!["Junior", "Senior"]);
        assert_ne!(decoded.envelope.grade_levels[0].id, decoded.envelope.grade_levels[1].id);
        assert!(!decoded.envelope.grade_levels[0].id.is_empty());

        let employee = &decoded.envelope.employees[0];
        assert_eq!(employee.id, "e1");
        assert_eq!(employee.full_name, "Bob");
        assert_eq!(employee.email, "");
        assert_eq!(employee.grade_level.as_ref(), Some(&decoded.envelope.grade_levels[0].id));
    }

    #[test]
    fn legacy_grade_level_references_resolve_by_name_or_id() {
        let decoded = decode(
            r#"{"employees": [
                    {"id": "e1", "gradeLevel": "Lead"},
                    {"id": "e2", "gradeLevel": "g1"},
                    {"id": "e3", "gradeLevel": "Retired"},
                    {"id": "e4"}
                ],
                "gradeLevels": [{"id": "g1", "name": "Lead"}, "Intern"]}"#,
        )
        .unwrap();

        let references: Vec<Option<&str>> = decoded
            .envelope
            .employees
            .iter()
            .map(|e| e.grade_level.as_deref())
            .collect();
        assert_eq!(references, [Some("g1"), Some("g1"), Some("Retired"), None]);
    }

    #[test]
    fn newer_version_is_unsupported_not_malformed() {
        let err = decode(r#"{"version": 99, "employees": []}"#).unwrap_err();
        assert!(matches!(
            err,
            DirectoryError::UnsupportedVersion {
                found: 99,
                supported: CURRENT_VERSION
            }
        ));
    }

    #[test]
    fn legacy_object_grade_levels_pass_through() {
        let decoded = decode(r#"{"gradeLevels": [{"id": "g1", "name": "Lead"}, "Intern"]}"#).unwrap();
        assert_eq!(decoded.envelope.grade_levels[0].id, "g1");
        assert_eq!(decoded.envelope.grade_levels[1].name, "Intern");
        assert!(decoded.envelope.employees.is_empty());
    }

    #[test]
    fn legacy_employee_without_id_gets_one() {
        let decoded = decode(r#"{"employees": [{"fullName": "Ann"}]}"#).unwrap();
        assert!(!decoded.envelope.employees[0].id.is_empty());
    }

    #[test]
    fn current_version_is_not_migrated() {
        let decoded = decode(r#"{"version": 1, "employees": [], "gradeLevels": [{"id": "g1", "name": "A"}]}"#).unwrap();
        assert_eq!(decoded.stored_version, 1);
        assert!(!decoded.was_migrated());
        assert_eq!(decoded.envelope.grade_levels[0].id, "g1");
    }

    #[test]
    fn unreadable_records_are_malformed() {
        for text in [
            "not json",
            "[1, 2]",
            r#"{"version": "one"}"#,
            r#"{"gradeLevels": [42]}"#,
            r#"{"employees": "everyone"}"#,
            r#"{"version": 1, "gradeLevels": ["Junior"]}"#,
        ] {
            assert!(
                matches!(decode(text), Err(DirectoryError::MalformedPersistedData(_))),
                "expected malformed: {text}"
            );
        }
    }
}
