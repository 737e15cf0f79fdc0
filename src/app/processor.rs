//! Executes handler actions against the entity store.

use crate::app::Action;
use crate::domain::error::{DirectoryError, Result};
use crate::domain::{Employee, GradeLevel};
use crate::store::EntityStore;
use std::path::{Path, PathBuf};

/// What an executed action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// A delete ran; `removed` is `false` when the record was already gone.
    Deleted { removed: bool },

    EmployeeSaved(Employee),

    GradeLevelSaved(GradeLevel),

    Exported(PathBuf),
}

/// Result of one executed action.
#[derive(Debug)]
pub struct Outcome {
    pub effect: Effect,

    /// Set when the store applied the change but could not persist it.
    pub storage_error: Option<DirectoryError>,
}

impl Outcome {
    /// Whether the store's collections may have changed.
    #[must_use]
    pub const fn store_changed(&self) -> bool {
        !matches!(self.effect, Effect::Exported(_) | Effect::Deleted { removed: false })
    }
}

/// Runs `action`, writing exports into `export_dir`.
///
/// # Errors
///
/// Returns [`DirectoryError::InvalidInput`] or [`DirectoryError::NotFound`]
/// from employee and grade level saves, and [`DirectoryError::Io`] if the export file
/// cannot be written. Persistence failures are not errors; see
/// [`Outcome::storage_error`].
#[tracing::instrument(level = "debug", skip(store, action), fields(action = action_name(action)))]
pub fn execute(store: &mut EntityStore, action: &Action, export_dir: &Path) -> Result<Outcome> {
    let outcome = match action {
        Action::SaveEmployee { id, input } => {
            let committed = match id {
                Some(id) => store.update_employee(Employee::from_input(id.clone(), input.clone()))?,
                None => store.add_employee(input.clone())?,
            };
            Outcome {
                effect: Effect::EmployeeSaved(committed.value),
                storage_error: committed.storage_error,
            }
        }
        Action::DeleteEmployee { id } => {
            let committed = store.delete_employee(id);
            Outcome {
                effect: Effect::Deleted {
                    removed: committed.value,
                },
                storage_error: committed.storage_error,
            }
        }
        Action::DeleteGradeLevel { id } => {
            let committed = store.delete_grade_level(id);
            Outcome {
                effect: Effect::Deleted {
                    removed: committed.value,
                },
                storage_error: committed.storage_error,
            }
        }
        Action::SaveGradeLevel { id, name } => {
            let committed = match id {
                Some(id) => store.update_grade_level(id, name)?,
                None => store.add_grade_level(name)?,
            };
            Outcome {
                effect: Effect::GradeLevelSaved(committed.value),
                storage_error: committed.storage_error,
            }
        }
        Action::ExportCsv { file_name, contents } => {
            let path = write_export(export_dir, file_name, contents)?;
            Outcome {
                effect: Effect::Exported(path),
                storage_error: None,
            }
        }
    };

    if let Some(e) = &outcome.storage_error {
        tracing::warn!(error = %e, "action applied in memory only");
    }
    Ok(outcome)
}

fn write_export(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf> {
    let Some(name) = Path::new(file_name).file_name() else {
        return Err(DirectoryError::Config(format!("invalid export file name: {file_name}")));
    };
    std::fs::create_dir_all(dir)?;
    let path = dir.join(name);
    std::fs::write(&path, contents)?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "export written");
    Ok(path)
}

const fn action_name(action: &Action) -> &'static str {
    match action {
        Action::SaveEmployee { .. } => "save_employee",
        Action::DeleteEmployee { .. } => "delete_employee",
        Action::DeleteGradeLevel { .. } => "delete_grade_level",
        Action::SaveGradeLevel { .. } => "save_grade_level",
        Action::ExportCsv { .. } => "export_csv",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmployeeInput;
    use crate::storage::MemoryStorage;

    fn store() -> (EntityStore, MemoryStorage) {
        let storage = MemoryStorage::default();
        (EntityStore::open(Box::new(storage.clone()), "staff-storage"), storage)
    }

    #[test]
    fn saves_and_renames_grade_levels() {
        let (mut store, _) = store();
        let dir = tempfile::tempdir().unwrap();

        let outcome = execute(
            &mut store,
            &Action::SaveGradeLevel {
                id: None,
                name: "Senior".into(),
            },
            dir.path(),
        )
        .unwrap();
        let Effect::GradeLevelSaved(saved) = outcome.effect else {
            panic!("expected a saved grade level");
        };

        execute(
            &mut store,
            &Action::SaveGradeLevel {
                id: Some(saved.id.clone()),
                name: "Principal".into(),
            },
            dir.path(),
        )
        .unwrap();
        assert_eq!(store.grade_level_name(&saved.id), Some("Principal"));

        let err = execute(
            &mut store,
            &Action::SaveGradeLevel {
                id: Some("missing".into()),
                name: "X".into(),
            },
            dir.path(),
        )
        .unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound { .. }));
    }

    #[test]
    fn saves_and_updates_employees() {
        let (mut store, storage) = store();
        let dir = tempfile::tempdir().unwrap();
        let input = EmployeeInput {
            full_name: "Ann Smith".into(),
            email: "ann@example.com".into(),
            phone_number: "+1 555 0100".into(),
            country: "Canada".into(),
            state: "Ontario".into(),
            address: "1 King Street".into(),
            role: "Recruiter".into(),
            department: "HR".into(),
            grade_level: None,
        };

        let outcome = execute(
            &mut store,
            &Action::SaveEmployee {
                id: None,
                input: input.clone(),
            },
            dir.path(),
        )
        .unwrap();
        assert!(outcome.store_changed());
        let Effect::EmployeeSaved(added) = outcome.effect else {
            panic!("expected a saved employee");
        };

        let outcome = execute(
            &mut store,
            &Action::SaveEmployee {
                id: Some(added.id.clone()),
                input: EmployeeInput {
                    role: "HR Lead".into(),
                    ..input.clone()
                },
            },
            dir.path(),
        )
        .unwrap();
        assert!(matches!(&outcome.effect, Effect::EmployeeSaved(e) if e.id == added.id));
        assert_eq!(store.employee(&added.id).unwrap().role, "HR Lead");
        assert_eq!(store.snapshot().employees.len(), 1);
        assert!(storage.write_count() >= 2);

        let err = execute(
            &mut store,
            &Action::SaveEmployee {
                id: Some("missing".into()),
                input,
            },
            dir.path(),
        )
        .unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound { .. }));
    }

    #[test]
    fn repeated_delete_reports_no_change() {
        let (mut store, _) = store();
        let dir = tempfile::tempdir().unwrap();
        let grade = store.add_grade_level("Junior").unwrap().value;
        let action = Action::DeleteGradeLevel { id: grade.id };

        let first = execute(&mut store, &action, dir.path()).unwrap();
        assert!(first.store_changed());
        let second = execute(&mut store, &action, dir.path()).unwrap();
        assert_eq!(second.effect, Effect::Deleted { removed: false });
        assert!(!second.store_changed());
    }

    #[test]
    fn storage_failures_are_reported_not_raised() {
        let (mut store, storage) = store();
        let dir = tempfile::tempdir().unwrap();
        storage.set_fail_writes(true);

        let outcome = execute(
            &mut store,
            &Action::SaveGradeLevel {
                id: None,
                name: "Senior".into(),
            },
            dir.path(),
        )
        .unwrap();
        assert!(outcome.storage_error.is_some());
        assert_eq!(store.snapshot().grade_levels.len(), 1);
    }

    #[test]
    fn export_is_written_under_its_file_name() {
        let (mut store, _) = store();
        let dir = tempfile::tempdir().unwrap();

        let outcome = execute(
            &mut store,
            &Action::ExportCsv {
                file_name: "../employees.csv".into(),
                contents: "Name".into(),
            },
            dir.path(),
        )
        .unwrap();
        let Effect::Exported(path) = outcome.effect else {
            panic!("expected an export");
        };
        assert_eq!(path, dir.path().join("employees.csv"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "Name");
    }
}
