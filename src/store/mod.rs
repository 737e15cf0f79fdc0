//! Entity store: the single source of truth for employees and grade levels.
//!
//! [`EntityStore`] owns both collections in memory and keeps one persisted
//! envelope in sync with them. Every successful mutation rewrites the whole
//! envelope and then notifies subscribers synchronously.
//!
//! # Persistence Failures
//!
//! A failed write never rolls back the in-memory mutation that triggered it.
//! The failure is returned in [`Committed::storage_error`], passed to
//! listeners, and the store stays dirty: the next mutation (or an explicit
//! [`EntityStore::flush`]) writes again.
//!
//! # Loading
//!
//! On open the envelope is read by key and decoded through the migration
//! chain. Missing data starts empty. Malformed data is logged, replaced by an
//! empty envelope and never served. Data from a newer schema is copied to a
//! backup key and left in place; the session starts empty. Migrated data is
//! written back in the current format before the store is returned.
//!
//! # Example
//!
//! ```
//! use staff_directory::domain::EmployeeInput;
//! use staff_directory::storage::MemoryStorage;
//! use staff_directory::store::EntityStore;
//!
//! let mut store = EntityStore::open(Box::new(MemoryStorage::default()), "staff-storage");
//! let senior = store.add_grade_level("Senior")?.value;
//!
//! let input = EmployeeInput {
//!     full_name: "Ann".into(),
//!     email: "ann@example.com".into(),
//!     phone_number: "555 0100 200".into(),
//!     country: "Canada".into(),
//!     state: "Ontario".into(),
//!     address: "1 King Street".into(),
//!     role: "Recruiter".into(),
//!     department: "HR".into(),
//!     grade_level: Some(senior.id.clone()),
//! };
//! let ann = store.add_employee(input)?.value;
//!
//! store.delete_grade_level(&senior.id);
//! assert_eq!(store.employee(&ann.id), Some(&ann));
//! assert_eq!(store.snapshot().grade_level_name(&senior.id), None);
//! # Ok::<(), staff_directory::DirectoryError>(())
//! ```

pub mod listeners;

pub use listeners::{Listener, Listeners, Snapshot, StoreEvent, SubscriptionId};

use crate::domain::error::{DirectoryError, Result};
use crate::domain::{new_id, Employee, EmployeeInput, GradeLevel};
use crate::storage::{decode, Decoded, Envelope, Storage};

/// How the store's initial state was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing was stored under the key.
    Empty,

    /// A current-format envelope was loaded as is.
    Loaded,

    /// An older envelope was upgraded.
    Migrated {
        /// Version the envelope was stored with (0 for legacy data).
        from_version: u32,
        /// Whether the upgraded envelope was written back.
        persisted: bool,
    },

    /// The stored envelope could not be parsed and was discarded.
    Malformed {
        reason: String,
        /// Whether the empty replacement envelope was written.
        persisted: bool,
    },

    /// The stored envelope was written by a newer schema version.
    ///
    /// The session starts empty in memory and the stored record is left in
    /// place until the first mutation; a copy is kept under `backup_key`.
    NewerVersion {
        version: u32,
        /// Key the original record was copied to; `None` if that write failed.
        backup_key: Option<String>,
    },

    /// The backend failed to read; the session starts empty in memory.
    Unreadable {
        reason: String,
    },
}

/// Outcome of a mutation that was applied in memory.
#[derive(Debug)]
pub struct Committed<T> {
    /// Value produced by the mutation.
    pub value: T,

    /// Set when the mutation could not be persisted.
    pub storage_error: Option<DirectoryError>,
}

impl<T> Committed<T> {
    /// Whether the mutation reached durable storage.
    #[must_use]
    pub const fn is_durable(&self) -> bool {
        self.storage_error.is_none()
    }

    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Owner of the employee and grade level collections.
pub struct EntityStore {
    storage: Box<dyn Storage>,
    key: String,
    data: Envelope,
    listeners: Listeners,
    load_status: LoadStatus,
    /// In-memory state is ahead of durable storage.
    dirty: bool,
    last_storage_error: Option<String>,
}

impl EntityStore {
    /// Opens the store, loading and migrating the envelope stored under `key`.
    ///
    /// Never fails: unreadable or malformed data yields an empty store, with
    /// the reason available from [`load_status`](Self::load_status).
    pub fn open(storage: Box<dyn Storage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let _span = tracing::debug_span!("store_open", storage_key = %key).entered();

        let mut store = Self {
            storage,
            key,
            data: Envelope::default(),
            listeners: Listeners::default(),
            load_status: LoadStatus::Empty,
            dirty: false,
            last_storage_error: None,
        };
        store.load();

        tracing::debug!(
            employee_count = store.data.employees.len(),
            grade_level_count = store.data.grade_levels.len(),
            status = ?store.load_status,
            "store opened"
        );
        store
    }

    fn load(&mut self) {
        let text = match self.storage.read(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::debug!("no persisted envelope, starting empty");
                self.load_status = LoadStatus::Empty;
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persisted envelope, starting empty");
                self.last_storage_error = Some(e.to_string());
                self.load_status = LoadStatus::Unreadable {
                    reason: e.to_string(),
                };
                return;
            }
        };

        match decode(&text) {
            Ok(decoded) => {
                let migrated = decoded.was_migrated();
                let Decoded {
                    envelope,
                    stored_version,
                    steps_applied,
                } = decoded;
                self.data = envelope;
                if migrated {
                    tracing::debug!(
                        from_version = stored_version,
                        steps = steps_applied,
                        "persisting migrated envelope"
                    );
                    let persisted = self.write_through().is_ok();
                    self.load_status = LoadStatus::Migrated {
                        from_version: stored_version,
                        persisted,
                    };
                } else {
                    self.load_status = LoadStatus::Loaded;
                }
            }
            Err(DirectoryError::UnsupportedVersion { found, supported }) => {
                tracing::warn!(
                    version = found,
                    supported,
                    "persisted envelope is newer than this build, starting empty"
                );
                let backup_key = format!("{}.v{found}.bak", self.key);
                let backup_key = match self.storage.write(&backup_key, &text) {
                    Ok(()) => Some(backup_key),
                    Err(e) => {
                        tracing::error!(error = %e, backup_key = %backup_key, "failed to back up newer envelope");
                        self.last_storage_error = Some(e.to_string());
                        None
                    }
                };
                self.load_status = LoadStatus::NewerVersion {
                    version: found,
                    backup_key,
                };
            }
            Err(e) => {
                tracing::warn!(error = %e, "discarding malformed persisted envelope");
                self.data = Envelope::default();
                let persisted = self.write_through().is_ok();
                self.load_status = LoadStatus::Malformed {
                    reason: e.to_string(),
                    persisted,
                };
            }
        }
    }

    /// Returns how the initial state was obtained.
    #[must_use]
    pub const fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    /// Returns the key the envelope is stored under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Whether some mutation has not reached durable storage yet.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Message of the most recent storage failure, cleared by the next
    /// successful write.
    #[must_use]
    pub fn last_storage_error(&self) -> Option<&str> {
        self.last_storage_error.as_deref()
    }

    /// Returns a read-only view of both collections.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            employees: &self.data.employees,
            grade_levels: &self.data.grade_levels,
        }
    }

    #[must_use]
    pub fn employee(&self, id: &str) -> Option<&Employee> {
        self.data.employees.iter().find(|e| e.id == id)
    }

    #[must_use]
    pub fn grade_level(&self, id: &str) -> Option<&GradeLevel> {
        self.data.grade_levels.iter().find(|g| g.id == id)
    }

    /// Resolves a grade level reference; `None` when absent or dangling.
    #[must_use]
    pub fn grade_level_name(&self, id: &str) -> Option<&str> {
        self.snapshot().grade_level_name(id)
    }

    /// Distinct departments in use, in first-seen order.
    #[must_use]
    pub fn departments(&self) -> Vec<&str> {
        self.snapshot().departments()
    }

    /// Case-insensitive check for an existing grade level name.
    ///
    /// This backs a soft warning in the grade level editor; the store itself
    /// accepts duplicate names. `except_id` skips the record being renamed.
    #[must_use]
    pub fn grade_level_name_taken(&self, name: &str, except_id: Option<&str>) -> bool {
        self.snapshot().grade_level_name_taken(name, except_id)
    }

    /// Registers a listener called after every successful mutation.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent<'_>) + Send + 'static,
    {
        let id = self.listeners.add(Box::new(listener));
        tracing::debug!(subscription = ?id, listener_count = self.listeners.len(), "listener subscribed");
        id
    }

    /// Removes a listener. Returns `false` if it was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let removed = self.listeners.remove(id);
        tracing::debug!(subscription = ?id, removed = removed, "listener unsubscribed");
        removed
    }

    /// Adds an employee under a freshly generated id.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::InvalidInput`] if a required field is blank;
    /// the collection is left unchanged.
    pub fn add_employee(&mut self, input: EmployeeInput) -> Result<Committed<Employee>> {
        let _span = tracing::debug_span!("store_add_employee", full_name = %input.full_name).entered();

        let missing = input.missing_required_fields();
        if !missing.is_empty() {
            tracing::debug!(fields = ?missing, "rejecting employee with missing fields");
            return Err(DirectoryError::InvalidInput {
                entity: "employee",
                fields: missing,
            });
        }

        let employee = Employee::from_input(self.unused_employee_id(), input);
        self.data.employees.push(employee.clone());

        tracing::debug!(employee_id = %employee.id, "employee added");
        Ok(self.commit(employee))
    }

    /// Replaces the employee with the same id wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::InvalidInput`] if a required field is blank, or
    /// [`DirectoryError::NotFound`] if no employee has the record's id. The
    /// collection is left unchanged in both cases.
    pub fn update_employee(&mut self, record: Employee) -> Result<Committed<Employee>> {
        let _span = tracing::debug_span!("store_update_employee", employee_id = %record.id).entered();

        let missing = record.missing_required_fields();
        if !missing.is_empty() {
            return Err(DirectoryError::InvalidInput {
                entity: "employee",
                fields: missing,
            });
        }

        let slot = self
            .data
            .employees
            .iter_mut()
            .find(|e| e.id == record.id)
            .ok_or_else(|| DirectoryError::NotFound {
                entity: "employee",
                id: record.id.clone(),
            })?;
        slot.clone_from(&record);

        tracing::debug!("employee updated");
        Ok(self.commit(record))
    }

    /// Removes the employee with `id`, if present.
    ///
    /// Deleting an unknown id is a successful no-op that neither writes nor
    /// notifies. The returned value tells whether a record was removed.
    pub fn delete_employee(&mut self, id: &str) -> Committed<bool> {
        let _span = tracing::debug_span!("store_delete_employee", employee_id = %id).entered();

        let before = self.data.employees.len();
        self.data.employees.retain(|e| e.id != id);
        if self.data.employees.len() == before {
            tracing::debug!("employee not present, nothing to delete");
            return Committed {
                value: false,
                storage_error: None,
            };
        }

        tracing::debug!("employee deleted");
        self.commit(true)
    }

    /// Adds a grade level under a freshly generated id.
    ///
    /// The name is stored trimmed. Duplicate names are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::InvalidInput`] if the name is blank.
    pub fn add_grade_level(&mut self, name: &str) -> Result<Committed<GradeLevel>> {
        let _span = tracing::debug_span!("store_add_grade_level", name = %name).entered();

        let name = Self::required_name(name)?;
        let grade_level = GradeLevel {
            id: self.unused_grade_level_id(),
            name,
        };
        self.data.grade_levels.push(grade_level.clone());

        tracing::debug!(grade_level_id = %grade_level.id, "grade level added");
        Ok(self.commit(grade_level))
    }

    /// Renames the grade level with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::InvalidInput`] if the name is blank, or
    /// [`DirectoryError::NotFound`] if no grade level has that id.
    pub fn update_grade_level(&mut self, id: &str, name: &str) -> Result<Committed<GradeLevel>> {
        let _span = tracing::debug_span!("store_update_grade_level", grade_level_id = %id).entered();

        let name = Self::required_name(name)?;
        let slot = self
            .data
            .grade_levels
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| DirectoryError::NotFound {
                entity: "grade level",
                id: id.to_string(),
            })?;
        slot.name = name;
        let updated = slot.clone();

        tracing::debug!("grade level renamed");
        Ok(self.commit(updated))
    }

    /// Removes the grade level with `id`, if present.
    ///
    /// Employees referencing it are left untouched; their reference dangles.
    pub fn delete_grade_level(&mut self, id: &str) -> Committed<bool> {
        let _span = tracing::debug_span!("store_delete_grade_level", grade_level_id = %id).entered();

        let before = self.data.grade_levels.len();
        self.data.grade_levels.retain(|g| g.id != id);
        if self.data.grade_levels.len() == before {
            tracing::debug!("grade level not present, nothing to delete");
            return Committed {
                value: false,
                storage_error: None,
            };
        }

        let dangling = self
            .data
            .employees
            .iter()
            .filter(|e| e.grade_level.as_deref() == Some(id))
            .count();
        tracing::debug!(dangling_references = dangling, "grade level deleted");
        self.commit(true)
    }

    /// Writes the envelope if a previous write failed.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the write fails again.
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping flush, storage is up to date");
            return Ok(());
        }
        self.write_through()
    }

    fn required_name(name: &str) -> Result<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DirectoryError::InvalidInput {
                entity: "grade level",
                fields: vec!["name"],
            });
        }
        Ok(trimmed.to_string())
    }

    fn unused_employee_id(&self) -> String {
        loop {
            let id = new_id();
            if self.employee(&id).is_none() {
                return id;
            }
        }
    }

    fn unused_grade_level_id(&self) -> String {
        loop {
            let id = new_id();
            if self.grade_level(&id).is_none() {
                return id;
            }
        }
    }

    /// Serializes and writes the whole envelope, tracking dirtiness.
    fn write_through(&mut self) -> Result<()> {
        let result = self
            .data
            .to_json()
            .map_err(|e| DirectoryError::Storage(format!("failed to serialize envelope: {e}")))
            .and_then(|json| self.storage.write(&self.key, &json));

        match &result {
            Ok(()) => {
                self.dirty = false;
                self.last_storage_error = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to persist envelope, keeping in-memory state");
                self.dirty = true;
                self.last_storage_error = Some(e.to_string());
            }
        }
        result
    }

    /// Persists the mutation already applied in memory and notifies listeners.
    fn commit<T>(&mut self, value: T) -> Committed<T> {
        let storage_error = self.write_through().err();

        if !self.listeners.is_empty() {
            let event = StoreEvent {
                snapshot: Snapshot {
                    employees: &self.data.employees,
                    grade_levels: &self.data.grade_levels,
                },
                storage_error: storage_error.as_ref(),
            };
            self.listeners.notify(&event);
        }

        Committed {
            value,
            storage_error,
        }
    }
}

impl Drop for EntityStore {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("retrying unsaved changes on drop");
            if let Err(e) = self.write_through() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}

impl std::fmt::Debug for EntityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("key", &self.key)
            .field("employees", &self.data.employees.len())
            .field("grade_levels", &self.data.grade_levels.len())
            .field("listeners", &self.listeners)
            .field("load_status", &self.load_status)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    const KEY: &str = "staff-storage";

    fn input(name: &str, department: &str) -> EmployeeInput {
        EmployeeInput {
            full_name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone_number: "+1 555 0100".into(),
            country: "Canada".into(),
            state: "Ontario".into(),
            address: "1 King Street".into(),
            role: "Analyst".into(),
            department: department.into(),
            grade_level: None,
        }
    }

    fn open(storage: &MemoryStorage) -> EntityStore {
        EntityStore::open(Box::new(storage.clone()), KEY)
    }

    fn stored_envelope(storage: &MemoryStorage) -> serde_json::Value {
        serde_json::from_str(&storage.get(KEY).unwrap()).unwrap()
    }

    #[test]
    fn adds_get_unique_ids_and_count_tracks_deletes() {
        let storage = MemoryStorage::default();
        let mut store = open(&storage);

        let ids: Vec<String> = (0..20)
            .map(|i| store.add_employee(input(&format!("E{i}"), "IT")).unwrap().value.id)
            .collect();
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 20);

        for id in ids.iter().take(5) {
            assert!(store.delete_employee(id).value);
        }
        assert_eq!(store.snapshot().employees.len(), 15);
        assert_eq!(stored_envelope(&storage)["employees"].as_array().unwrap().len(), 15);
    }

    #[test]
    fn add_with_missing_fields_is_rejected_without_change() {
        let storage = MemoryStorage::default();
        let mut store = open(&storage);

        let mut bad = input("Ann", "HR");
        bad.email.clear();
        let err = store.add_employee(bad).unwrap_err();

        assert!(matches!(err, DirectoryError::InvalidInput { ref fields, .. } if fields == &vec!["email"]));
        assert!(store.snapshot().employees.is_empty());
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn update_unknown_id_signals_not_found() {
        let storage = MemoryStorage::default();
        let mut store = open(&storage);
        let ann = store.add_employee(input("Ann", "HR")).unwrap().value;

        let ghost = Employee::from_input("missing".into(), input("Ghost", "IT"));
        let err = store.update_employee(ghost).unwrap_err();

        assert!(matches!(err, DirectoryError::NotFound { entity: "employee", .. }));
        assert_eq!(store.snapshot().employees, &[ann][..]);
        assert_eq!(storage.write_count(), 1);
    }

    #[test]
    fn update_replaces_whole_record() {
        let storage = MemoryStorage::default();
        let mut store = open(&storage);
        let grade = store.add_grade_level("Senior").unwrap().value;
        let mut ann = store.add_employee(input("Ann", "HR")).unwrap().value;

        ann.role = "Director".into();
        ann.grade_level = Some(grade.id.clone());
        store.update_employee(ann.clone()).unwrap();

        assert_eq!(store.employee(&ann.id), Some(&ann));
        assert_eq!(stored_envelope(&storage)["employees"][0]["role"], "Director");
    }

    #[test]
    fn deleting_twice_equals_deleting_once() {
        let storage = MemoryStorage::default();
        let mut store = open(&storage);
        let ann = store.add_employee(input("Ann", "HR")).unwrap().value;
        store.add_employee(input("Bob", "IT")).unwrap();

        assert!(store.delete_employee(&ann.id).value);
        let after_first: Vec<Employee> = store.snapshot().employees.to_vec();
        let writes = storage.write_count();

        assert!(!store.delete_employee(&ann.id).value);
        assert_eq!(store.snapshot().employees, after_first.as_slice());
        assert_eq!(storage.write_count(), writes);
    }

    #[test]
    fn deleting_grade_level_leaves_employees_untouched() {
        let storage = MemoryStorage::default();
        let mut store = open(&storage);
        let grade = store.add_grade_level("Junior").unwrap().value;
        let mut with_grade = input("Ann", "HR");
        with_grade.grade_level = Some(grade.id.clone());
        store.add_employee(with_grade).unwrap();
        store.add_employee(input("Bob", "IT")).unwrap();
        let before: Vec<Employee> = store.snapshot().employees.to_vec();

        assert!(store.delete_grade_level(&grade.id).value);

        assert_eq!(store.snapshot().employees, before.as_slice());
        assert_eq!(store.snapshot().grade_level_name(&grade.id), None);
        assert!(store.grade_level(&grade.id).is_none());
    }

    #[test]
    fn grade_level_contracts() {
        let storage = MemoryStorage::default();
        let mut store = open(&storage);

        assert!(matches!(
            store.add_grade_level("   "),
            Err(DirectoryError::InvalidInput { entity: "grade level", .. })
        ));
        let grade = store.add_grade_level("  Lead ").unwrap().value;
        assert_eq!(grade.name, "Lead");

        let renamed = store.update_grade_level(&grade.id, "Principal").unwrap().value;
        assert_eq!(renamed.id, grade.id);
        assert_eq!(store.grade_level(&grade.id).unwrap().name, "Principal");

        assert!(matches!(
            store.update_grade_level("nope", "X"),
            Err(DirectoryError::NotFound { entity: "grade level", .. })
        ));
        assert!(!store.delete_grade_level("nope").value);
    }

    #[test]
    fn duplicate_grade_level_names_are_a_soft_check() {
        let storage = MemoryStorage::default();
        let mut store = open(&storage);
        let senior = store.add_grade_level("Senior").unwrap().value;

        assert!(store.grade_level_name_taken("  senior ", None));
        assert!(!store.grade_level_name_taken("SENIOR", Some(&senior.id)));
        assert!(store.add_grade_level("SENIOR").is_ok());
        assert_eq!(store.snapshot().grade_levels.len(), 2);
    }

    #[test]
    fn listeners_see_every_successful_mutation() {
        let storage = MemoryStorage::default();
        let mut store = open(&storage);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let subscription = store.subscribe(move |event| {
            sink.lock()
                .unwrap()
                .push((event.snapshot.employees.len(), event.snapshot.grade_levels.len()));
        });

        let ann = store.add_employee(input("Ann", "HR")).unwrap().value;
        store.add_grade_level("Senior").unwrap();
        let _ = store.add_employee(EmployeeInput::default());
        store.delete_employee("missing");
        store.delete_employee(&ann.id);

        assert_eq!(*seen.lock().unwrap(), vec![(1, 0), (1, 1), (0, 1)]);

        assert!(store.unsubscribe(subscription));
        assert!(!store.unsubscribe(subscription));
        store.add_grade_level("Junior").unwrap();
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn write_failure_keeps_memory_state_and_retries_next_mutation() {
        let storage = MemoryStorage::default();
        let mut store = open(&storage);
        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&errors);
        store.subscribe(move |event| {
            sink.lock().unwrap().push(event.storage_error.is_some());
        });

        storage.set_fail_writes(true);
        let committed = store.add_employee(input("Ann", "HR")).unwrap();
        assert!(!committed.is_durable());
        assert!(matches!(committed.storage_error, Some(DirectoryError::Storage(_))));
        assert_eq!(store.snapshot().employees.len(), 1);
        assert!(store.is_dirty());
        assert!(store.last_storage_error().is_some());
        assert!(storage.get(KEY).is_none());

        storage.set_fail_writes(false);
        let committed = store.add_employee(input("Bob", "IT")).unwrap();
        assert!(committed.is_durable());
        assert!(!store.is_dirty());
        assert_eq!(stored_envelope(&storage)["employees"].as_array().unwrap().len(), 2);
        assert_eq!(*errors.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn flush_retries_pending_write() {
        let storage = MemoryStorage::default();
        let mut store = open(&storage);

        storage.set_fail_writes(true);
        store.add_grade_level("Senior").unwrap();
        assert!(store.flush().is_err());

        storage.set_fail_writes(false);
        store.flush().unwrap();
        assert_eq!(stored_envelope(&storage)["gradeLevels"][0]["name"], "Senior");
        assert!(store.last_storage_error().is_none());
    }

    #[test]
    fn dropping_a_dirty_store_saves_pending_changes() {
        let storage = MemoryStorage::default();
        {
            let mut store = open(&storage);
            storage.set_fail_writes(true);
            store.add_grade_level("Senior").unwrap();
            storage.set_fail_writes(false);
        }
        assert_eq!(stored_envelope(&storage)["gradeLevels"][0]["name"], "Senior");
    }

    #[test]
    fn reopening_restores_collections() {
        let storage = MemoryStorage::default();
        let (ann, grade) = {
            let mut store = open(&storage);
            let grade = store.add_grade_level("Senior").unwrap().value;
            let mut data = input("Ann", "HR");
            data.grade_level = Some(grade.id.clone());
            (store.add_employee(data).unwrap().value, grade)
        };

        let store = open(&storage);
        assert_eq!(store.load_status(), &LoadStatus::Loaded);
        assert_eq!(store.employee(&ann.id), Some(&ann));
        assert_eq!(store.snapshot().grade_level_name(&grade.id), Some("Senior"));
    }

    #[test]
    fn legacy_envelope_is_migrated_and_written_back() {
        let storage = MemoryStorage::with_record(
            KEY,
            r#"{"employees": [{"id": "e1", "fullName": "Bob", "department": "IT"}],
                "gradeLevels": ["Junior", "Senior"]}"#,
        );
        let store = open(&storage);

        assert_eq!(
            store.load_status(),
            &LoadStatus::Migrated {
                from_version: 0,
                persisted: true
            }
        );
        let names: Vec<&str> = store.snapshot().grade_levels.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Junior", "Senior"]);

        let stored = stored_envelope(&storage);
        assert_eq!(stored["version"], 1);
        assert_eq!(stored["gradeLevels"][0]["id"], store.snapshot().grade_levels[0].id.as_str());
        assert_eq!(stored["employees"][0]["email"], "");
    }

    #[test]
    fn migrated_envelope_is_served_even_if_write_back_fails() {
        let storage = MemoryStorage::with_record(KEY, r#"{"gradeLevels": ["Junior"]}"#);
        storage.set_fail_writes(true);
        let store = open(&storage);

        assert_eq!(
            store.load_status(),
            &LoadStatus::Migrated {
                from_version: 0,
                persisted: false
            }
        );
        assert!(store.is_dirty());
        assert_eq!(store.snapshot().grade_levels[0].name, "Junior");
    }

    #[test]
    fn malformed_envelope_starts_empty_and_is_replaced() {
        let storage = MemoryStorage::with_record(KEY, "{ not json");
        let store = open(&storage);

        assert!(matches!(store.load_status(), LoadStatus::Malformed { persisted: true, .. }));
        assert!(store.snapshot().employees.is_empty());
        assert_eq!(stored_envelope(&storage)["version"], 1);
    }

    #[test]
    fn malformed_envelope_reports_failed_replacement() {
        let storage = MemoryStorage::with_record(KEY, "{ not json");
        storage.set_fail_writes(true);
        let store = open(&storage);

        assert!(matches!(store.load_status(), LoadStatus::Malformed { persisted: false, .. }));
        assert!(store.is_dirty());
        assert!(store.last_storage_error().is_some());
        assert_eq!(storage.get(KEY).as_deref(), Some("{ not json"));
    }

    #[test]
    fn newer_envelope_is_backed_up_and_left_in_place() {
        let newer = r#"{"version": 7, "employees": [{"id": "e1", "badge": 12}], "gradeLevels": []}"#;
        let storage = MemoryStorage::with_record(KEY, newer);
        let store = open(&storage);

        assert_eq!(
            store.load_status(),
            &LoadStatus::NewerVersion {
                version: 7,
                backup_key: Some(format!("{KEY}.v7.bak")),
            }
        );
        assert!(store.snapshot().employees.is_empty());
        assert!(!store.is_dirty());
        drop(store);

        assert_eq!(storage.get(KEY).as_deref(), Some(newer));
        assert_eq!(storage.get(&format!("{KEY}.v7.bak")).as_deref(), Some(newer));
    }

    #[test]
    fn newer_envelope_without_backup_is_still_not_overwritten_on_open() {
        let newer = r#"{"version": 2}"#;
        let storage = MemoryStorage::with_record(KEY, newer);
        storage.set_fail_writes(true);
        let store = open(&storage);

        assert_eq!(
            store.load_status(),
            &LoadStatus::NewerVersion {
                version: 2,
                backup_key: None,
            }
        );
        assert!(store.last_storage_error().is_some());
        drop(store);
        assert_eq!(storage.get(KEY).as_deref(), Some(newer));
    }

    #[test]
    fn storage_key_is_reported() {
        let storage = MemoryStorage::default();
        assert_eq!(open(&storage).storage_key(), KEY);
    }

    #[test]
    fn unreadable_storage_starts_empty_and_keeps_working_in_memory() {
        let storage = MemoryStorage::with_record(KEY, r#"{"version": 1}"#);
        storage.set_fail_reads(true);
        let mut store = open(&storage);

        assert!(matches!(store.load_status(), LoadStatus::Unreadable { .. }));
        assert!(store.last_storage_error().is_some());
        store.add_grade_level("Senior").unwrap();
        assert_eq!(store.snapshot().grade_levels.len(), 1);
    }

    #[test]
    fn departments_are_distinct_in_first_seen_order() {
        let storage = MemoryStorage::default();
        let mut store = open(&storage);
        for (name, dept) in [("A", "IT"), ("B", "HR"), ("C", "IT"), ("D", "Sales")] {
            store.add_employee(input(name, dept)).unwrap();
        }
        assert_eq!(store.snapshot().departments(), vec!["IT", "HR", "Sales"]);
    }
}
