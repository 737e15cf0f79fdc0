//! Change subscriptions for the entity store.

use crate::domain::{DirectoryError, Employee, GradeLevel};

/// Read-only view of both collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot<'a> {
    pub employees: &'a [Employee],
    pub grade_levels: &'a [GradeLevel],
}

impl<'a> Snapshot<'a> {
    /// Looks up a grade level's name; `None` for absent or dangling references.
    #[must_use]
    pub fn grade_level_name(&self, id: &str) -> Option<&'a str> {
        self.grade_levels
            .iter()
            .find(|g| g.id == id)
            .map(|g| g.name.as_str())
    }

    /// Case-insensitive check for an existing grade level name.
    ///
    /// `except_id` skips the record being renamed.
    #[must_use]
    pub fn grade_level_name_taken(&self, name: &str, except_id: Option<&str>) -> bool {
        let wanted = name.trim().to_lowercase();
        self.grade_levels
            .iter()
            .filter(|g| Some(g.id.as_str()) != except_id)
            .any(|g| g.name.trim().to_lowercase() == wanted)
    }

    /// Distinct departments of the current employees, in first-seen order.
    #[must_use]
    pub fn departments(&self) -> Vec<&'a str> {
        let mut seen: Vec<&'a str> = Vec::new();
        for employee in self.employees {
            if !seen.contains(&employee.department.as_str()) {
                seen.push(employee.department.as_str());
            }
        }
        seen
    }
}

/// Passed to listeners after every successful mutation.
#[derive(Debug, Clone, Copy)]
pub struct StoreEvent<'a> {
    /// State after the mutation.
    pub snapshot: Snapshot<'a>,

    /// Set when the mutation was applied in memory but could not be persisted.
    pub storage_error: Option<&'a DirectoryError>,
}

/// Handle returned by [`EntityStore::subscribe`](super::EntityStore::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Listener = Box<dyn FnMut(&StoreEvent<'_>) + Send>;

/// Registered listeners, notified in subscription order.
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

impl Listeners {
    pub fn add(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Returns `false` if the subscription was already removed.
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn notify(&mut self, event: &StoreEvent<'_>) {
        for (_, listener) in &mut self.entries {
            listener(event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
