//! Side effects requested by the event handler.
//!
//! The handler never touches the store. It returns a `Vec<Action>` that the
//! caller runs through [`processor::execute`](crate::app::processor::execute)
//! in order, keeping state transitions testable without storage.

use crate::domain::EmployeeInput;

/// Commands executed against the entity store or the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Adds an employee, or replaces the fields of the one with `id`.
    SaveEmployee {
        id: Option<String>,
        input: EmployeeInput,
    },

    /// Removes an employee after the user confirmed.
    DeleteEmployee {
        id: String,
    },

    /// Removes a grade level after the user confirmed. Employees keep their
    /// now dangling reference.
    DeleteGradeLevel {
        id: String,
    },

    /// Adds a grade level, or renames the one with `id`.
    SaveGradeLevel {
        id: Option<String>,
        name: String,
    },

    /// Writes an export of the current filtered and sorted list.
    ExportCsv {
        /// Suggested file name, e.g. `employees-20240501-093000.csv`.
        file_name: String,
        contents: String,
    },
}
