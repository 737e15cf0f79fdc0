//! Event handling and state transition logic.
//!
//! [`handle_event`] is the single entry point of the list-view controller. It
//! mutates [`AppState`] and returns the actions the caller must run against
//! the store, never touching the store itself.
//!
//! # Event Types
//!
//! - **Navigation**: `SelectTab`, `GoToPage`, `NextPage`, `PreviousPage`
//! - **Query**: `SetSearch`, `SetDepartment`, `SortBy`, `SetSort`
//! - **Deletion**: `RequestDeleteEmployee`, `RequestDeleteGradeLevel`,
//!   `ConfirmDelete`, `CancelDelete`
//! - **Grade editor**: `OpenGradeEditor`, `EditGradeLevelName`,
//!   `SubmitGradeLevel`, `CloseGradeEditor`
//! - **Export**: `Export`
//!
//! The employee form has its own entry point,
//! [`handle_form_event`](crate::app::handle_form_event), since it also needs
//! the country and state lists.
//! - **System**: `StoreChanged` after the store was mutated
//!
//! # Example
//!
//! ```
//! use staff_directory::app::{handle_event, AppState, Event};
//! use staff_directory::query::SortField;
//! use staff_directory::store::Snapshot;
//!
//! let mut state = AppState::new(10);
//! let snapshot = Snapshot { employees: &[], grade_levels: &[] };
//! let (render, actions) = handle_event(&mut state, &snapshot, &Event::SortBy(SortField::Email))?;
//! assert!(render);
//! assert!(actions.is_empty());
//! # Ok::<(), staff_directory::DirectoryError>(())
//! ```

use super::modes::{GradeEditor, PendingDelete, Tab};
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::validate_grade_level_name;
use crate::query::{export_csv, export_file_name, SortField, SortOrder};
use crate::store::Snapshot;

/// Inputs to the list-view controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SelectTab(Tab),

    /// Replaces the search term and returns to page 1.
    SetSearch(String),

    /// Selects a department (empty for all) and returns to page 1.
    SetDepartment(String),

    /// Column header click: toggles order on the same column.
    SortBy(SortField),

    /// Explicit sort menu choice.
    SetSort {
        field: SortField,
        order: SortOrder,
    },

    GoToPage(usize),
    NextPage,
    PreviousPage,

    RequestDeleteEmployee {
        id: String,
    },
    RequestDeleteGradeLevel {
        id: String,
    },
    ConfirmDelete,
    CancelDelete,

    /// Opens the editor empty (`None`) or on an existing grade level.
    OpenGradeEditor {
        id: Option<String>,
    },
    EditGradeLevelName(String),
    SubmitGradeLevel,
    CloseGradeEditor,

    /// Exports the filtered and sorted employee list.
    Export,

    /// The store was mutated; re-clamps the page and drops stale dialogs.
    StoreChanged,
}

/// Processes an event, mutates state, and returns whether to re-render plus
/// the actions to execute in order.
///
/// # Errors
///
/// Returns an error only if rendering the CSV export fails.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, snapshot: &Snapshot<'_>, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::SelectTab(tab) => {
            if state.tab == *tab {
                return Ok((false, vec![]));
            }
            tracing::debug!(tab = ?tab, "switching tab");
            state.tab = *tab;
            state.pending_delete = None;
            Ok((true, vec![]))
        }
        Event::SetSearch(term) => {
            if &state.query.search_term == term {
                return Ok((false, vec![]));
            }
            tracing::trace!(term = %term, "search term updated");
            state.query.search_term.clone_from(term);
            state.query.page = 1;
            Ok((true, vec![]))
        }
        Event::SetDepartment(department) => {
            if &state.query.department == department {
                return Ok((false, vec![]));
            }
            tracing::debug!(department = %department, "department filter updated");
            state.query.department.clone_from(department);
            state.query.page = 1;
            Ok((true, vec![]))
        }
        Event::SortBy(field) => {
            state.sort_by(*field);
            tracing::debug!(field = ?state.query.sort_field, order = ?state.query.sort_order, "sort changed");
            Ok((true, vec![]))
        }
        Event::SetSort { field, order } => {
            let changed = state.query.sort_field != *field || state.query.sort_order != *order;
            state.query.sort_field = *field;
            state.query.sort_order = *order;
            Ok((changed, vec![]))
        }
        Event::GoToPage(page) => Ok((go_to_page(state, snapshot, *page), vec![])),
        Event::NextPage => {
            let target = state.query.page.saturating_add(1);
            Ok((go_to_page(state, snapshot, target), vec![]))
        }
        Event::PreviousPage => {
            let target = state.query.page.saturating_sub(1);
            Ok((go_to_page(state, snapshot, target), vec![]))
        }
        Event::RequestDeleteEmployee { id } => {
            if !snapshot.employees.iter().any(|e| &e.id == id) {
                tracing::debug!(employee_id = %id, "delete requested for unknown employee");
                return Ok((false, vec![]));
            }
            state.pending_delete = Some(PendingDelete::Employee { id: id.clone() });
            Ok((true, vec![]))
        }
        Event::RequestDeleteGradeLevel { id } => {
            if snapshot.grade_level_name(id).is_none() {
                tracing::debug!(grade_level_id = %id, "delete requested for unknown grade level");
                return Ok((false, vec![]));
            }
            state.pending_delete = Some(PendingDelete::GradeLevel { id: id.clone() });
            Ok((true, vec![]))
        }
        Event::ConfirmDelete => {
            let Some(pending) = state.pending_delete.take() else {
                tracing::debug!("nothing awaiting confirmation");
                return Ok((false, vec![]));
            };
            tracing::debug!(record_id = pending.id(), "delete confirmed");
            let action = match pending {
                PendingDelete::Employee { id } => Action::DeleteEmployee { id },
                PendingDelete::GradeLevel { id } => Action::DeleteGradeLevel { id },
            };
            Ok((true, vec![action]))
        }
        Event::CancelDelete => Ok((state.pending_delete.take().is_some(), vec![])),
        Event::OpenGradeEditor { id } => {
            let name = match id {
                Some(id) => match snapshot.grade_level_name(id) {
                    Some(name) => name.to_string(),
                    None => {
                        tracing::debug!(grade_level_id = %id, "cannot edit unknown grade level");
                        return Ok((false, vec![]));
                    }
                },
                None => String::new(),
            };
            state.grade_editor = GradeEditor::Open {
                id: id.clone(),
                name,
                error: None,
            };
            Ok((true, vec![]))
        }
        Event::EditGradeLevelName(text) => {
            let GradeEditor::Open { name, error, .. } = &mut state.grade_editor else {
                return Ok((false, vec![]));
            };
            name.clone_from(text);
            *error = None;
            Ok((true, vec![]))
        }
        Event::SubmitGradeLevel => {
            let GradeEditor::Open { id, name, error } = &mut state.grade_editor else {
                return Ok((false, vec![]));
            };
            if let Err(errors) = validate_grade_level_name(name) {
                tracing::debug!(errors = %errors, "grade level rejected");
                *error = errors.get("name").map(String::from);
                return Ok((true, vec![]));
            }
            let action = Action::SaveGradeLevel {
                id: id.clone(),
                name: name.trim().to_string(),
            };
            state.grade_editor = GradeEditor::Closed;
            Ok((true, vec![action]))
        }
        Event::CloseGradeEditor => {
            let was_open = state.grade_editor.is_open();
            state.grade_editor = GradeEditor::Closed;
            Ok((was_open, vec![]))
        }
        Event::Export => {
            let contents = export_csv(snapshot.employees, snapshot.grade_levels, &state.query)?;
            let file_name = export_file_name(&chrono::Local::now());
            tracing::debug!(file_name = %file_name, bytes = contents.len(), "export prepared");
            Ok((false, vec![Action::ExportCsv { file_name, contents }]))
        }
        Event::StoreChanged => {
            let page_changed = state.clamp_page(snapshot);
            let dialogs_changed = state.discard_stale_dialogs(snapshot);
            tracing::debug!(page_changed, dialogs_changed, "store change applied");
            Ok((true, vec![]))
        }
    }
}

fn go_to_page(state: &mut AppState, snapshot: &Snapshot<'_>, page: usize) -> bool {
    let before = state.query.page;
    state.query.page = page;
    state.clamp_page(snapshot);
    state.query.page != before
}
