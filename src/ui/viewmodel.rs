//! View model types representing renderable list state.
//!
//! View models are created via `AppState::compute_viewmodel()` from the
//! controller state and a store snapshot. They contain no business logic,
//! only display-ready data: grade level references are already resolved,
//! pagination labels are formatted and empty states are chosen.
//!
//! # Example
//!
//! ```
//! use staff_directory::ui::viewmodel::PaginationInfo;
//!
//! let info = PaginationInfo::compute(2, 10, 23, 3).unwrap();
//! assert_eq!(info.summary, "Showing 11 to 20 of 23 results");
//! assert_eq!(info.pages, vec![1, 2, 3]);
//! assert!(PaginationInfo::compute(1, 10, 7, 1).is_none());
//! ```

use crate::app::modes::Tab;
use crate::domain::{EmployeeInput, ValidationErrors};
use crate::query::{SortField, SortOrder};

/// Placeholder shown for absent or dangling grade level references.
pub const NO_GRADE_LEVEL: &str = "N/A";

/// Number of page buttons shown at once.
const PAGE_WINDOW: usize = 3;

/// Complete view model for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    pub tab: Tab,

    pub header: HeaderInfo,

    /// Search, filter and sort controls of the employees tab.
    pub toolbar: Option<ToolbarInfo>,

    /// Current page of the employees tab; empty on the grade levels tab.
    pub employee_rows: Vec<EmployeeRow>,

    /// All grade levels; empty on the employees tab.
    pub grade_level_rows: Vec<GradeLevelRow>,

    /// Hidden when everything fits on one page.
    pub pagination: Option<PaginationInfo>,

    /// Shown instead of the table when there is nothing to list.
    pub empty_state: Option<EmptyState>,

    pub confirm_delete: Option<ConfirmDialog>,

    pub grade_editor: Option<GradeEditorView>,
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    /// Tab title with the number of records, e.g. `"Employees (12)"`.
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarInfo {
    pub search_term: String,

    /// "All Departments" followed by every department in use.
    pub department_options: Vec<SelectOption>,

    /// Sortable table columns in display order.
    pub sort_columns: Vec<SortColumn>,

    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

/// One entry of a dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,

    /// Submitted value; empty for the "all" or "none" entry.
    pub value: String,

    pub selected: bool,
}

/// Sortable column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortColumn {
    pub field: SortField,
    pub label: String,

    /// Set on the column the table is sorted by.
    pub order: Option<SortOrder>,
}

/// One row of the employees table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRow {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,

    /// `"State, Country"`.
    pub location: String,

    pub role: String,
    pub department: String,

    /// Resolved name, or [`NO_GRADE_LEVEL`].
    pub grade_level: String,
}

/// One row of the grade levels table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeLevelRow {
    pub id: String,
    pub name: String,

    /// Employees currently referencing this grade level.
    pub employee_count: usize,
}

/// Pagination bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationInfo {
    pub current_page: usize,
    pub total_pages: usize,

    /// e.g. `"Showing 11 to 20 of 23 results"`.
    pub summary: String,

    /// Page numbers to show as buttons, at most three, around the current one.
    pub pages: Vec<usize>,

    pub has_previous: bool,
    pub has_next: bool,
}

impl PaginationInfo {
    /// Builds the pagination bar, or `None` when there is at most one page.
    ///
    /// `page` is expected to be within `1..=total_pages`.
    #[must_use]
    pub fn compute(page: usize, page_size: usize, total_count: usize, total_pages: usize) -> Option<Self> {
        if total_pages <= 1 {
            return None;
        }

        let page_size = page_size.max(1);
        let first = page.saturating_sub(1) * page_size + 1;
        let last = (page * page_size).min(total_count);

        let window_start = page
            .saturating_sub(1)
            .clamp(1, total_pages.saturating_sub(PAGE_WINDOW - 1).max(1));
        let window_end = (window_start + PAGE_WINDOW - 1).min(total_pages);

        Some(Self {
            current_page: page,
            total_pages,
            summary: format!("Showing {first} to {last} of {total_count} results"),
            pages: (window_start..=window_end).collect(),
            has_previous: page > 1,
            has_next: page < total_pages,
        })
    }
}

/// Message shown in place of an empty table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

impl EmptyState {
    /// Distinguishes an empty directory from a search that matched nothing.
    #[must_use]
    pub fn for_employees(filtered: bool) -> Self {
        if filtered {
            Self {
                message: "No matching employees".to_string(),
                subtitle: "Try adjusting your search or filters to find what you're looking for.".to_string(),
            }
        } else {
            Self {
                message: "No employees".to_string(),
                subtitle: "Get started by adding your first employee.".to_string(),
            }
        }
    }

    #[must_use]
    pub fn for_grade_levels() -> Self {
        Self {
            message: "No grade levels".to_string(),
            subtitle: "Get started by adding your first grade level.".to_string(),
        }
    }
}

/// Delete confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    pub title: String,
    pub message: String,
}

/// Add/rename grade level dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeEditorView {
    /// "Add Grade Level" or "Edit Grade Level".
    pub title: String,

    pub name: String,

    /// Blocking error from the last submit.
    pub error: Option<String>,

    /// Soft warning when another grade level already uses the name.
    pub duplicate_warning: Option<String>,
}

/// Add/edit employee form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeFormView {
    /// "Add Employee" or "Edit Employee".
    pub title: String,

    /// "Add Employee" or "Update Employee".
    pub submit_label: String,

    pub values: EmployeeInput,

    /// Field errors from the last rejected submit.
    pub errors: ValidationErrors,

    pub countries: Vec<SelectOption>,

    /// States of the selected country.
    pub states: Vec<SelectOption>,

    /// False until a country is chosen.
    pub state_enabled: bool,

    pub departments: Vec<SelectOption>,

    /// [`NO_GRADE_LEVEL`] followed by every grade level; values are ids.
    pub grade_levels: Vec<SelectOption>,

    /// "Loading..." or the lookup failure shown above the location fields.
    pub location_notice: Option<String>,

    pub can_submit: bool,
}
