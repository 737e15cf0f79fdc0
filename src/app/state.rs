//! List-view state and view model computation.
//!
//! [`AppState`] holds everything transient about the two list views: the
//! active tab, the employee query (search, department, sort, page), and the
//! dialogs in progress. It never holds records; those are read from a
//! [`Snapshot`] each time a view model is computed.
//!
//! # Page Clamping
//!
//! The query engine returns an empty page for out-of-range page numbers.
//! The controller keeps `query.page` within `1..=max(total_pages, 1)`
//! instead, re-clamping after every navigation and store change, so deleting
//! the last row of the last page moves back one page.
//!
//! # Example
//!
//! ```
//! use staff_directory::app::AppState;
//! use staff_directory::store::Snapshot;
//!
//! let state = AppState::new(10);
//! let snapshot = Snapshot { employees: &[], grade_levels: &[] };
//! let vm = state.compute_viewmodel(&snapshot);
//! assert_eq!(vm.header.title, "Employees (0)");
//! assert_eq!(vm.empty_state.unwrap().message, "No employees");
//! ```

use super::form::EmployeeForm;
use super::modes::{GradeEditor, PendingDelete, Tab};
use crate::domain::Employee;
use crate::geography::LocationData;
use crate::query::{self, EmployeeQuery, SortField};
use crate::store::Snapshot;
use crate::ui::viewmodel::{
    ConfirmDialog, EmployeeFormView, EmployeeRow, EmptyState, GradeEditorView, GradeLevelRow, HeaderInfo,
    PaginationInfo, SelectOption, SortColumn, ToolbarInfo, UIViewModel, NO_GRADE_LEVEL,
};

/// Transient state of the list views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub tab: Tab,

    /// Search, department filter, sort and page of the employees tab.
    pub query: EmployeeQuery,

    /// Record awaiting delete confirmation.
    pub pending_delete: Option<PendingDelete>,

    pub grade_editor: GradeEditor,

    /// Add/edit employee form, when open.
    pub employee_form: Option<EmployeeForm>,
}

impl AppState {
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            tab: Tab::Employees,
            query: EmployeeQuery {
                page_size: page_size.max(1),
                ..EmployeeQuery::default()
            },
            pending_delete: None,
            grade_editor: GradeEditor::Closed,
            employee_form: None,
        }
    }

    /// Header click semantics: the same column toggles the order, a new
    /// column starts ascending.
    pub fn sort_by(&mut self, field: SortField) {
        if self.query.sort_field == field {
            self.query.sort_order = self.query.sort_order.toggled();
        } else {
            self.query.sort_field = field;
            self.query.sort_order = query::SortOrder::Asc;
        }
    }

    /// Number of pages the current query spans in `snapshot`.
    #[must_use]
    pub fn total_pages(&self, snapshot: &Snapshot<'_>) -> usize {
        let matching = query::filter_and_sort(snapshot.employees, &self.query).len();
        matching.div_ceil(self.query.page_size.max(1))
    }

    /// Moves `query.page` into `1..=max(total_pages, 1)`. Returns whether it changed.
    pub fn clamp_page(&mut self, snapshot: &Snapshot<'_>) -> bool {
        let last = self.total_pages(snapshot).max(1);
        let clamped = self.query.page.clamp(1, last);
        let changed = clamped != self.query.page;
        if changed {
            tracing::debug!(from = self.query.page, to = clamped, "page clamped");
            self.query.page = clamped;
        }
        changed
    }

    /// Drops dialogs whose target record no longer exists.
    pub fn discard_stale_dialogs(&mut self, snapshot: &Snapshot<'_>) -> bool {
        let mut changed = false;

        let pending_exists = match &self.pending_delete {
            Some(PendingDelete::Employee { id }) => snapshot.employees.iter().any(|e| &e.id == id),
            Some(PendingDelete::GradeLevel { id }) => snapshot.grade_levels.iter().any(|g| &g.id == id),
            None => true,
        };
        if !pending_exists {
            tracing::debug!("pending delete target vanished");
            self.pending_delete = None;
            changed = true;
        }

        if let GradeEditor::Open { id: Some(id), .. } = &self.grade_editor {
            if snapshot.grade_level_name(id).is_none() {
                tracing::debug!(grade_level_id = %id, "edited grade level vanished");
                self.grade_editor = GradeEditor::Closed;
                changed = true;
            }
        }

        if let Some(id) = self.employee_form.as_ref().and_then(|f| f.id.as_ref()) {
            if !snapshot.employees.iter().any(|e| &e.id == id) {
                tracing::debug!(employee_id = %id, "edited employee vanished");
                self.employee_form = None;
                changed = true;
            }
        }

        changed
    }

    /// Builds the employee form view, when the form is open.
    ///
    /// Kept apart from [`compute_viewmodel`](Self::compute_viewmodel) since
    /// only the form needs the country and state lists.
    #[must_use]
    pub fn compute_employee_form(&self, snapshot: &Snapshot<'_>, location: &LocationData) -> Option<EmployeeFormView> {
        self.employee_form.as_ref().map(|form| form.view(snapshot, location))
    }

    /// Builds the view model for the active tab.
    #[must_use]
    pub fn compute_viewmodel(&self, snapshot: &Snapshot<'_>) -> UIViewModel {
        let _span = tracing::debug_span!(
            "compute_viewmodel",
            tab = ?self.tab,
            employees = snapshot.employees.len(),
            grade_levels = snapshot.grade_levels.len()
        )
        .entered();

        let mut vm = UIViewModel {
            tab: self.tab,
            header: self.compute_header(snapshot),
            toolbar: None,
            employee_rows: Vec::new(),
            grade_level_rows: Vec::new(),
            pagination: None,
            empty_state: None,
            confirm_delete: self.compute_confirm_dialog(snapshot),
            grade_editor: self.compute_grade_editor(snapshot),
        };

        match self.tab {
            Tab::Employees => {
                let page = query::run(snapshot.employees, &self.query);
                vm.toolbar = Some(self.compute_toolbar(snapshot));
                vm.employee_rows = page.items.iter().map(|e| employee_row(e, snapshot)).collect();
                vm.pagination =
                    PaginationInfo::compute(page.page, self.query.page_size, page.total_count, page.total_pages);
                if page.total_count == 0 {
                    vm.empty_state = Some(EmptyState::for_employees(self.query.is_filtered()));
                }
            }
            Tab::GradeLevels => {
                vm.grade_level_rows = snapshot
                    .grade_levels
                    .iter()
                    .map(|g| GradeLevelRow {
                        id: g.id.clone(),
                        name: g.name.clone(),
                        employee_count: snapshot
                            .employees
                            .iter()
                            .filter(|e| e.grade_level.as_deref() == Some(g.id.as_str()))
                            .count(),
                    })
                    .collect();
                if vm.grade_level_rows.is_empty() {
                    vm.empty_state = Some(EmptyState::for_grade_levels());
                }
            }
        }

        vm
    }

    fn compute_header(&self, snapshot: &Snapshot<'_>) -> HeaderInfo {
        let count = match self.tab {
            Tab::Employees => snapshot.employees.len(),
            Tab::GradeLevels => snapshot.grade_levels.len(),
        };
        HeaderInfo {
            title: format!("{} ({count})", self.tab.title()),
        }
    }

    fn compute_toolbar(&self, snapshot: &Snapshot<'_>) -> ToolbarInfo {
        let mut department_options = vec![SelectOption {
            label: "All Departments".to_string(),
            value: String::new(),
            selected: self.query.department.is_empty(),
        }];
        department_options.extend(snapshot.departments().into_iter().map(|dept| SelectOption {
            label: dept.to_string(),
            value: dept.to_string(),
            selected: self.query.department == dept,
        }));

        let sort_columns = SortField::ALL
            .into_iter()
            .map(|field| SortColumn {
                field,
                label: field.label().to_string(),
                order: (field == self.query.sort_field).then_some(self.query.sort_order),
            })
            .collect();

        ToolbarInfo {
            search_term: self.query.search_term.clone(),
            department_options,
            sort_columns,
            sort_field: self.query.sort_field,
            sort_order: self.query.sort_order,
        }
    }

    fn compute_confirm_dialog(&self, snapshot: &Snapshot<'_>) -> Option<ConfirmDialog> {
        match self.pending_delete.as_ref()? {
            PendingDelete::Employee { id } => {
                let name = snapshot
                    .employees
                    .iter()
                    .find(|e| &e.id == id)
                    .map_or("this employee", |e| e.full_name.as_str());
                Some(ConfirmDialog {
                    title: "Delete Employee".to_string(),
                    message: format!("Are you sure you want to delete {name}? This action cannot be undone."),
                })
            }
            PendingDelete::GradeLevel { id } => {
                let name = snapshot.grade_level_name(id).unwrap_or("this grade level");
                Some(ConfirmDialog {
                    title: "Delete Grade Level".to_string(),
                    message: format!(
                        "Are you sure you want to delete {name}? Employees assigned to it will show {NO_GRADE_LEVEL}."
                    ),
                })
            }
        }
    }

    fn compute_grade_editor(&self, snapshot: &Snapshot<'_>) -> Option<GradeEditorView> {
        let GradeEditor::Open { id, name, error } = &self.grade_editor else {
            return None;
        };

        let duplicate_warning = (!name.trim().is_empty()
            && snapshot.grade_level_name_taken(name, id.as_deref()))
        .then(|| "This grade level already exists".to_string());

        Some(GradeEditorView {
            title: if id.is_some() { "Edit Grade Level" } else { "Add Grade Level" }.to_string(),
            name: name.clone(),
            error: error.clone(),
            duplicate_warning,
        })
    }
}

fn employee_row(employee: &Employee, snapshot: &Snapshot<'_>) -> EmployeeRow {
    let grade_level = employee
        .grade_level
        .as_deref()
        .and_then(|id| snapshot.grade_level_name(id))
        .unwrap_or(NO_GRADE_LEVEL);

    EmployeeRow {
        id: employee.id.clone(),
        full_name: employee.full_name.clone(),
        email: employee.email.clone(),
        phone_number: employee.phone_number.clone(),
        location: format!("{}, {}", employee.state, employee.country),
        role: employee.role.clone(),
        department: employee.department.clone(),
        grade_level: grade_level.to_string(),
    }
}
