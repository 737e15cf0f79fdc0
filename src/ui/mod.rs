//! Presentation-facing view models.
//!
//! Rendering is left to the embedding front end. This module only defines
//! what it receives:
//!
//! ```text
//! AppState + Snapshot → compute_viewmodel → UIViewModel → front end
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Rows, pagination, empty states, dialogs and the employee form

pub mod viewmodel;

pub use viewmodel::{
    ConfirmDialog, EmployeeFormView, EmployeeRow, EmptyState, GradeEditorView, GradeLevelRow, HeaderInfo,
    PaginationInfo, SelectOption, SortColumn, ToolbarInfo, UIViewModel, NO_GRADE_LEVEL,
};
