//! Tab, confirmation and editor state for the list views.
//!
//! The directory has two list views selected by [`Tab`]. On top of either
//! view, at most one of two transient interactions can be in progress: a
//! [`PendingDelete`] confirmation or the [`GradeEditor`] dialog.

/// Active list view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Employees,
    GradeLevels,
}

impl Tab {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Employees => "Employees",
            Self::GradeLevels => "Grade Levels",
        }
    }
}

/// Record awaiting delete confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingDelete {
    Employee { id: String },
    GradeLevel { id: String },
}

impl PendingDelete {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Employee { id } | Self::GradeLevel { id } => id,
        }
    }
}

/// Add/rename dialog for grade levels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GradeEditor {
    #[default]
    Closed,

    Open {
        /// Grade level being renamed; `None` when adding.
        id: Option<String>,

        /// Current contents of the name field.
        name: String,

        /// Message from the last rejected submit.
        error: Option<String>,
    },
}

impl GradeEditor {
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}
