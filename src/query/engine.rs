//! Search, department filter, sort and pagination over an employee slice.
//!
//! Everything here is a pure function of its inputs: the same employees and
//! the same [`EmployeeQuery`] always yield the same [`QueryPage`].

use crate::domain::Employee;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Column an employee list can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    FullName,
    Email,
    Department,
    Role,
}

impl SortField {
    pub const ALL: [Self; 4] = [Self::FullName, Self::Email, Self::Department, Self::Role];

    /// Returns the value of this column for `employee`.
    #[must_use]
    pub fn value_of(self, employee: &Employee) -> &str {
        match self {
            Self::FullName => &employee.full_name,
            Self::Email => &employee.email,
            Self::Department => &employee.department,
            Self::Role => &employee.role,
        }
    }

    /// Column header label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FullName => "Name",
            Self::Email => "Email",
            Self::Department => "Department",
            Self::Role => "Role",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Parameters of one list query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeQuery {
    /// Case-insensitive substring matched against every field; empty matches all.
    pub search_term: String,

    /// Exact, case-sensitive department; empty matches all.
    pub department: String,

    pub sort_field: SortField,
    pub sort_order: SortOrder,

    /// 1-based page number. Pages past the end are empty.
    pub page: usize,

    pub page_size: usize,
}

impl Default for EmployeeQuery {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            department: String::new(),
            sort_field: SortField::default(),
            sort_order: SortOrder::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl EmployeeQuery {
    /// Whether a search term or department filter narrows the list.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        !self.search_term.is_empty() || !self.department.is_empty()
    }

    fn effective_page_size(&self) -> usize {
        self.page_size.max(1)
    }
}

/// One page of a query result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPage<'a> {
    pub items: Vec<&'a Employee>,

    /// Number of employees matching search and filter, over all pages.
    pub total_count: usize,

    pub total_pages: usize,

    /// Requested page, echoed back unclamped.
    pub page: usize,
}

/// Runs the full pipeline: search, department filter, sort, paginate.
///
/// A `page_size` of zero is treated as one. A page outside
/// `1..=total_pages` yields no items but still reports the totals.
///
/// # Examples
///
/// ```
/// use staff_directory::domain::{Employee, EmployeeInput};
/// use staff_directory::query::{run, EmployeeQuery};
///
/// let staff = [("b", "Bob", "IT"), ("a", "Ann", "HR")].map(|(id, name, dept)| {
///     Employee::from_input(
///         id.into(),
///         EmployeeInput { full_name: name.into(), department: dept.into(), ..Default::default() },
///     )
/// });
///
/// let page = run(&staff, &EmployeeQuery::default());
/// let names: Vec<&str> = page.items.iter().map(|e| e.full_name.as_str()).collect();
/// assert_eq!(names, ["Ann", "Bob"]);
/// assert_eq!((page.total_count, page.total_pages), (2, 1));
/// ```
#[must_use]
pub fn run<'a>(employees: &'a [Employee], query: &EmployeeQuery) -> QueryPage<'a> {
    let _span = tracing::debug_span!(
        "query_run",
        total_employees = employees.len(),
        search_len = query.search_term.len(),
        department = %query.department,
        sort_field = ?query.sort_field,
        sort_order = ?query.sort_order,
        page = query.page
    )
    .entered();

    let matching = filter_and_sort(employees, query);
    let page_size = query.effective_page_size();
    let total_count = matching.len();
    let total_pages = total_count.div_ceil(page_size);

    let items = match query.page.checked_sub(1) {
        Some(index) => matching
            .into_iter()
            .skip(index.saturating_mul(page_size))
            .take(page_size)
            .collect(),
        None => Vec::new(),
    };

    tracing::debug!(total_count, total_pages, returned = items.len(), "query evaluated");

    QueryPage {
        items,
        total_count,
        total_pages,
        page: query.page,
    }
}

/// Search, filter and sort without pagination. Used for CSV export.
#[must_use]
pub fn filter_and_sort<'a>(employees: &'a [Employee], query: &EmployeeQuery) -> Vec<&'a Employee> {
    let needle = query.search_term.to_lowercase();

    let field = query.sort_field;

    let mut keyed: Vec<(CollationKey, &Employee)> = employees
        .iter()
        .filter(|e| matches_search(e, &needle))
        .filter(|e| query.department.is_empty() || e.department == query.department)
        .map(|e| (CollationKey::new(field.value_of(e)), e))
        .collect();

    // sort_by is stable, so ties keep their stored order in both directions.
    match query.sort_order {
        SortOrder::Asc => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
        SortOrder::Desc => keyed.sort_by(|a, b| b.0.cmp(&a.0)),
    }

    keyed.into_iter().map(|(_, e)| e).collect()
}

/// `needle` must already be lowercased.
fn matches_search(employee: &Employee, needle: &str) -> bool {
    needle.is_empty()
        || employee
            .field_values()
            .any(|value| value.to_lowercase().contains(needle))
}

/// Case-insensitive ordering key that places accented letters next to
/// their base letters.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CollationKey {
    base: String,
    exact: String,
}

impl CollationKey {
    fn new(value: &str) -> Self {
        let exact = value.to_lowercase();
        let base = exact.nfd().filter(|c| !is_combining_mark(*c)).collect();
        Self { base, exact }
    }
}

impl Ord for CollationKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.base
            .cmp(&other.base)
            .then_with(|| self.exact.cmp(&other.exact))
    }
}

impl PartialOrd for CollationKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
