//! Read-side pipeline over store snapshots.
//!
//! - `engine`: search, department filter, sort and pagination
//! - `export`: CSV rendering of the unpaginated result

pub mod engine;
pub mod export;

pub use engine::{filter_and_sort, run, EmployeeQuery, QueryPage, SortField, SortOrder, DEFAULT_PAGE_SIZE};
pub use export::{export_csv, export_file_name, to_csv, CSV_HEADER};
