//! Domain layer for the staff directory.
//!
//! This module contains the record types, error types and form rules, kept
//! free of storage and presentation concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`employee`]: Employee and grade level models
//! - [`validation`]: Field rules applied before a record reaches the store
//!
//! # Examples
//!
//! ```
//! use staff_directory::domain::{Employee, EmployeeInput, GradeLevel};
//!
//! let grade = GradeLevel::new("Senior");
//! let employee = Employee::from_input(
//!     "e-1".to_string(),
//!     EmployeeInput { grade_level: Some(grade.id.clone()), ..Default::default() },
//! );
//! assert_eq!(employee.grade_level.as_deref(), Some(grade.id.as_str()));
//! ```

pub mod employee;
pub mod error;
pub mod validation;

pub use employee::{new_id, Employee, EmployeeInput, GradeLevel, DEPARTMENTS};
pub use error::{DirectoryError, Result};
pub use validation::{
    validate_employee, validate_grade_level_name, validate_location, ValidationErrors,
};
