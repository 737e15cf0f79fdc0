//! Form-level validation rules for employees and grade levels.
//!
//! These checks run before a store mutation is issued. The store only guards
//! against blank required fields; length, format and location rules are
//! enforced here and reported per field so a form can show them inline.

use crate::domain::employee::EmployeeInput;
use crate::geography::GeographyProvider;
use std::collections::BTreeMap;

const FULL_NAME_LEN: (usize, usize) = (2, 100);
const ADDRESS_LEN: (usize, usize) = (5, 200);
const ROLE_LEN: (usize, usize) = (2, 50);
const DEPARTMENT_LEN: (usize, usize) = (2, 50);
const PHONE_LEN: (usize, usize) = (7, 20);

/// Field name → message map of validation failures.
///
/// Keys use the camelCase field names of the persisted record. Only the first
/// failing rule per field is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the message recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Adds the fields of `other` that have no message yet.
    pub fn merge(&mut self, other: Self) {
        for (field, message) in other.errors {
            self.insert(field, message);
        }
    }

    /// Clears the message for `field`, e.g. once the user edits it.
    pub fn remove(&mut self, field: &str) -> bool {
        self.errors.remove(field).is_some()
    }

    fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validates employee form data against the field rules.
///
/// # Errors
///
/// Returns every failing field with a human-readable message.
///
/// # Examples
///
/// ```
/// use staff_directory::domain::{validate_employee, EmployeeInput};
///
/// let errors = validate_employee(&EmployeeInput::default()).unwrap_err();
/// assert_eq!(errors.get("email"), Some("Email is required"));
/// ```
pub fn validate_employee(input: &EmployeeInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    check_length(&mut errors, "fullName", "Full name", &input.full_name, FULL_NAME_LEN);

    if input.email.trim().is_empty() {
        errors.insert("email", "Email is required");
    } else if !is_valid_email(input.email.trim()) {
        errors.insert("email", "Invalid email address");
    }

    let phone = input.phone_number.trim();
    if phone.is_empty() {
        errors.insert("phoneNumber", "Phone number is required");
    } else if !is_valid_phone(phone) {
        errors.insert(
            "phoneNumber",
            format!(
                "Phone number must be {}-{} digits, spaces or + - ( ) . characters",
                PHONE_LEN.0, PHONE_LEN.1
            ),
        );
    }

    if input.country.trim().is_empty() {
        errors.insert("country", "Country is required");
    }
    if input.state.trim().is_empty() {
        errors.insert("state", "State is required");
    }

    check_length(&mut errors, "address", "Address", &input.address, ADDRESS_LEN);
    check_length(&mut errors, "role", "Role", &input.role, ROLE_LEN);
    check_length(&mut errors, "department", "Department", &input.department, DEPARTMENT_LEN);

    errors.into_result()
}

/// Checks that the selected state belongs to the selected country.
///
/// This only holds at entry time; the store never re-validates locations.
/// A provider that has no states for the country (lookup failed, or the
/// country has no subdivisions) does not block submission.
///
/// # Errors
///
/// Returns a `state` error when the provider lists states for the country and
/// the chosen one is not among them.
pub fn validate_location(
    input: &EmployeeInput,
    geography: &dyn GeographyProvider,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if input.country.trim().is_empty() {
        errors.insert("country", "Country is required");
        return errors.into_result();
    }

    let states = geography.states(&input.country);
    if !states.is_empty() && !states.iter().any(|s| s == &input.state) {
        errors.insert(
            "state",
            format!("State must be one of the states of {}", input.country),
        );
    }
    errors.into_result()
}

/// Validates a grade level name.
///
/// # Errors
///
/// Returns a `name` error when the name is blank.
pub fn validate_grade_level_name(name: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if name.trim().is_empty() {
        errors.insert("name", "Grade level name is required");
    }
    errors.into_result()
}

fn check_length(
    errors: &mut ValidationErrors,
    field: &'static str,
    label: &str,
    value: &str,
    (min, max): (usize, usize),
) {
    let len = value.trim().chars().count();
    if len < min {
        errors.insert(field, format!("{label} must be at least {min} characters"));
    } else if len > max {
        errors.insert(field, format!("{label} must be less than {max} characters"));
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

fn is_valid_phone(phone: &str) -> bool {
    let len = phone.chars().count();
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    (PHONE_LEN.0..=PHONE_LEN.1).contains(&len)
        && digits >= PHONE_LEN.0
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.'))
}
