//! Employee and grade level domain models.
//!
//! Records serialize with the camelCase field names of the persisted envelope
//! (`fullName`, `phoneNumber`, `gradeLevel`, ...). Text fields that older
//! envelopes may lack default to the empty string on read.

use serde::{Deserialize, Deserializer, Serialize};

/// Departments offered by the employee form.
///
/// The department filter compares against these values exactly, so they are
/// treated as a fixed enumeration rather than free text.
pub const DEPARTMENTS: [&str; 10] = [
    "HR",
    "Finance",
    "IT",
    "Marketing",
    "Sales",
    "Operations",
    "R&D",
    "Customer Service",
    "Legal",
    "Administration",
];

/// Generates a fresh, unique record id.
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Employee data as submitted by a form, before an id is assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeInput {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub country: String,
    pub state: String,
    pub address: String,
    pub role: String,
    pub department: String,
    #[serde(
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub grade_level: Option<String>,
}

impl EmployeeInput {
    /// Returns the names of required fields that are blank.
    ///
    /// This is the store's own safety net; the richer length and format rules
    /// live in [`crate::domain::validation`].
    #[must_use]
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        [
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("phoneNumber", &self.phone_number),
            ("country", &self.country),
            ("state", &self.state),
            ("address", &self.address),
            ("role", &self.role),
            ("department", &self.department),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// A stored employee record.
///
/// `id` is assigned by the store on creation and never changes afterwards.
/// `grade_level` references a [`GradeLevel`] id and may dangle once that grade
/// level is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub department: String,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub grade_level: Option<String>,
}

impl Employee {
    /// Builds a record from form input under the given id.
    #[must_use]
    pub fn from_input(id: String, input: EmployeeInput) -> Self {
        Self {
            id,
            full_name: input.full_name,
            email: input.email,
            phone_number: input.phone_number,
            country: input.country,
            state: input.state,
            address: input.address,
            role: input.role,
            department: input.department,
            grade_level: input.grade_level,
        }
    }

    /// Returns the record's data without its id, for pre-seeding an edit form.
    #[must_use]
    pub fn to_input(&self) -> EmployeeInput {
        EmployeeInput {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            country: self.country.clone(),
            state: self.state.clone(),
            address: self.address.clone(),
            role: self.role.clone(),
            department: self.department.clone(),
            grade_level: self.grade_level.clone(),
        }
    }

    /// Every field value of the record in declaration order, id included.
    ///
    /// An absent grade level contributes nothing.
    pub fn field_values(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.id.as_str()),
            Some(self.full_name.as_str()),
            Some(self.email.as_str()),
            Some(self.phone_number.as_str()),
            Some(self.country.as_str()),
            Some(self.state.as_str()),
            Some(self.address.as_str()),
            Some(self.role.as_str()),
            Some(self.department.as_str()),
            self.grade_level.as_deref(),
        ]
        .into_iter()
        .flatten()
    }

    /// Returns the names of required fields that are blank.
    #[must_use]
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        self.to_input().missing_required_fields()
    }
}

/// A grade level employees can be classified under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeLevel {
    pub id: String,
    pub name: String,
}

impl GradeLevel {
    /// Creates a grade level with a freshly generated id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
        }
    }
}

/// Reads `""` and `null` as "no grade level", which is how the form submits an
/// unselected dropdown.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()))
}
