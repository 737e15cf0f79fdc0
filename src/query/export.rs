//! CSV export of a filtered and sorted employee list.

use crate::domain::error::{DirectoryError, Result};
use crate::domain::{Employee, GradeLevel};
use crate::query::engine::{filter_and_sort, EmployeeQuery};
use chrono::{DateTime, TimeZone};

/// Header row of every export.
pub const CSV_HEADER: [&str; 9] = [
    "Name",
    "Email",
    "Phone",
    "Country",
    "State",
    "Address",
    "Role",
    "Department",
    "Grade Level",
];

/// Renders `employees` as CSV, one row per employee after the header.
///
/// Fields are quoted only when they contain a delimiter, quote or line
/// break. Unresolved grade level references render as an empty field. The
/// output has no trailing newline.
///
/// # Errors
///
/// Returns [`DirectoryError::Storage`] if the CSV writer fails.
pub fn to_csv(employees: &[&Employee], grade_levels: &[GradeLevel]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER).map_err(csv_error)?;
    for employee in employees {
        let grade_level = employee
            .grade_level
            .as_deref()
            .and_then(|id| grade_levels.iter().find(|g| g.id == id))
            .map_or("", |g| g.name.as_str());

        writer
            .write_record([
                employee.full_name.as_str(),
                employee.email.as_str(),
                employee.phone_number.as_str(),
                employee.country.as_str(),
                employee.state.as_str(),
                employee.address.as_str(),
                employee.role.as_str(),
                employee.department.as_str(),
                grade_level,
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DirectoryError::Storage(format!("failed to finish CSV export: {e}")))?;
    let mut text =
        String::from_utf8(bytes).map_err(|e| DirectoryError::Storage(format!("CSV export is not UTF-8: {e}")))?;
    if text.ends_with('\n') {
        text.pop();
    }

    tracing::debug!(rows = employees.len(), bytes = text.len(), "CSV export rendered");
    Ok(text)
}

/// Exports every employee matching `query`, ignoring its pagination.
///
/// # Errors
///
/// See [`to_csv`].
pub fn export_csv(employees: &[Employee], grade_levels: &[GradeLevel], query: &EmployeeQuery) -> Result<String> {
    let _span = tracing::debug_span!("export_csv", search_len = query.search_term.len(), department = %query.department)
        .entered();
    to_csv(&filter_and_sort(employees, query), grade_levels)
}

/// Download name for an export taken at `at`, e.g. `employees-20240501-093000.csv`.
#[must_use]
pub fn export_file_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("employees-%Y%m%d-%H%M%S.csv").to_string()
}

fn csv_error(e: csv::Error) -> DirectoryError {
    DirectoryError::Storage(format!("failed to write CSV row: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmployeeInput;
    use crate::query::engine::SortOrder;
    use chrono::Utc;

    fn employee(id: &str, name: &str, grade_level: Option<&str>) -> Employee {
        Employee::from_input(
            id.into(),
            EmployeeInput {
                full_name: name.into(),
                email: format!("{}@example.com", name.to_lowercase()),
                phone_number: "555-0100".into(),
                country: "Canada".into(),
                state: "Ontario".into(),
                address: "1 King Street".into(),
                role: "Analyst".into(),
                department: "IT".into(),
                grade_level: grade_level.map(String::from),
            },
        )
    }

    #[test]
    fn rows_follow_header_and_resolve_grade_levels() {
        let grades = vec![GradeLevel {
            id: "g1".into(),
            name: "Senior".into(),
        }];
        let staff = vec![
            employee("1", "Ann", Some("g1")),
            employee("2", "Bob", Some("deleted")),
            employee("3", "Cid", None),
        ];
        let csv = export_csv(&staff, &grades, &EmployeeQuery::default()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Name,Email,Phone,Country,State,Address,Role,Department,Grade Level");
        assert_eq!(
            lines[1],
            "Ann,ann@example.com,555-0100,Canada,Ontario,1 King Street,Analyst,IT,Senior"
        );
        assert!(lines[2].ends_with(",IT,"));
        assert!(lines[3].ends_with(",IT,"));
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn export_ignores_pagination_but_keeps_order_and_filter() {
        let staff: Vec<Employee> = (0..15)
            .map(|i| employee(&i.to_string(), &format!("E{i:02}"), None))
            .collect();
        let query = EmployeeQuery {
            search_term: "e1".into(),
            sort_order: SortOrder::Desc,
            page: 2,
            page_size: 2,
            ..EmployeeQuery::default()
        };
        let csv = export_csv(&staff, &[], &query).unwrap();
        let names: Vec<&str> = csv.lines().skip(1).map(|l| l.split(',').next().unwrap()).collect();

        assert_eq!(names, ["E14", "E13", "E12", "E11", "E10"]);
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let mut odd = employee("1", "Smith, Ann", None);
        odd.address = "Unit 4, \"The Yard\"".into();
        let csv = to_csv(&[&odd], &[]).unwrap();

        assert!(csv.contains("\"Smith, Ann\""));
        assert!(csv.contains("\"Unit 4, \"\"The Yard\"\"\""));
    }

    #[test]
    fn empty_list_exports_header_only() {
        assert_eq!(to_csv(&[], &[]).unwrap(), CSV_HEADER.join(","));
    }

    #[test]
    fn file_name_is_timestamped() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        assert_eq!(export_file_name(&at), "employees-20240501-093000.csv");
    }
}
