//! Add/edit employee form.
//!
//! The form lives next to the list views in [`AppState::employee_form`]. It
//! depends on the country and state lists, so its events go through
//! [`handle_form_event`], which takes the [`LocationData`] alongside the store
//! snapshot. Submitting runs the field rules and the location check; only a
//! clean form yields [`Action::SaveEmployee`].
//!
//! # Example
//!
//! ```
//! use staff_directory::app::form::{handle_form_event, FormEvent};
//! use staff_directory::app::AppState;
//! use staff_directory::geography::LocationData;
//! use staff_directory::store::Snapshot;
//!
//! let mut state = AppState::new(10);
//! let snapshot = Snapshot { employees: &[], grade_levels: &[] };
//! let location = LocationData::loading();
//!
//! handle_form_event(&mut state, &snapshot, &location, &FormEvent::Open { id: None });
//! let (_, actions) = handle_form_event(&mut state, &snapshot, &location, &FormEvent::Submit);
//! assert!(actions.is_empty());
//! assert!(state.employee_form.is_some());
//! ```

use crate::app::{Action, AppState};
use crate::domain::{validate_employee, validate_location, EmployeeInput, ValidationErrors, DEPARTMENTS};
use crate::geography::{GeographyProvider, LocationData, LocationStatus};
use crate::store::Snapshot;
use crate::ui::viewmodel::{EmployeeFormView, SelectOption, NO_GRADE_LEVEL};

/// Editable employee fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    FullName,
    Email,
    PhoneNumber,
    Country,
    State,
    Address,
    Role,
    Department,
    GradeLevel,
}

impl FormField {
    /// Key used for this field in [`ValidationErrors`].
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::PhoneNumber => "phoneNumber",
            Self::Country => "country",
            Self::State => "state",
            Self::Address => "address",
            Self::Role => "role",
            Self::Department => "department",
            Self::GradeLevel => "gradeLevel",
        }
    }
}

/// Form contents and the errors of the last rejected submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeForm {
    /// Employee being edited; `None` when adding.
    pub id: Option<String>,

    pub values: EmployeeInput,

    pub errors: ValidationErrors,
}

impl EmployeeForm {
    /// Sets one field and clears its error.
    ///
    /// Choosing a different country also clears the state, since states are
    /// only meaningful within their country. An empty grade level means none.
    pub fn set(&mut self, field: FormField, value: &str) {
        let values = &mut self.values;
        let slot = match field {
            FormField::FullName => &mut values.full_name,
            FormField::Email => &mut values.email,
            FormField::PhoneNumber => &mut values.phone_number,
            FormField::Country => {
                if values.country != value {
                    values.state.clear();
                    self.errors.remove(FormField::State.key());
                }
                &mut values.country
            }
            FormField::State => &mut values.state,
            FormField::Address => &mut values.address,
            FormField::Role => &mut values.role,
            FormField::Department => &mut values.department,
            FormField::GradeLevel => {
                values.grade_level = Some(value.trim()).filter(|v| !v.is_empty()).map(String::from);
                self.errors.remove(field.key());
                return;
            }
        };
        value.clone_into(slot);
        self.errors.remove(field.key());
    }

    /// Runs the field rules and the location check.
    fn validate(&self, geography: &dyn GeographyProvider) -> ValidationErrors {
        let mut errors = validate_employee(&self.values).err().unwrap_or_default();
        if let Err(location_errors) = validate_location(&self.values, geography) {
            errors.merge(location_errors);
        }
        errors
    }

    /// Builds the form's view model.
    #[must_use]
    pub fn view(&self, snapshot: &Snapshot<'_>, location: &LocationData) -> EmployeeFormView {
        let values = &self.values;
        let options = |items: Vec<String>, current: &str| -> Vec<SelectOption> {
            items
                .into_iter()
                .map(|item| SelectOption {
                    selected: item == current,
                    label: item.clone(),
                    value: item,
                })
                .collect()
        };

        let mut grade_levels = vec![SelectOption {
            label: NO_GRADE_LEVEL.to_string(),
            value: String::new(),
            selected: values.grade_level.is_none(),
        }];
        grade_levels.extend(snapshot.grade_levels.iter().map(|g| SelectOption {
            label: g.name.clone(),
            value: g.id.clone(),
            selected: values.grade_level.as_deref() == Some(g.id.as_str()),
        }));

        let location_notice = match location.status() {
            LocationStatus::Loading => Some("Loading...".to_string()),
            LocationStatus::Failed(reason) => Some(reason.clone()),
            LocationStatus::Ready => None,
        };

        let editing = self.id.is_some();
        EmployeeFormView {
            title: if editing { "Edit Employee" } else { "Add Employee" }.to_string(),
            submit_label: if editing { "Update Employee" } else { "Add Employee" }.to_string(),
            values: values.clone(),
            errors: self.errors.clone(),
            countries: options(location.countries(), &values.country),
            states: options(location.states_for(Some(values.country.as_str())), &values.state),
            state_enabled: !values.country.trim().is_empty(),
            departments: options(DEPARTMENTS.iter().map(ToString::to_string).collect(), &values.department),
            grade_levels,
            location_notice,
            can_submit: !location.is_loading(),
        }
    }
}

/// Inputs to the employee form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// Opens the form empty (`None`) or pre-filled from an existing employee.
    Open { id: Option<String> },

    Edit { field: FormField, value: String },

    Submit,

    Close,
}

/// Processes a form event. Returns whether to re-render plus the actions to
/// execute, like [`handle_event`](crate::app::handle_event).
pub fn handle_form_event(
    state: &mut AppState,
    snapshot: &Snapshot<'_>,
    location: &LocationData,
    event: &FormEvent,
) -> (bool, Vec<Action>) {
    let _span = tracing::debug_span!("handle_form_event", event_type = ?event).entered();

    match event {
        FormEvent::Open { id } => {
            let values = match id {
                Some(id) => match snapshot.employees.iter().find(|e| &e.id == id) {
                    Some(employee) => employee.to_input(),
                    None => {
                        tracing::debug!(employee_id = %id, "cannot edit unknown employee");
                        return (false, vec![]);
                    }
                },
                None => EmployeeInput::default(),
            };
            state.employee_form = Some(EmployeeForm {
                id: id.clone(),
                values,
                errors: ValidationErrors::default(),
            });
            (true, vec![])
        }
        FormEvent::Edit { field, value } => {
            let Some(form) = state.employee_form.as_mut() else {
                return (false, vec![]);
            };
            form.set(*field, value);
            (true, vec![])
        }
        FormEvent::Submit => {
            let Some(form) = state.employee_form.as_mut() else {
                return (false, vec![]);
            };
            if location.is_loading() {
                tracing::debug!("submit ignored while locations load");
                return (false, vec![]);
            }

            let errors = form.validate(location);
            if !errors.is_empty() {
                tracing::debug!(errors = %errors, "employee rejected");
                form.errors = errors;
                return (true, vec![]);
            }

            let action = Action::SaveEmployee {
                id: form.id.clone(),
                input: trimmed(&form.values),
            };
            state.employee_form = None;
            (true, vec![action])
        }
        FormEvent::Close => (state.employee_form.take().is_some(), vec![]),
    }
}

fn trimmed(values: &EmployeeInput) -> EmployeeInput {
    let trim = |s: &String| s.trim().to_string();
    EmployeeInput {
        full_name: trim(&values.full_name),
        email: trim(&values.email),
        phone_number: trim(&values.phone_number),
        country: trim(&values.country),
        state: trim(&values.state),
        address: trim(&values.address),
        role: trim(&values.role),
        department: trim(&values.department),
        grade_level: values.grade_level.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Employee, GradeLevel};
    use crate::geography::WorldCitiesDataset;

    fn location() -> LocationData {
        LocationData::ready(
            WorldCitiesDataset::from_json(
                r#"[{"country": "Canada", "name": "Toronto", "subcountry": "Ontario"},
                    {"country": "Canada", "name": "Montreal", "subcountry": "Quebec"},
                    {"country": "Japan", "name": "Osaka", "subcountry": "Osaka"}]"#,
            )
            .unwrap(),
        )
    }

    fn fill(state: &mut AppState, snapshot: &Snapshot<'_>, location: &LocationData) {
        for (field, value) in [
            (FormField::FullName, " Ann Smith "),
            (FormField::Email, "ann@example.com"),
            (FormField::PhoneNumber, "+1 555 0100"),
            (FormField::Country, "Canada"),
            (FormField::State, "Ontario"),
            (FormField::Address, "1 King Street"),
            (FormField::Role, "Recruiter"),
            (FormField::Department, "HR"),
        ] {
            handle_form_event(
                state,
                snapshot,
                location,
                &FormEvent::Edit {
                    field,
                    value: value.to_string(),
                },
            );
        }
    }

    fn edit(field: FormField, value: &str) -> FormEvent {
        FormEvent::Edit {
            field,
            value: value.to_string(),
        }
    }

    #[test]
    fn valid_form_emits_trimmed_save() {
        let snapshot = Snapshot {
            employees: &[],
            grade_levels: &[],
        };
        let location = location();
        let mut state = AppState::new(10);

        handle_form_event(&mut state, &snapshot, &location, &FormEvent::Open { id: None });
        fill(&mut state, &snapshot, &location);
        let (_, actions) = handle_form_event(&mut state, &snapshot, &location, &FormEvent::Submit);

        let [Action::SaveEmployee { id: None, input }] = actions.as_slice() else {
            panic!("expected one save, got {actions:?}");
        };
        assert_eq!(input.full_name, "Ann Smith");
        assert_eq!(input.state, "Ontario");
        assert!(state.employee_form.is_none());
    }

    #[test]
    fn invalid_form_keeps_errors_and_stays_open() {
        let snapshot = Snapshot {
            employees: &[],
            grade_levels: &[],
        };
        let location = location();
        let mut state = AppState::new(10);

        handle_form_event(&mut state, &snapshot, &location, &FormEvent::Open { id: None });
        fill(&mut state, &snapshot, &location);
        handle_form_event(&mut state, &snapshot, &location, &edit(FormField::Email, "not-an-email"));
        handle_form_event(&mut state, &snapshot, &location, &edit(FormField::State, "Bavaria"));
        let (render, actions) = handle_form_event(&mut state, &snapshot, &location, &FormEvent::Submit);

        assert!(render);
        assert!(actions.is_empty());
        let form = state.employee_form.as_ref().unwrap();
        assert_eq!(form.errors.get("email"), Some("Invalid email address"));
        assert!(form.errors.get("state").is_some());

        handle_form_event(&mut state, &snapshot, &location, &edit(FormField::Email, "ann@example.com"));
        assert!(state.employee_form.as_ref().unwrap().errors.get("email").is_none());
    }

    #[test]
    fn changing_country_clears_state() {
        let mut form = EmployeeForm::default();
        form.set(FormField::Country, "Canada");
        form.set(FormField::State, "Quebec");

        form.set(FormField::Country, "Canada");
        assert_eq!(form.values.state, "Quebec");

        form.set(FormField::Country, "Japan");
        assert_eq!(form.values.state, "");
        assert_eq!(form.values.country, "Japan");
    }

    #[test]
    fn blank_grade_level_means_none() {
        let mut form = EmployeeForm::default();
        form.set(FormField::GradeLevel, "g1");
        assert_eq!(form.values.grade_level.as_deref(), Some("g1"));
        form.set(FormField::GradeLevel, "");
        assert_eq!(form.values.grade_level, None);
    }

    #[test]
    fn submit_waits_for_locations() {
        let snapshot = Snapshot {
            employees: &[],
            grade_levels: &[],
        };
        let loading = LocationData::loading();
        let mut state = AppState::new(10);

        handle_form_event(&mut state, &snapshot, &loading, &FormEvent::Open { id: None });
        fill(&mut state, &snapshot, &loading);
        let (render, actions) = handle_form_event(&mut state, &snapshot, &loading, &FormEvent::Submit);
        assert!(!render);
        assert!(actions.is_empty());

        let view = state.compute_employee_form(&snapshot, &loading).unwrap();
        assert!(!view.can_submit);
        assert_eq!(view.location_notice.as_deref(), Some("Loading..."));
    }

    #[test]
    fn editing_prefills_and_saves_under_same_id() {
        let employee = Employee::from_input(
            "e1".into(),
            EmployeeInput {
                full_name: "Bob Jones".into(),
                email: "bob@example.com".into(),
                phone_number: "555 0100 200".into(),
                country: "Japan".into(),
                state: "Osaka".into(),
                address: "1-1 Umeda".into(),
                role: "Engineer".into(),
                department: "IT".into(),
                grade_level: Some("g1".into()),
            },
        );
        let employees = vec![employee];
        let grades = vec![GradeLevel {
            id: "g1".into(),
            name: "Senior".into(),
        }];
        let snapshot = Snapshot {
            employees: &employees,
            grade_levels: &grades,
        };
        let location = location();
        let mut state = AppState::new(10);

        let (render, _) = handle_form_event(
            &mut state,
            &snapshot,
            &location,
            &FormEvent::Open {
                id: Some("missing".into()),
            },
        );
        assert!(!render);

        handle_form_event(
            &mut state,
            &snapshot,
            &location,
            &FormEvent::Open { id: Some("e1".into()) },
        );
        let view = state.compute_employee_form(&snapshot, &location).unwrap();
        assert_eq!(view.title, "Edit Employee");
        assert_eq!(view.submit_label, "Update Employee");
        assert_eq!(view.values.full_name, "Bob Jones");
        let states: Vec<&str> = view.states.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(states, ["Osaka"]);
        assert!(view.grade_levels.iter().any(|g| g.label == "Senior" && g.selected));

        handle_form_event(&mut state, &snapshot, &location, &edit(FormField::Role, "Lead Engineer"));
        let (_, actions) = handle_form_event(&mut state, &snapshot, &location, &FormEvent::Submit);
        let [Action::SaveEmployee { id: Some(id), input }] = actions.as_slice() else {
            panic!("expected one update, got {actions:?}");
        };
        assert_eq!(id, "e1");
        assert_eq!(input.role, "Lead Engineer");
    }

    #[test]
    fn view_without_country_disables_states() {
        let snapshot = Snapshot {
            employees: &[],
            grade_levels: &[],
        };
        let location = location();
        let view = EmployeeForm::default().view(&snapshot, &location);

        assert_eq!(view.title, "Add Employee");
        assert!(!view.state_enabled);
        assert!(view.states.is_empty());
        assert_eq!(view.countries.len(), 2);
        assert_eq!(view.departments.len(), DEPARTMENTS.len());
        assert_eq!(view.grade_levels[0].label, NO_GRADE_LEVEL);
        assert!(view.can_submit);
    }
}
