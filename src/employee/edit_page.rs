//! The page for editing an existing employee.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    employee::{Employee, EmployeeId, get_employee},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
};

/// The state needed for the edit employee page.
#[derive(Debug, Clone)]
pub struct EditEmployeePageState {
    /// The database connection for managing employees.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditEmployeePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the employee edit page with the employee's current details filled in.
pub async fn get_edit_employee_page(
    State(state): State<EditEmployeePageState>,
    Path(employee_id): Path<EmployeeId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let employee = get_employee(employee_id, &connection)
        .inspect_err(|error| tracing::error!("could not get employee {employee_id}: {error}"))?;

    Ok(edit_employee_view(&employee).into_response())
}

fn edit_employee_view(employee: &Employee) -> Markup {
    let nav_bar = NavBar::new(endpoints::EMPLOYEES_VIEW).into_html();
    let form = edit_employee_form_view(employee, "");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold my-4" { "Edit " (employee.name) }
            (form)
        }
    };

    base("Edit Employee", &[], &content)
}

/// The employee edit form, with an optional error message from a previous
/// submission.
pub(super) fn edit_employee_form_view(employee: &Employee, error_message: &str) -> Markup {
    let put_url = format_endpoint(endpoints::PUT_EMPLOYEE, employee.id);

    html! {
        form
            hx-put=(put_url)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    required
                    value=(employee.name)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="designation" class=(FORM_LABEL_STYLE) { "Designation" }

                input
                    id="designation"
                    type="text"
                    name="designation"
                    required
                    value=(employee.designation)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="monthly_salary" class=(FORM_LABEL_STYLE) { "Monthly Salary" }

                input
                    id="monthly_salary"
                    type="number"
                    name="monthly_salary"
                    min="0"
                    step="0.01"
                    required
                    value=(employee.monthly_salary)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="join_date" class=(FORM_LABEL_STYLE) { "Join Date" }

                input
                    id="join_date"
                    type="date"
                    name="join_date"
                    required
                    value=(employee.join_date)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Changes" }
        }
    }
}

#[cfg(test)]
mod edit_employee_page_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use axum::extract::{Path, State};
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        employee::{NewEmployee, create_employee},
        endpoints::{self, format_endpoint},
        initialize_db,
        test_utils::{
            assert_form_input_with_value, assert_hx_endpoint, assert_valid_html, must_get_form,
            parse_html_document,
        },
    };

    use super::{EditEmployeePageState, get_edit_employee_page};

    #[tokio::test]
    async fn renders_form_with_current_values() {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        let employee = create_employee(
            NewEmployee::new(
                "Raj",
                "Waiter",
                Decimal::from_str("20000").unwrap(),
                date!(2024 - 01 - 01),
            )
            .unwrap(),
            &connection,
        )
        .unwrap();
        let state = EditEmployeePageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_edit_employee_page(State(state), Path(employee.id))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &format_endpoint(endpoints::PUT_EMPLOYEE, employee.id),
            "hx-put",
        );
        assert_form_input_with_value(&form, "name", "text", "Raj");
        assert_form_input_with_value(&form, "designation", "text", "Waiter");
        assert_form_input_with_value(&form, "monthly_salary", "number", "20000");
        assert_form_input_with_value(&form, "join_date", "date", "2024-01-01");
    }

    #[tokio::test]
    async fn missing_employee_renders_not_found() {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        let state = EditEmployeePageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let result = get_edit_employee_page(State(state), Path(42)).await;

        assert_eq!(result.unwrap_err(), crate::Error::NotFound);
    }
}
