//! Defines the endpoint for updating an employee.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    employee::{
        Employee, EmployeeFormData, EmployeeId, EmployeeName, NewEmployee,
        edit_page::edit_employee_form_view, update_employee,
    },
    endpoints,
};

/// The state needed to edit an employee.
#[derive(Debug, Clone)]
pub struct EditEmployeeState {
    /// The database connection for managing employees.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditEmployeeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating an employee, redirects to the employees page
/// on success.
///
/// Updating the employee never touches existing withdrawals: lowering the
/// salary below the withdrawn total is allowed and simply blocks further
/// withdrawals.
pub async fn edit_employee_endpoint(
    State(state): State<EditEmployeeState>,
    Path(employee_id): Path<EmployeeId>,
    Form(form): Form<EmployeeFormData>,
) -> Response {
    let fields = match NewEmployee::new(
        &form.name,
        &form.designation,
        form.monthly_salary,
        form.join_date,
    ) {
        Ok(fields) => fields,
        Err(error) => {
            // Re-render the form with what the operator typed so nothing is lost.
            let submitted = Employee {
                id: employee_id,
                name: EmployeeName::new_unchecked(&form.name),
                designation: form.designation,
                monthly_salary: form.monthly_salary,
                join_date: form.join_date,
            };

            return edit_employee_form_view(&submitted, &format!("Error: {error}"))
                .into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_employee(employee_id, fields, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::EMPLOYEES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not update employee {employee_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod edit_employee_endpoint_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        employee::{EmployeeFormData, NewEmployee, create_employee, get_employee},
        endpoints, initialize_db,
        test_utils::{assert_form_error_message, must_get_form, parse_html_fragment},
    };

    use super::{EditEmployeeState, edit_employee_endpoint};

    fn get_test_state() -> EditEmployeeState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize_db(&connection).expect("Could not initialize test database");

        EditEmployeeState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn can_update_employee() {
        let state = get_test_state();
        let employee = {
            let connection = state.db_connection.lock().unwrap();
            create_employee(
                NewEmployee::new(
                    "Raj",
                    "Waiter",
                    Decimal::from_str("20000").unwrap(),
                    date!(2024 - 01 - 01),
                )
                .unwrap(),
                &connection,
            )
            .unwrap()
        };

        let form = EmployeeFormData {
            name: "Raj".to_string(),
            designation: "Head Waiter".to_string(),
            monthly_salary: Decimal::from_str("25000").unwrap(),
            join_date: date!(2024 - 01 - 01),
        };

        let response =
            edit_employee_endpoint(State(state.clone()), Path(employee.id), Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            endpoints::EMPLOYEES_VIEW
        );

        let connection = state.db_connection.lock().unwrap();
        let updated = get_employee(employee.id, &connection).unwrap();
        assert_eq!(updated.designation, "Head Waiter");
        assert_eq!(
            updated.monthly_salary,
            Decimal::from_str("25000").unwrap()
        );
    }

    #[tokio::test]
    async fn update_missing_employee_responds_with_not_found_alert() {
        let state = get_test_state();
        let form = EmployeeFormData {
            name: "Raj".to_string(),
            designation: "Waiter".to_string(),
            monthly_salary: Decimal::from_str("20000").unwrap(),
            join_date: date!(2024 - 01 - 01),
        };

        let response = edit_employee_endpoint(State(state), Path(42), Form(form)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_with_empty_name_re_renders_form() {
        let state = get_test_state();
        let employee = {
            let connection = state.db_connection.lock().unwrap();
            create_employee(
                NewEmployee::new(
                    "Raj",
                    "Waiter",
                    Decimal::from_str("20000").unwrap(),
                    date!(2024 - 01 - 01),
                )
                .unwrap(),
                &connection,
            )
            .unwrap()
        };

        let form = EmployeeFormData {
            name: " ".to_string(),
            designation: "Waiter".to_string(),
            monthly_salary: Decimal::from_str("20000").unwrap(),
            join_date: date!(2024 - 01 - 01),
        };

        let response =
            edit_employee_endpoint(State(state.clone()), Path(employee.id), Form(form)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: Employee name cannot be empty");

        // The stored employee must be unchanged.
        let connection = state.db_connection.lock().unwrap();
        let unchanged = get_employee(employee.id, &connection).unwrap();
        assert_eq!(unchanged.name.as_ref(), "Raj");
    }
}
