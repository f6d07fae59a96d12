//! Defines the endpoint for creating a new employee.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    employee::{EmployeeFormData, NewEmployee, create_employee, create_page::new_employee_form_view},
    endpoints,
};

/// The state needed to create an employee.
#[derive(Debug, Clone)]
pub struct CreateEmployeeState {
    /// The database connection for managing employees.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateEmployeeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new employee, redirects to the employees
/// page on success.
///
/// Validation failures re-render the form with an inline error message.
pub async fn create_employee_endpoint(
    State(state): State<CreateEmployeeState>,
    Form(form): Form<EmployeeFormData>,
) -> Response {
    let new_employee = match NewEmployee::new(
        &form.name,
        &form.designation,
        form.monthly_salary,
        form.join_date,
    ) {
        Ok(new_employee) => new_employee,
        Err(error) => {
            return new_employee_form_view(&format!("Error: {error}")).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_employee(new_employee, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::EMPLOYEES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating an employee: {error}");

            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod create_employee_endpoint_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use axum::{Form, extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        employee::{EmployeeFormData, EmployeeName, get_employee},
        endpoints, initialize_db,
        test_utils::{
            assert_form_error_message, assert_hx_redirect, assert_valid_html, must_get_form,
            parse_html_fragment,
        },
    };

    use super::{CreateEmployeeState, create_employee_endpoint};

    fn get_test_state() -> CreateEmployeeState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize_db(&connection).expect("Could not initialize test database");

        CreateEmployeeState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn can_create_employee() {
        let state = get_test_state();
        let form = EmployeeFormData {
            name: "Raj".to_string(),
            designation: "Waiter".to_string(),
            monthly_salary: Decimal::from_str("20000").unwrap(),
            join_date: date!(2024 - 01 - 01),
        };

        let response = create_employee_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::EMPLOYEES_VIEW);

        // The first employee will have ID 1.
        let connection = state.db_connection.lock().unwrap();
        let employee = get_employee(1, &connection).expect("Employee was not created");
        assert_eq!(employee.name, EmployeeName::new_unchecked("Raj"));
        assert_eq!(employee.designation, "Waiter");
        assert_eq!(
            employee.monthly_salary,
            Decimal::from_str("20000").unwrap()
        );
        assert_eq!(employee.join_date, date!(2024 - 01 - 01));
    }

    #[tokio::test]
    async fn create_employee_fails_on_empty_name() {
        let state = get_test_state();
        let form = EmployeeFormData {
            name: "".to_string(),
            designation: "Cook".to_string(),
            monthly_salary: Decimal::from_str("20000").unwrap(),
            join_date: date!(2024 - 01 - 01),
        };

        let response = create_employee_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: Employee name cannot be empty");
    }

    #[tokio::test]
    async fn create_employee_fails_on_negative_salary() {
        let state = get_test_state();
        let form = EmployeeFormData {
            name: "Raj".to_string(),
            designation: "Waiter".to_string(),
            monthly_salary: Decimal::from_str("-500").unwrap(),
            join_date: date!(2024 - 01 - 01),
        };

        let response = create_employee_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(
            &form,
            "Error: -500 is a negative amount, monthly salary must be zero or more",
        );

        // Nothing must have been persisted.
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_employee(1, &connection), Err(crate::Error::NotFound));
    }
}
