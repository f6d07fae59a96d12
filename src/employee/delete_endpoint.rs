//! Defines the endpoint for deleting an employee.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    employee::{EmployeeId, delete_employee},
};

/// The state needed to delete an employee.
#[derive(Debug, Clone)]
pub struct DeleteEmployeeState {
    /// The database connection for managing employees.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteEmployeeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an employee, responds with an alert.
///
/// Deleting the employee also deletes all of its withdrawals, atomically.
pub async fn delete_employee_endpoint(
    State(state): State<DeleteEmployeeState>,
    Path(employee_id): Path<EmployeeId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_employee(employee_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(()) => Alert::SuccessSimple {
            message: "Employee deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error @ Error::DeleteMissingEmployee) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete employee {employee_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_employee_endpoint_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        Error,
        employee::{NewEmployee, create_employee, get_employee},
        initialize_db,
        withdrawal::{NewWithdrawal, get_withdrawals_for_employee, record_withdrawal},
    };

    use super::{DeleteEmployeeState, delete_employee_endpoint};

    fn get_test_state() -> DeleteEmployeeState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize_db(&connection).expect("Could not initialize test database");

        DeleteEmployeeState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn deletes_employee_and_withdrawals() {
        let state = get_test_state();
        let employee = {
            let connection = state.db_connection.lock().unwrap();
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
            record_withdrawal(
                NewWithdrawal::new(
                    employee.id,
                    Decimal::from_str("5000").unwrap(),
                    date!(2024 - 02 - 01),
                    None,
                ),
                &connection,
            )
            .unwrap();
            employee
        };

        let response = delete_employee_endpoint(State(state.clone()), Path(employee.id)).await;

        assert_eq!(response.status(), StatusCode::OK);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_employee(employee.id, &connection), Err(Error::NotFound));
        assert_eq!(
            get_withdrawals_for_employee(employee.id, &connection),
            Ok(vec![])
        );
    }

    #[tokio::test]
    async fn delete_missing_employee_responds_with_not_found_alert() {
        let state = get_test_state();

        let response = delete_employee_endpoint(State(state), Path(42)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
