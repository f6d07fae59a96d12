//! Defines the endpoint for recording a withdrawal.

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
    employee::get_employee,
    endpoints,
    timezone::local_date_today,
    withdrawal::{
        NewWithdrawal, WithdrawalFormData, create_page::new_withdrawal_form_view,
        record_withdrawal, remaining_salary,
    },
};

/// The state needed to record a withdrawal.
#[derive(Debug, Clone)]
pub struct CreateWithdrawalState {
    /// The database connection holding the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Karachi".
    ///
    /// Used to default blank dates to the restaurant's "today".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateWithdrawalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for recording a withdrawal, redirects to the employees page
/// on success.
///
/// A withdrawal that would overdraw the employee's balance re-renders the form
/// with the remaining balance in the error message and persists nothing.
pub async fn create_withdrawal_endpoint(
    State(state): State<CreateWithdrawalState>,
    Form(form): Form<WithdrawalFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let date = form
        .date
        .unwrap_or_else(|| local_date_today(&state.local_timezone));
    let new_withdrawal = NewWithdrawal::new(form.employee_id, form.amount, date, form.note);
    let employee_id = new_withdrawal.employee_id;

    match record_withdrawal(new_withdrawal, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::EMPLOYEES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(
            error @ (Error::NonPositiveAmount(_) | Error::InsufficientBalance { .. }),
        ) => {
            // Re-render the form so the operator can correct the amount. The
            // error carries the remaining balance for the message.
            let (employee, remaining) = match (
                get_employee(employee_id, &connection),
                remaining_salary(employee_id, &connection),
            ) {
                (Ok(employee), Ok(remaining)) => (employee, remaining),
                (Err(lookup_error), _) | (_, Err(lookup_error)) => {
                    tracing::error!(
                        "could not reload employee {employee_id} after failed withdrawal: \
                        {lookup_error}"
                    );
                    return lookup_error.into_alert_response();
                }
            };

            new_withdrawal_form_view(&employee, remaining, &format!("Error: {error}"))
                .into_response()
        }
        Err(error @ Error::NotFound) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while recording a withdrawal: {error}");
            error.into_alert_response()
        }
    }
}
