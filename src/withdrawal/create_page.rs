//! The page for recording a withdrawal against an employee's salary.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::{
    AppState, Error,
    employee::{Employee, EmployeeId, get_employee},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        format_currency,
    },
    navigation::NavBar,
    withdrawal::remaining_salary,
};

/// The state needed for the new withdrawal page.
#[derive(Debug, Clone)]
pub struct CreateWithdrawalPageState {
    /// The database connection for reading the employee's balance.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateWithdrawalPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the withdrawal form for an employee, showing their remaining balance.
pub async fn get_create_withdrawal_page(
    State(state): State<CreateWithdrawalPageState>,
    Path(employee_id): Path<EmployeeId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let employee = get_employee(employee_id, &connection)
        .inspect_err(|error| tracing::error!("could not get employee {employee_id}: {error}"))?;

    let remaining = remaining_salary(employee_id, &connection)
        .inspect_err(|error| tracing::error!("could not compute remaining salary: {error}"))?;

    Ok(new_withdrawal_view(&employee, remaining).into_response())
}

fn new_withdrawal_view(employee: &Employee, remaining: Decimal) -> Markup {
    let nav_bar = NavBar::new(endpoints::EMPLOYEES_VIEW).into_html();
    let form = new_withdrawal_form_view(employee, remaining, "");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold my-4" { "Record Withdrawal" }
            p class="mb-4 text-gray-600 dark:text-gray-400"
            {
                (employee.name)
                " has "
                span class="font-semibold" { (format_currency(remaining)) }
                " of this month's salary remaining."
            }
            (form)
        }
    };

    base("Record Withdrawal", &[], &content)
}

/// The withdrawal form, with an optional error message from a previous
/// submission.
pub(super) fn new_withdrawal_form_view(
    employee: &Employee,
    remaining: Decimal,
    error_message: &str,
) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_WITHDRAWAL)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            input type="hidden" name="employee_id" value=(employee.id);

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                input
                    id="amount"
                    type="number"
                    name="amount"
                    min="0.01"
                    step="0.01"
                    max=(remaining)
                    placeholder="5000"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date (defaults to today)" }

                input
                    id="date"
                    type="date"
                    name="date"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="note" class=(FORM_LABEL_STYLE) { "Note (optional)" }

                input
                    id="note"
                    type="text"
                    name="note"
                    placeholder="e.g. Eid advance"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Record Withdrawal" }
        }
    }
}
