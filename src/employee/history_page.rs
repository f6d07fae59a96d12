//! Displays one employee's details and their full withdrawal history.

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
    endpoints::{self, format_endpoint},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency,
    },
    navigation::NavBar,
    withdrawal::{Withdrawal, get_withdrawals_for_employee, withdrawn_total},
};

/// The state needed for the employee history page.
#[derive(Debug, Clone)]
pub struct EmployeeHistoryState {
    /// The database connection for reading the employee and their withdrawals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EmployeeHistoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render an employee's withdrawal history with their balance summary.
pub async fn get_employee_history_page(
    State(state): State<EmployeeHistoryState>,
    Path(employee_id): Path<EmployeeId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let employee = get_employee(employee_id, &connection)
        .inspect_err(|error| tracing::error!("could not get employee {employee_id}: {error}"))?;

    let withdrawals = get_withdrawals_for_employee(employee_id, &connection)
        .inspect_err(|error| tracing::error!("could not get withdrawals: {error}"))?;

    let withdrawn = withdrawn_total(employee_id, &connection)
        .inspect_err(|error| tracing::error!("could not sum withdrawals: {error}"))?;

    Ok(history_view(&employee, withdrawn, &withdrawals).into_response())
}

fn summary_card(label: &str, amount: Decimal) -> Markup {
    html!(
        div class="bg-white dark:bg-gray-800 border border-gray-200
            dark:border-gray-700 rounded-lg p-4 shadow-md"
        {
            div class="text-sm text-gray-600 dark:text-gray-400" { (label) }
            div class="text-2xl font-bold" { (format_currency(amount)) }
        }
    )
}

fn history_view(employee: &Employee, withdrawn: Decimal, withdrawals: &[Withdrawal]) -> Markup {
    let nav_bar = NavBar::new(endpoints::EMPLOYEES_VIEW).into_html();
    let remaining = employee.monthly_salary - withdrawn;
    let withdraw_url = format_endpoint(endpoints::NEW_WITHDRAWAL_VIEW, employee.id);

    let table_row = |withdrawal: &Withdrawal| {
        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    time datetime=(withdrawal.date) { (withdrawal.date) }
                }

                td class="px-6 py-4 text-right" { (format_currency(withdrawal.amount)) }

                td class=(TABLE_CELL_STYLE)
                {
                    @match &withdrawal.note {
                        Some(note) => { (note) }
                        None => { "-" }
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-4xl lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { (employee.name) }
                        p class="text-gray-600 dark:text-gray-400"
                        {
                            (employee.designation)
                            " · joined "
                            time datetime=(employee.join_date) { (employee.join_date) }
                        }
                    }

                    a href=(withdraw_url) class=(LINK_STYLE) { "Record Withdrawal" }
                }

                div class="grid grid-cols-1 sm:grid-cols-3 gap-4"
                {
                    (summary_card("Monthly Salary", employee.monthly_salary))
                    (summary_card("Withdrawn", withdrawn))
                    (summary_card("Remaining", remaining))
                }

                section class="w-full overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class="px-6 py-3 text-right" { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Note" }
                            }
                        }

                        tbody
                        {
                            @for withdrawal in withdrawals {
                                (table_row(withdrawal))
                            }

                            @if withdrawals.is_empty() {
                                tr
                                {
                                    td
                                        colspan="3"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No withdrawals recorded yet."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Salary History", &[], &content)
}
