//! Displays employees, their balances, and per-employee actions.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    AppState, Error,
    employee::{Employee, get_employees},
    endpoints::{self, format_endpoint},
    html::{
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
    withdrawal::get_withdrawn_totals,
};

/// The state needed for the employees listing page.
#[derive(Debug, Clone)]
pub struct EmployeesPageState {
    /// The database connection for reading employees and balances.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EmployeesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the employees page.
#[derive(Deserialize)]
pub struct EmployeesQuery {
    /// Text to filter employees by name or designation.
    pub search: Option<String>,
}

/// An employee with its balances and action URLs, ready for rendering.
#[derive(Debug, Clone)]
struct EmployeeTableRow {
    employee: Employee,
    withdrawn: Decimal,
    remaining: Decimal,
    withdraw_url: String,
    history_url: String,
    edit_url: String,
    delete_url: String,
}

/// Render the employees listing page with withdrawn/remaining balances.
pub async fn get_employees_page(
    State(state): State<EmployeesPageState>,
    Query(query): Query<EmployeesQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let search = query.search.as_deref();
    let employees = get_employees(search, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve employees: {error}"))?;

    let withdrawn_totals = get_withdrawn_totals(&connection)
        .inspect_err(|error| tracing::error!("Could not sum withdrawals: {error}"))?;

    let rows = build_table_rows(employees, &withdrawn_totals);

    Ok(employees_view(&rows, search.unwrap_or_default()).into_response())
}

fn build_table_rows(
    employees: Vec<Employee>,
    withdrawn_totals: &HashMap<i64, Decimal>,
) -> Vec<EmployeeTableRow> {
    employees
        .into_iter()
        .map(|employee| {
            let withdrawn = withdrawn_totals
                .get(&employee.id)
                .copied()
                .unwrap_or(Decimal::ZERO);

            EmployeeTableRow {
                withdrawn,
                remaining: employee.monthly_salary - withdrawn,
                withdraw_url: format_endpoint(endpoints::NEW_WITHDRAWAL_VIEW, employee.id),
                history_url: format_endpoint(endpoints::EMPLOYEE_HISTORY_VIEW, employee.id),
                edit_url: format_endpoint(endpoints::EDIT_EMPLOYEE_VIEW, employee.id),
                delete_url: format_endpoint(endpoints::DELETE_EMPLOYEE, employee.id),
                employee,
            }
        })
        .collect()
}

fn employees_view(rows: &[EmployeeTableRow], search: &str) -> Markup {
    let new_employee_url = endpoints::NEW_EMPLOYEE_VIEW;
    let nav_bar = NavBar::new(endpoints::EMPLOYEES_VIEW).into_html();

    let table_row = |row: &EmployeeTableRow| {
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? This will also delete their withdrawal \
            history and cannot be undone.",
            row.employee.name
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    a href=(row.history_url) class=(LINK_STYLE) { (row.employee.name) }
                }

                td class=(TABLE_CELL_STYLE) { (row.employee.designation) }

                td class=(TABLE_CELL_STYLE)
                {
                    time datetime=(row.employee.join_date) { (row.employee.join_date) }
                }

                td class="px-6 py-4 text-right" { (format_currency(row.employee.monthly_salary)) }

                td class="px-6 py-4 text-right" { (format_currency(row.withdrawn)) }

                td class="px-6 py-4 text-right font-medium" { (format_currency(row.remaining)) }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        a href=(row.withdraw_url) class=(LINK_STYLE) { "Withdraw" }

                        (edit_delete_action_links(
                            &row.edit_url,
                            &row.delete_url,
                            &confirm_message,
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-6xl lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Employees" }

                    form method="get" action=(endpoints::EMPLOYEES_VIEW) class="flex gap-2"
                    {
                        input
                            type="search"
                            name="search"
                            placeholder="Search name or designation"
                            value=(search)
                            class=(FORM_TEXT_INPUT_STYLE);

                        button
                            type="submit"
                            class="px-4 py-2 bg-blue-500 dark:bg-blue-600 text-white rounded"
                        {
                            "Search"
                        }
                    }

                    a href=(new_employee_url) class=(LINK_STYLE)
                    {
                        "Add Employee"
                    }
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
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Designation" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Join Date" }
                                th scope="col" class="px-6 py-3 text-right" { "Monthly Salary" }
                                th scope="col" class="px-6 py-3 text-right" { "Withdrawn" }
                                th scope="col" class="px-6 py-3 text-right" { "Remaining" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in rows {
                                (table_row(row))
                            }

                            @if rows.is_empty() {
                                tr
                                {
                                    td
                                        colspan="7"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        @if search.is_empty() {
                                            "No employees yet. Add an employee "
                                            a href=(new_employee_url) class=(LINK_STYLE)
                                            {
                                                "here"
                                            }
                                            "."
                                        } @else {
                                            "No employees match '" (search) "'."
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Employees", &[], &content)
}

#[cfg(test)]
mod employees_page_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use axum::extract::{Query, State};
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        employee::{NewEmployee, create_employee},
        initialize_db,
        test_utils::{assert_valid_html, parse_html_document},
        withdrawal::{NewWithdrawal, record_withdrawal},
    };

    use super::{EmployeesPageState, EmployeesQuery, get_employees_page};

    fn get_test_state() -> EmployeesPageState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize_db(&connection).expect("Could not initialize test database");

        EmployeesPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn shows_employee_balances() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            let employee = create_employee(
                NewEmployee::new(
                    "Raj",
                    "Waiter",
                    Decimal::from_str("30000").unwrap(),
                    date!(2024 - 01 - 01),
                )
                .unwrap(),
                &connection,
            )
            .unwrap();
            record_withdrawal(
                NewWithdrawal::new(
                    employee.id,
                    Decimal::from_str("10000").unwrap(),
                    date!(2024 - 02 - 01),
                    None,
                ),
                &connection,
            )
            .unwrap();
        }

        let response = get_employees_page(State(state), Query(EmployeesQuery { search: None }))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let text = html.html();
        assert!(text.contains("Raj"));
        assert!(text.contains("$30,000.00"), "salary missing from {text}");
        assert!(text.contains("$10,000.00"), "withdrawn missing from {text}");
        assert!(text.contains("$20,000.00"), "remaining missing from {text}");
    }

    #[tokio::test]
    async fn search_filters_rows() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            for (name, designation) in [("Ahmed", "Cook"), ("Raj", "Waiter")] {
                create_employee(
                    NewEmployee::new(
                        name,
                        designation,
                        Decimal::from_str("20000").unwrap(),
                        date!(2024 - 01 - 01),
                    )
                    .unwrap(),
                    &connection,
                )
                .unwrap();
            }
        }

        let response = get_employees_page(
            State(state),
            Query(EmployeesQuery {
                search: Some("cook".to_string()),
            }),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        let text = html.html();
        assert!(text.contains("Ahmed"));
        assert!(!text.contains("Raj"), "expected Raj to be filtered out");
    }

    #[tokio::test]
    async fn empty_ledger_shows_call_to_action() {
        let state = get_test_state();

        let response = get_employees_page(State(state), Query(EmployeesQuery { search: None }))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert!(html.html().contains("No employees yet"));
    }
}
