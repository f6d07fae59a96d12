//! Flat row projections of the ledger for tabular export.
//!
//! These functions only read stored state. The row structs fix the column
//! content; the CSV formatting itself is left to the `csv` crate.

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    Error,
    employee::get_employees,
    withdrawal::{get_withdrawn_totals, map_row_to_withdrawal},
};

/// The column headers for [EmployeeRow] exports.
pub const EMPLOYEE_EXPORT_HEADER: [&str; 6] = [
    "Name",
    "Designation",
    "Join Date",
    "Monthly Salary",
    "Withdrawn",
    "Remaining",
];

/// The column headers for [WithdrawalRow] exports.
pub const WITHDRAWAL_EXPORT_HEADER: [&str; 5] =
    ["Employee", "Designation", "Date", "Amount", "Note"];

/// One employee with their balances, as exported.
///
/// Field order must match [EMPLOYEE_EXPORT_HEADER].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeRow {
    /// The employee's name.
    pub name: String,
    /// The employee's role.
    pub designation: String,
    /// The date the employee joined, as YYYY-MM-DD.
    pub join_date: String,
    /// The employee's monthly salary.
    pub monthly_salary: Decimal,
    /// The total the employee has withdrawn.
    pub withdrawn: Decimal,
    /// How much of the monthly salary remains.
    pub remaining: Decimal,
}

/// One withdrawal with its employee, as exported.
///
/// Field order must match [WITHDRAWAL_EXPORT_HEADER].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithdrawalRow {
    /// The name of the employee the money was paid out to.
    pub employee: String,
    /// The employee's role.
    pub designation: String,
    /// The withdrawal date, as YYYY-MM-DD.
    pub date: String,
    /// How much was paid out.
    pub amount: Decimal,
    /// The withdrawal's note, blank if there was none.
    pub note: String,
}

/// Project the ledger as one row per employee, ordered by name.
pub fn export_employee_rows(connection: &Connection) -> Result<Vec<EmployeeRow>, Error> {
    let employees = get_employees(None, connection)?;
    let withdrawn_totals = get_withdrawn_totals(connection)?;

    Ok(employees
        .into_iter()
        .map(|employee| {
            let withdrawn = withdrawn_totals
                .get(&employee.id)
                .copied()
                .unwrap_or(Decimal::ZERO);

            EmployeeRow {
                name: employee.name.to_string(),
                designation: employee.designation,
                join_date: employee.join_date.to_string(),
                monthly_salary: employee.monthly_salary,
                withdrawn,
                remaining: employee.monthly_salary - withdrawn,
            }
        })
        .collect())
}

/// Project the ledger as one row per withdrawal, most recent first.
pub fn export_withdrawal_rows(connection: &Connection) -> Result<Vec<WithdrawalRow>, Error> {
    connection
        .prepare(
            "SELECT w.id, w.employee_id, w.amount, w.date, w.note, w.created_at, \
                e.name, e.designation \
            FROM withdrawal w \
            INNER JOIN employee e ON e.id = w.employee_id \
            ORDER BY w.date DESC, w.id DESC",
        )?
        .query_map([], |row| {
            let withdrawal = map_row_to_withdrawal(row)?;
            let employee: String = row.get(6)?;
            let designation: String = row.get(7)?;

            Ok(WithdrawalRow {
                employee,
                designation,
                date: withdrawal.date.to_string(),
                amount: withdrawal.amount,
                note: withdrawal.note.unwrap_or_default(),
            })
        })?
        .map(|maybe_row| maybe_row.map_err(|error| error.into()))
        .collect()
}

#[cfg(test)]
mod export_rows_tests {
    use std::str::FromStr;

    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        employee::{NewEmployee, create_employee},
        initialize_db,
        withdrawal::{NewWithdrawal, record_withdrawal},
    };

    use super::{export_employee_rows, export_withdrawal_rows};

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).expect("Could not initialize test database");
        connection
    }

    fn dec(raw: &str) -> Decimal {
        Decimal::from_str(raw).unwrap()
    }

    #[test]
    fn employee_rows_contain_balances() {
        let connection = get_test_db_connection();
        let employee = create_employee(
            NewEmployee::new("Ahmed", "Cook", dec("30000"), date!(2024 - 01 - 01)).unwrap(),
            &connection,
        )
        .unwrap();
        record_withdrawal(
            NewWithdrawal::new(employee.id, dec("10000"), date!(2024 - 02 - 01), None),
            &connection,
        )
        .unwrap();

        let rows = export_employee_rows(&connection).unwrap();

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.name, "Ahmed");
        assert_eq!(row.designation, "Cook");
        assert_eq!(row.join_date, "2024-01-01");
        assert_eq!(row.monthly_salary, dec("30000"));
        assert_eq!(row.withdrawn, dec("10000"));
        assert_eq!(row.remaining, dec("20000"));
    }

    #[test]
    fn employee_rows_for_employee_with_no_withdrawals() {
        let connection = get_test_db_connection();
        create_employee(
            NewEmployee::new("Raj", "Waiter", dec("20000"), date!(2024 - 01 - 01)).unwrap(),
            &connection,
        )
        .unwrap();

        let rows = export_employee_rows(&connection).unwrap();

        assert_eq!(rows[0].withdrawn, Decimal::ZERO);
        assert_eq!(rows[0].remaining, dec("20000"));
    }

    #[test]
    fn withdrawal_rows_are_most_recent_first() {
        let connection = get_test_db_connection();
        let employee = create_employee(
            NewEmployee::new("Ahmed", "Cook", dec("30000"), date!(2024 - 01 - 01)).unwrap(),
            &connection,
        )
        .unwrap();
        record_withdrawal(
            NewWithdrawal::new(
                employee.id,
                dec("100"),
                date!(2024 - 02 - 01),
                Some("first".to_string()),
            ),
            &connection,
        )
        .unwrap();
        record_withdrawal(
            NewWithdrawal::new(employee.id, dec("200"), date!(2024 - 02 - 05), None),
            &connection,
        )
        .unwrap();

        let rows = export_withdrawal_rows(&connection).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "2024-02-05");
        assert_eq!(rows[0].note, "");
        assert_eq!(rows[1].date, "2024-02-01");
        assert_eq!(rows[1].note, "first");
    }
}
