//! The ledger rules for withdrawals: balance queries and the validated,
//! atomic check-then-insert for recording a payout.

use std::collections::HashMap;

use rusqlite::{Connection, Row, Transaction, TransactionBehavior, params};
use rust_decimal::Decimal;
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    db::decimal_from_row,
    employee::{EmployeeId, get_employee},
    withdrawal::{NewWithdrawal, Withdrawal},
};

/// Initialize the withdrawal table and indexes.
pub fn create_withdrawal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS withdrawal (
            id INTEGER PRIMARY KEY,
            employee_id INTEGER NOT NULL,
            amount TEXT NOT NULL,
            date TEXT NOT NULL,
            note TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY(employee_id) REFERENCES employee(id)
        );

        CREATE INDEX IF NOT EXISTS idx_withdrawal_employee_id ON withdrawal(employee_id);",
    )?;

    Ok(())
}

/// Convert a row with the withdrawal table's columns into a [Withdrawal].
pub fn map_row_to_withdrawal(row: &Row) -> Result<Withdrawal, rusqlite::Error> {
    let id = row.get(0)?;
    let employee_id = row.get(1)?;
    let amount = decimal_from_row(row, 2)?;
    let date = row.get(3)?;
    let note = row.get(4)?;
    let created_at = row.get(5)?;

    Ok(Withdrawal {
        id,
        employee_id,
        amount,
        date,
        note,
        created_at,
    })
}

/// Sum the amounts withdrawn by the employee so far.
///
/// Amounts are stored as decimal text and summed as [Decimal]s, so the total
/// is exact no matter how many withdrawals there are.
pub fn withdrawn_total(
    employee_id: EmployeeId,
    connection: &Connection,
) -> Result<Decimal, Error> {
    let amounts: Vec<Decimal> = connection
        .prepare("SELECT amount FROM withdrawal WHERE employee_id = :employee_id")?
        .query_map(&[(":employee_id", &employee_id)], |row| {
            decimal_from_row(row, 0)
        })?
        .collect::<Result<_, _>>()?;

    Ok(amounts.iter().sum())
}

/// The amount of this month's salary the employee has not yet withdrawn.
///
/// # Errors
///
/// Returns [Error::NotFound] if the employee does not exist.
pub fn remaining_salary(
    employee_id: EmployeeId,
    connection: &Connection,
) -> Result<Decimal, Error> {
    let employee = get_employee(employee_id, connection)?;
    let withdrawn = withdrawn_total(employee_id, connection)?;

    Ok(employee.monthly_salary - withdrawn)
}

/// Validate and record a withdrawal against an employee's salary.
///
/// The employee lookup, the balance check and the insert all run inside one
/// immediate transaction on the shared connection, so two withdrawals
/// submitted at nearly the same time can never both be validated against the
/// same stale balance.
///
/// # Errors
///
/// Returns:
/// - [Error::NotFound] if the employee does not exist,
/// - [Error::NonPositiveAmount] if the amount is zero or negative,
/// - [Error::InsufficientBalance] if the amount is more than the employee's
///   remaining balance. The error carries the remaining balance so the client
///   can show the operator how much can still be withdrawn.
///
/// On any error nothing is persisted.
pub fn record_withdrawal(
    new_withdrawal: NewWithdrawal,
    connection: &Connection,
) -> Result<Withdrawal, Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let employee = get_employee(new_withdrawal.employee_id, &transaction)?;

    if new_withdrawal.amount <= Decimal::ZERO {
        return Err(Error::NonPositiveAmount(new_withdrawal.amount));
    }

    let withdrawn = withdrawn_total(new_withdrawal.employee_id, &transaction)?;
    let remaining = employee.monthly_salary - withdrawn;

    if new_withdrawal.amount > remaining {
        return Err(Error::InsufficientBalance {
            requested: new_withdrawal.amount,
            remaining,
        });
    }

    let created_at = OffsetDateTime::now_utc();

    transaction.execute(
        "INSERT INTO withdrawal (employee_id, amount, date, note, created_at) \
        VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            new_withdrawal.employee_id,
            new_withdrawal.amount.to_string(),
            new_withdrawal.date,
            new_withdrawal.note,
            created_at,
        ],
    )?;

    let id = transaction.last_insert_rowid();

    transaction.commit()?;

    Ok(Withdrawal {
        id,
        employee_id: new_withdrawal.employee_id,
        amount: new_withdrawal.amount,
        date: new_withdrawal.date,
        note: new_withdrawal.note,
        created_at,
    })
}

/// Retrieve an employee's withdrawals, most recent first.
///
/// Withdrawals on the same date are ordered by creation order, newest first.
pub fn get_withdrawals_for_employee(
    employee_id: EmployeeId,
    connection: &Connection,
) -> Result<Vec<Withdrawal>, Error> {
    connection
        .prepare(
            "SELECT id, employee_id, amount, date, note, created_at \
            FROM withdrawal \
            WHERE employee_id = :employee_id \
            ORDER BY date DESC, id DESC",
        )?
        .query_map(&[(":employee_id", &employee_id)], map_row_to_withdrawal)?
        .map(|maybe_withdrawal| maybe_withdrawal.map_err(|error| error.into()))
        .collect()
}

/// A withdrawal joined with the employee it was paid out to, for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentWithdrawal {
    /// The withdrawal itself.
    pub withdrawal: Withdrawal,
    /// The name of the employee the money was paid out to.
    pub employee_name: String,
    /// The employee's role.
    pub designation: String,
}

/// Retrieve the `limit` most recent withdrawals across all employees.
///
/// Ordered by withdrawal date descending, ties broken by creation order
/// descending.
pub fn get_recent_withdrawals(
    limit: usize,
    connection: &Connection,
) -> Result<Vec<RecentWithdrawal>, Error> {
    connection
        .prepare(
            "SELECT w.id, w.employee_id, w.amount, w.date, w.note, w.created_at, \
                e.name, e.designation \
            FROM withdrawal w \
            INNER JOIN employee e ON e.id = w.employee_id \
            ORDER BY w.date DESC, w.id DESC \
            LIMIT :limit",
        )?
        .query_map(&[(":limit", &(limit as i64))], |row| {
            let withdrawal = map_row_to_withdrawal(row)?;
            let employee_name = row.get(6)?;
            let designation = row.get(7)?;

            Ok(RecentWithdrawal {
                withdrawal,
                employee_name,
                designation,
            })
        })?
        .map(|maybe_row| maybe_row.map_err(|error| error.into()))
        .collect()
}

/// Sum the withdrawn amounts per employee.
///
/// Employees with no withdrawals are absent from the map.
pub fn get_withdrawn_totals(
    connection: &Connection,
) -> Result<HashMap<EmployeeId, Decimal>, Error> {
    let mut totals = HashMap::new();

    let rows: Vec<(EmployeeId, Decimal)> = connection
        .prepare("SELECT employee_id, amount FROM withdrawal")?
        .query_map([], |row| {
            let employee_id = row.get(0)?;
            let amount = decimal_from_row(row, 1)?;

            Ok((employee_id, amount))
        })?
        .collect::<Result<_, _>>()?;

    for (employee_id, amount) in rows {
        *totals.entry(employee_id).or_insert(Decimal::ZERO) += amount;
    }

    Ok(totals)
}

/// Sum all withdrawal amounts across all employees.
pub fn total_withdrawn(connection: &Connection) -> Result<Decimal, Error> {
    let amounts: Vec<Decimal> = connection
        .prepare("SELECT amount FROM withdrawal")?
        .query_map([], |row| decimal_from_row(row, 0))?
        .collect::<Result<_, _>>()?;

    Ok(amounts.iter().sum())
}

/// Retrieve the date and amount of every withdrawal on or after `start`.
///
/// Used for the dashboard's per-month chart.
pub fn get_withdrawal_dates_and_amounts_since(
    start: Date,
    connection: &Connection,
) -> Result<Vec<(Date, Decimal)>, Error> {
    connection
        .prepare("SELECT date, amount FROM withdrawal WHERE date >= :start")?
        .query_map(&[(":start", &start)], |row| {
            let date = row.get(0)?;
            let amount = decimal_from_row(row, 1)?;

            Ok((date, amount))
        })?
        .map(|maybe_row| maybe_row.map_err(|error| error.into()))
        .collect()
}


#[cfg(test)]
mod ledger_query_tests {
    use std::str::FromStr;

    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        employee::{Employee, NewEmployee, create_employee},
        initialize_db,
        withdrawal::{
            NewWithdrawal, get_recent_withdrawals, get_withdrawal_dates_and_amounts_since,
            get_withdrawals_for_employee, get_withdrawn_totals, record_withdrawal,
            total_withdrawn,
        },
    };

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).expect("Could not initialize test database");
        connection
    }

    fn dec(raw: &str) -> Decimal {
        Decimal::from_str(raw).unwrap()
    }

    fn create_test_employee(name: &str, connection: &Connection) -> Employee {
        create_employee(
            NewEmployee::new(name, "Cook", dec("50000"), date!(2024 - 01 - 01)).unwrap(),
            connection,
        )
        .expect("Could not create test employee")
    }

    #[test]
    fn withdrawals_for_employee_are_ordered_most_recent_first() {
        let connection = get_test_db_connection();
        let employee = create_test_employee("Ahmed", &connection);

        let oldest = record_withdrawal(
            NewWithdrawal::new(employee.id, dec("100"), date!(2024 - 02 - 01), None),
            &connection,
        )
        .unwrap();
        let newest = record_withdrawal(
            NewWithdrawal::new(employee.id, dec("200"), date!(2024 - 02 - 03), None),
            &connection,
        )
        .unwrap();
        let middle = record_withdrawal(
            NewWithdrawal::new(employee.id, dec("300"), date!(2024 - 02 - 02), None),
            &connection,
        )
        .unwrap();

        let withdrawals = get_withdrawals_for_employee(employee.id, &connection).unwrap();

        assert_eq!(withdrawals, vec![newest, middle, oldest]);
    }

    #[test]
    fn same_date_ties_break_by_creation_order() {
        let connection = get_test_db_connection();
        let employee = create_test_employee("Ahmed", &connection);

        let first = record_withdrawal(
            NewWithdrawal::new(employee.id, dec("100"), date!(2024 - 02 - 01), None),
            &connection,
        )
        .unwrap();
        let second = record_withdrawal(
            NewWithdrawal::new(employee.id, dec("200"), date!(2024 - 02 - 01), None),
            &connection,
        )
        .unwrap();

        let withdrawals = get_withdrawals_for_employee(employee.id, &connection).unwrap();

        assert_eq!(withdrawals, vec![second, first]);
    }

    #[test]
    fn recent_withdrawals_are_limited_and_joined_with_employees() {
        let connection = get_test_db_connection();
        let ahmed = create_test_employee("Ahmed", &connection);
        let raj = create_test_employee("Raj", &connection);

        for day in 1..=12u8 {
            let employee_id = if day % 2 == 0 { ahmed.id } else { raj.id };
            record_withdrawal(
                NewWithdrawal::new(
                    employee_id,
                    dec("10"),
                    date!(2024 - 02 - 01).replace_day(day).unwrap(),
                    None,
                ),
                &connection,
            )
            .unwrap();
        }

        let recent = get_recent_withdrawals(10, &connection).unwrap();

        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].withdrawal.date, date!(2024 - 02 - 12));
        assert_eq!(recent[0].employee_name, "Ahmed");
        assert_eq!(recent[9].withdrawal.date, date!(2024 - 02 - 03));
    }

    #[test]
    fn withdrawn_totals_group_by_employee() {
        let connection = get_test_db_connection();
        let ahmed = create_test_employee("Ahmed", &connection);
        let raj = create_test_employee("Raj", &connection);

        record_withdrawal(
            NewWithdrawal::new(ahmed.id, dec("100.50"), date!(2024 - 02 - 01), None),
            &connection,
        )
        .unwrap();
        record_withdrawal(
            NewWithdrawal::new(ahmed.id, dec("200.25"), date!(2024 - 02 - 02), None),
            &connection,
        )
        .unwrap();
        record_withdrawal(
            NewWithdrawal::new(raj.id, dec("50"), date!(2024 - 02 - 03), None),
            &connection,
        )
        .unwrap();

        let totals = get_withdrawn_totals(&connection).unwrap();

        assert_eq!(totals[&ahmed.id], dec("300.75"));
        assert_eq!(totals[&raj.id], dec("50"));
        assert_eq!(total_withdrawn(&connection), Ok(dec("350.75")));
    }

    #[test]
    fn dates_and_amounts_respect_start_date() {
        let connection = get_test_db_connection();
        let employee = create_test_employee("Ahmed", &connection);

        record_withdrawal(
            NewWithdrawal::new(employee.id, dec("100"), date!(2023 - 12 - 31), None),
            &connection,
        )
        .unwrap();
        record_withdrawal(
            NewWithdrawal::new(employee.id, dec("200"), date!(2024 - 01 - 15), None),
            &connection,
        )
        .unwrap();

        let rows =
            get_withdrawal_dates_and_amounts_since(date!(2024 - 01 - 01), &connection).unwrap();

        assert_eq!(rows, vec![(date!(2024 - 01 - 15), dec("200"))]);
    }
}
