//! Database initialization and shared row-mapping helpers.

use std::str::FromStr;

use rusqlite::{Connection, Row, Transaction, TransactionBehavior, types::Type};
use rust_decimal::Decimal;

use crate::{
    Error, employee::create_employee_table, user::create_user_table,
    withdrawal::create_withdrawal_table,
};

/// Create the application's tables if they do not already exist.
///
/// The tables are created within a single transaction so that a partially
/// initialized schema is never left behind.
///
/// # Errors
/// Returns an error if any of the tables cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_employee_table(&transaction)?;
    create_withdrawal_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Read a [Decimal] stored as TEXT from `row` at `index`.
///
/// Amounts are stored as their exact decimal string representation rather than
/// REAL so that balances never accumulate floating point drift.
pub fn decimal_from_row(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let raw: String = row.get(index)?;

    Decimal::from_str(&raw)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error)))
}
