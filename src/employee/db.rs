//! Database operations for employees.

use rusqlite::{Connection, Transaction, TransactionBehavior, params};

use crate::{
    Error,
    db::decimal_from_row,
    employee::{Employee, EmployeeId, EmployeeName, NewEmployee},
};

/// Initialize the employee table.
pub fn create_employee_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS employee (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            designation TEXT NOT NULL,
            monthly_salary TEXT NOT NULL,
            join_date TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Convert a row with the employee table's columns into an [Employee].
pub fn map_row_to_employee(row: &rusqlite::Row) -> Result<Employee, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let designation = row.get(2)?;
    let monthly_salary = decimal_from_row(row, 3)?;
    let join_date = row.get(4)?;

    Ok(Employee {
        id,
        name: EmployeeName::new_unchecked(&raw_name),
        designation,
        monthly_salary,
        join_date,
    })
}

/// Create an employee and return it with its generated ID.
pub fn create_employee(new_employee: NewEmployee, connection: &Connection) -> Result<Employee, Error> {
    connection.execute(
        "INSERT INTO employee (name, designation, monthly_salary, join_date) \
        VALUES (?1, ?2, ?3, ?4)",
        params![
            new_employee.name.as_ref(),
            new_employee.designation,
            new_employee.monthly_salary.to_string(),
            new_employee.join_date,
        ],
    )?;

    let id = connection.last_insert_rowid();

    Ok(Employee {
        id,
        name: new_employee.name,
        designation: new_employee.designation,
        monthly_salary: new_employee.monthly_salary,
        join_date: new_employee.join_date,
    })
}

/// Retrieve a single employee by ID.
pub fn get_employee(employee_id: EmployeeId, connection: &Connection) -> Result<Employee, Error> {
    connection
        .prepare(
            "SELECT id, name, designation, monthly_salary, join_date \
            FROM employee WHERE id = :id",
        )?
        .query_row(&[(":id", &employee_id)], map_row_to_employee)
        .map_err(|error| error.into())
}

/// Retrieve employees ordered alphabetically by name.
///
/// If `search` is given, only employees whose name or designation contains the
/// search text (case-insensitively) are returned.
pub fn get_employees(
    search: Option<&str>,
    connection: &Connection,
) -> Result<Vec<Employee>, Error> {
    match search {
        Some(search) if !search.trim().is_empty() => {
            let pattern = format!("%{}%", search.trim());

            connection
                .prepare(
                    "SELECT id, name, designation, monthly_salary, join_date \
                    FROM employee \
                    WHERE name LIKE :pattern OR designation LIKE :pattern \
                    ORDER BY name ASC",
                )?
                .query_map(&[(":pattern", &pattern)], map_row_to_employee)?
                .map(|maybe_employee| maybe_employee.map_err(|error| error.into()))
                .collect()
        }
        _ => connection
            .prepare(
                "SELECT id, name, designation, monthly_salary, join_date \
                FROM employee ORDER BY name ASC",
            )?
            .query_map([], map_row_to_employee)?
            .map(|maybe_employee| maybe_employee.map_err(|error| error.into()))
            .collect(),
    }
}

/// Update an employee's details.
///
/// Existing withdrawals are never touched: if the new salary drops below the
/// already-withdrawn total the employee's remaining balance goes negative and
/// further withdrawals are rejected, but the recorded history stands.
///
/// # Errors
///
/// Returns [Error::UpdateMissingEmployee] if the employee doesn't exist.
pub fn update_employee(
    employee_id: EmployeeId,
    fields: NewEmployee,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE employee \
        SET name = ?1, designation = ?2, monthly_salary = ?3, join_date = ?4 \
        WHERE id = ?5",
        params![
            fields.name.as_ref(),
            fields.designation,
            fields.monthly_salary.to_string(),
            fields.join_date,
            employee_id,
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingEmployee);
    }

    Ok(())
}

/// Delete an employee and all of its withdrawals.
///
/// Both deletions happen inside a single transaction: either the employee and
/// every one of its withdrawals are removed, or nothing is.
///
/// # Errors
///
/// Returns [Error::DeleteMissingEmployee] if the employee doesn't exist. The
/// transaction is rolled back and no withdrawals are deleted.
pub fn delete_employee(employee_id: EmployeeId, connection: &Connection) -> Result<(), Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    transaction.execute(
        "DELETE FROM withdrawal WHERE employee_id = ?1",
        [employee_id],
    )?;

    let rows_affected = transaction.execute("DELETE FROM employee WHERE id = ?1", [employee_id])?;

    if rows_affected == 0 {
        transaction.rollback()?;
        return Err(Error::DeleteMissingEmployee);
    }

    transaction.commit()?;

    Ok(())
}
