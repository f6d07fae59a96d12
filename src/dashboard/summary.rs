//! Ledger-wide totals for the dashboard.

use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::{
    Error,
    db::decimal_from_row,
    withdrawal::{RecentWithdrawal, get_recent_withdrawals, total_withdrawn},
};

/// How many withdrawals to show in the dashboard's recent activity table.
const RECENT_WITHDRAWALS_LIMIT: usize = 10;

/// The totals and recent activity shown on the dashboard.
///
/// All totals are computed from the current rows at query time, nothing is
/// cached or stored.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// How many employees are on the books.
    pub employee_count: usize,
    /// The sum of all employees' monthly salaries.
    pub total_salary: Decimal,
    /// The sum of all withdrawals across all employees.
    pub total_withdrawn: Decimal,
    /// `total_salary - total_withdrawn`, exactly.
    pub total_remaining: Decimal,
    /// The most recent withdrawals, newest first.
    pub recent_withdrawals: Vec<RecentWithdrawal>,
}

/// Compute the dashboard summary. Pure read, no side effects.
pub fn get_dashboard_summary(connection: &Connection) -> Result<DashboardSummary, Error> {
    let employee_count: i64 =
        connection.query_row("SELECT COUNT(id) FROM employee", [], |row| row.get(0))?;

    let salaries: Vec<Decimal> = connection
        .prepare("SELECT monthly_salary FROM employee")?
        .query_map([], |row| decimal_from_row(row, 0))?
        .collect::<Result<_, _>>()?;
    let total_salary: Decimal = salaries.iter().sum();

    let total_withdrawn = total_withdrawn(connection)?;

    let recent_withdrawals = get_recent_withdrawals(RECENT_WITHDRAWALS_LIMIT, connection)?;

    Ok(DashboardSummary {
        employee_count: employee_count as usize,
        total_salary,
        total_withdrawn,
        total_remaining: total_salary - total_withdrawn,
        recent_withdrawals,
    })
}
