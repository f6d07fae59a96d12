//! Core withdrawal domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use time::{Date, OffsetDateTime, macros::format_description};

use crate::employee::EmployeeId;

/// Database identifier for a withdrawal.
pub type WithdrawalId = i64;

/// One payout taken against an employee's monthly salary.
///
/// Withdrawals are create-only: once recorded they are never edited or
/// deleted, except as part of deleting their employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Withdrawal {
    /// The ID for the withdrawal.
    pub id: WithdrawalId,
    /// The employee the money was paid out to.
    pub employee_id: EmployeeId,
    /// How much was paid out.
    pub amount: Decimal,
    /// The date the payout is recorded against.
    pub date: Date,
    /// An optional free-text note, e.g. "Eid advance".
    pub note: Option<String>,
    /// When the withdrawal was recorded, in UTC.
    ///
    /// Used to break ties between withdrawals recorded against the same date.
    pub created_at: OffsetDateTime,
}

/// A withdrawal waiting to be validated against an employee's balance and
/// written to the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWithdrawal {
    /// The employee the money is being paid out to.
    pub employee_id: EmployeeId,
    /// How much to pay out.
    pub amount: Decimal,
    /// The date the payout is recorded against.
    pub date: Date,
    /// An optional free-text note.
    pub note: Option<String>,
}

impl NewWithdrawal {
    /// Bundle up the details of a withdrawal.
    ///
    /// Blank notes are normalised to [None]. Balance validation happens when
    /// the withdrawal is recorded, not here, so the check and the insert see
    /// the same ledger state.
    pub fn new(
        employee_id: EmployeeId,
        amount: Decimal,
        date: Date,
        note: Option<String>,
    ) -> Self {
        let note = note
            .map(|note| note.trim().to_string())
            .filter(|note| !note.is_empty());

        Self {
            employee_id,
            amount,
            date,
            note,
        }
    }
}

/// Form data for recording a withdrawal.
#[derive(Debug, Serialize, Deserialize)]
pub struct WithdrawalFormData {
    /// The employee the money is being paid out to.
    pub employee_id: EmployeeId,
    /// How much to pay out.
    pub amount: Decimal,
    /// The date the payout is recorded against. Blank means "today" in the
    /// restaurant's local timezone.
    #[serde(default, deserialize_with = "empty_string_as_no_date")]
    pub date: Option<Date>,
    /// An optional free-text note.
    pub note: Option<String>,
}

/// Browsers submit `date=` for a blank date input, which would otherwise fail
/// to parse as a [Date].
fn empty_string_as_no_date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;

    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw_date) => Date::parse(raw_date, format_description!("[year]-[month]-[day]"))
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
