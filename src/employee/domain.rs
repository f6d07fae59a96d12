//! Core employee domain types.

use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::Error;

/// Database identifier for an employee.
pub type EmployeeId = i64;

/// A validated, non-empty employee name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct EmployeeName(String);

impl EmployeeName {
    /// Create an employee name.
    ///
    /// Leading and trailing whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyEmployeeName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyEmployeeName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create an employee name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for EmployeeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for EmployeeName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmployeeName::new(s)
    }
}

impl Display for EmployeeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A staff member and their salary terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// The ID for the employee.
    pub id: EmployeeId,
    /// The employee's name.
    pub name: EmployeeName,
    /// The employee's role, e.g. "Head Chef".
    pub designation: String,
    /// How much the employee earns each month.
    pub monthly_salary: Decimal,
    /// The date the employee joined the restaurant.
    pub join_date: Date,
}

/// A validated employee waiting to be written to the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    /// The employee's name.
    pub name: EmployeeName,
    /// The employee's role.
    pub designation: String,
    /// How much the employee earns each month.
    pub monthly_salary: Decimal,
    /// The date the employee joined the restaurant.
    pub join_date: Date,
}

impl NewEmployee {
    /// Validate the fields for a new or updated employee.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyEmployeeName] if `name` is empty, or
    /// [Error::NegativeSalary] if `monthly_salary` is below zero.
    pub fn new(
        name: &str,
        designation: &str,
        monthly_salary: Decimal,
        join_date: Date,
    ) -> Result<Self, Error> {
        let name = EmployeeName::new(name)?;

        if monthly_salary < Decimal::ZERO {
            return Err(Error::NegativeSalary(monthly_salary));
        }

        Ok(Self {
            name,
            designation: designation.trim().to_string(),
            monthly_salary,
            join_date,
        })
    }
}

/// Form data for employee creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct EmployeeFormData {
    /// The employee's name.
    pub name: String,
    /// The employee's role.
    pub designation: String,
    /// How much the employee earns each month.
    pub monthly_salary: Decimal,
    /// The date the employee joined the restaurant.
    pub join_date: Date,
}
