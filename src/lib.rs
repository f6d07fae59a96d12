//! Wagekeeper is a web app for tracking restaurant staff salaries and the
//! advance withdrawals staff take against them.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use rust_decimal::Decimal;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod change_password;
mod dashboard;
mod db;
mod employee;
mod endpoints;
mod export;
mod html;
mod internal_server_error;
mod log_in;
mod log_out;
mod navigation;
mod not_found;
mod password;
mod routing;
#[cfg(test)]
mod test_utils;
mod timezone;
pub mod user;
mod withdrawal;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;

use crate::{
    alert::{Alert, render_alert},
    html::format_currency,
    internal_server_error::{InternalServerErrorPage, render_internal_server_error},
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid username or password.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Either the user ID or expiry cookie is missing from the cookie jar in
    /// the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// There was an error parsing the date in the cookie or creating the new
    /// expiry date time.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not format expiry cookie date-time string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An empty string was used for an employee's name.
    #[error("Employee name cannot be empty")]
    EmptyEmployeeName,

    /// A negative amount was used for an employee's monthly salary.
    #[error("{0} is a negative amount, monthly salary must be zero or more")]
    NegativeSalary(Decimal),

    /// A zero or negative amount was used for a withdrawal.
    #[error("{0} is not a valid withdrawal amount, amounts must be more than zero")]
    NonPositiveAmount(Decimal),

    /// A withdrawal would take an employee's balance below zero.
    ///
    /// Carries the remaining balance at the time of the attempt so the client
    /// can show the operator how much can still be withdrawn.
    #[error("cannot withdraw {requested}, only {remaining} of this month's salary remains")]
    InsufficientBalance {
        /// The amount the operator asked to withdraw.
        requested: Decimal,
        /// The employee's remaining balance when the withdrawal was attempted.
        remaining: Decimal,
    },

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while writing the CSV export.
    #[error("could not write CSV export: {0}")]
    CsvError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update an employee that does not exist
    #[error("tried to update an employee that is not in the database")]
    UpdateMissingEmployee,

    /// Tried to delete an employee that does not exist
    #[error("tried to delete an employee that is not in the database")]
    DeleteMissingEmployee,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => {
                render_internal_server_error(InternalServerErrorPage {
                    description: "Invalid Timezone Settings",
                    fix: &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                    ),
                })
            }
            Error::DatabaseLockError => render_internal_server_error(Default::default()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => render_alert(
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::error(
                    "Invalid Timezone Settings",
                    &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                    ),
                ),
            ),
            Error::EmptyEmployeeName => render_alert(
                StatusCode::BAD_REQUEST,
                Alert::error("Invalid employee name", "The employee name cannot be empty."),
            ),
            Error::NegativeSalary(amount) => render_alert(
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid monthly salary",
                    &format!("{amount} is negative. Monthly salary must be zero or more."),
                ),
            ),
            Error::NonPositiveAmount(amount) => render_alert(
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid withdrawal amount",
                    &format!("{amount} is not a valid amount. Withdrawals must be more than zero."),
                ),
            ),
            Error::InsufficientBalance {
                requested,
                remaining,
            } => render_alert(
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Withdrawal exceeds remaining salary",
                    &format!(
                        "Cannot withdraw {}, only {} of this month's salary remains.",
                        format_currency(requested),
                        format_currency(remaining)
                    ),
                ),
            ),
            Error::UpdateMissingEmployee => render_alert(
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Could not update employee",
                    "The employee could not be found.",
                ),
            ),
            Error::DeleteMissingEmployee => render_alert(
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Could not delete employee",
                    "The employee could not be found. \
                    Try refreshing the page to see if the employee has already been deleted.",
                ),
            ),
            Error::NotFound => render_alert(
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Not found",
                    "The requested record could not be found. Try refreshing the page.",
                ),
            ),
            _ => render_alert(
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::error(
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                ),
            ),
        }
    }
}
