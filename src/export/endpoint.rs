//! The endpoint for downloading the ledger as a CSV file.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, macros::format_description};

use crate::{
    AppState, Error,
    export::rows::{
        EMPLOYEE_EXPORT_HEADER, WITHDRAWAL_EXPORT_HEADER, export_employee_rows,
        export_withdrawal_rows,
    },
    timezone::get_local_offset,
};

/// Whether to export one row per employee or one row per withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportMode {
    /// One row per employee with their balances.
    #[default]
    Employees,
    /// One row per withdrawal with its employee.
    Withdrawals,
}

/// The query parameters accepted by the export endpoint.
#[derive(Deserialize)]
pub struct ExportQuery {
    /// The export mode, defaults to one row per employee.
    #[serde(default)]
    pub mode: ExportMode,
}

/// The state needed to export the ledger.
#[derive(Debug, Clone)]
pub struct ExportState {
    /// The database connection holding the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, for the dated filename.
    pub local_timezone: String,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler that responds with the ledger as a downloadable CSV file.
pub async fn get_export_csv(
    State(state): State<ExportState>,
    Query(query): Query<ExportQuery>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let csv_text = match query.mode {
        ExportMode::Employees => export_employee_rows(&connection)
            .and_then(|rows| write_csv(&EMPLOYEE_EXPORT_HEADER, &rows)),
        ExportMode::Withdrawals => export_withdrawal_rows(&connection)
            .and_then(|rows| write_csv(&WITHDRAWAL_EXPORT_HEADER, &rows)),
    };

    let csv_text = match csv_text {
        Ok(csv_text) => csv_text,
        Err(error) => {
            tracing::error!("Could not export ledger as CSV: {error}");
            return error.into_response();
        }
    };

    let filename = export_filename(&state.local_timezone, query.mode);

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv_text,
    )
        .into_response()
}

/// The header row is written explicitly so that an empty ledger still exports
/// the columns, which serde-driven headers would not.
fn write_csv<Row: Serialize>(header: &[&str], rows: &[Row]) -> Result<String, Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer
        .write_record(header)
        .map_err(|error| Error::CsvError(error.to_string()))?;

    for row in rows {
        writer
            .serialize(row)
            .map_err(|error| Error::CsvError(error.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    Ok(String::from_utf8_lossy(&bytes).to_string())
}

fn export_filename(local_timezone: &str, mode: ExportMode) -> String {
    let offset = get_local_offset(local_timezone).unwrap_or(time::UtcOffset::UTC);
    let today = OffsetDateTime::now_utc().to_offset(offset).date();
    let date_stamp = today
        .format(format_description!("[year][month][day]"))
        .unwrap_or_else(|_| today.to_string());

    let subject = match mode {
        ExportMode::Employees => "salary_report",
        ExportMode::Withdrawals => "withdrawal_report",
    };

    format!("wagekeeper_{subject}_{date_stamp}.csv")
}

#[cfg(test)]
mod export_endpoint_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use axum::{
        extract::{Query, State},
        http::{StatusCode, header},
    };
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        employee::{NewEmployee, create_employee},
        initialize_db,
        withdrawal::{NewWithdrawal, record_withdrawal},
    };

    use super::{ExportMode, ExportQuery, ExportState, get_export_csv};

    fn get_test_state() -> ExportState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize_db(&connection).expect("Could not initialize test database");

        ExportState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn populate_ledger(state: &ExportState) {
        let connection = state.db_connection.lock().unwrap();
        let employee = create_employee(
            NewEmployee::new(
                "Ahmed",
                "Cook",
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
                Some("advance".to_string()),
            ),
            &connection,
        )
        .unwrap();
    }

    async fn get_body_text(response: axum::response::Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8_lossy(&body).to_string()
    }

    #[tokio::test]
    async fn employee_export_has_expected_columns() {
        let state = get_test_state();
        populate_ledger(&state);

        let response = get_export_csv(
            State(state),
            Query(ExportQuery {
                mode: ExportMode::Employees,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/csv; charset=utf-8"
        );
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_owned();
        assert!(disposition.starts_with("attachment; filename=\"wagekeeper_salary_report_"));

        let body = get_body_text(response).await;
        let mut lines = body.lines();
        assert_eq!(
            lines.next(),
            Some("Name,Designation,Join Date,Monthly Salary,Withdrawn,Remaining")
        );
        assert_eq!(lines.next(), Some("Ahmed,Cook,2024-01-01,30000,10000,20000"));
    }

    #[tokio::test]
    async fn withdrawal_export_has_expected_columns() {
        let state = get_test_state();
        populate_ledger(&state);

        let response = get_export_csv(
            State(state),
            Query(ExportQuery {
                mode: ExportMode::Withdrawals,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);

        let body = get_body_text(response).await;
        let mut lines = body.lines();
        assert_eq!(lines.next(), Some("Employee,Designation,Date,Amount,Note"));
        assert_eq!(lines.next(), Some("Ahmed,Cook,2024-02-01,10000,advance"));
    }

    #[tokio::test]
    async fn empty_ledger_exports_headers_only() {
        let state = get_test_state();

        let response = get_export_csv(
            State(state),
            Query(ExportQuery {
                mode: ExportMode::Employees,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);

        let body = get_body_text(response).await;
        assert_eq!(
            body.trim(),
            "Name,Designation,Join Date,Monthly Salary,Withdrawn,Remaining"
        );
    }
}
