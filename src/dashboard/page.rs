//! The dashboard page: ledger totals, recent withdrawals, and the per-month
//! withdrawals chart.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    AppState, Error,
    dashboard::{
        charts::{DashboardChart, chart_script, chart_view, monthly_withdrawals_chart},
        summary::{DashboardSummary, get_dashboard_summary},
    },
    endpoints,
    html::{
        HeadElement, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
    timezone::get_local_offset,
    withdrawal::{RecentWithdrawal, get_withdrawal_dates_and_amounts_since},
};

/// Number of days of withdrawals to include in the chart.
const YEARLY_PERIOD_DAYS: i64 = 365;

/// Notes longer than this are truncated in the recent activity table.
const NOTE_DISPLAY_GRAPHEMES: usize = 30;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Karachi".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display a page with an overview of the ledger.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let summary = get_dashboard_summary(&connection)
        .inspect_err(|error| tracing::error!("could not build dashboard summary: {error}"))?;

    let local_offset = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let today = OffsetDateTime::now_utc().to_offset(local_offset).date();
    let chart_start = today - Duration::days(YEARLY_PERIOD_DAYS);
    let chart_rows = get_withdrawal_dates_and_amounts_since(chart_start, &connection)
        .inspect_err(|error| {
            tracing::error!("Could not get withdrawals for the last year: {error}")
        })?;

    let chart = if chart_rows.is_empty() {
        None
    } else {
        Some(DashboardChart {
            id: "monthly-withdrawals-chart",
            options: monthly_withdrawals_chart(&chart_rows).to_string(),
        })
    };

    Ok(dashboard_view(&summary, chart.as_ref()).into_response())
}

fn stat_card(label: &str, value: Markup) -> Markup {
    html!(
        div class="bg-white dark:bg-gray-800 border border-gray-200
            dark:border-gray-700 rounded-lg p-4 shadow-md"
        {
            div class="text-sm text-gray-600 dark:text-gray-400" { (label) }
            div class="text-2xl font-bold" { (value) }
        }
    )
}

/// Truncate `note` to [NOTE_DISPLAY_GRAPHEMES] grapheme clusters.
///
/// Splitting on graphemes rather than bytes or chars keeps emoji and combining
/// marks intact.
fn truncate_note(note: &str) -> String {
    let graphemes: Vec<&str> = note.graphemes(true).collect();

    if graphemes.len() <= NOTE_DISPLAY_GRAPHEMES {
        note.to_string()
    } else {
        format!("{}...", graphemes[..NOTE_DISPLAY_GRAPHEMES].concat())
    }
}

fn recent_withdrawals_table(recent_withdrawals: &[RecentWithdrawal]) -> Markup {
    let table_row = |row: &RecentWithdrawal| {
        let note = row
            .withdrawal
            .note
            .as_deref()
            .map(truncate_note)
            .unwrap_or_else(|| "-".to_string());

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    time datetime=(row.withdrawal.date) { (row.withdrawal.date) }
                }

                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    (row.employee_name)
                }

                td class=(TABLE_CELL_STYLE) { (row.designation) }

                td class="px-6 py-4 text-right" { (format_currency(row.withdrawal.amount)) }

                td class=(TABLE_CELL_STYLE) { (note) }
            }
        )
    };

    html!(
        section class="w-full overflow-x-auto dark:bg-gray-800"
        {
            h2 class="text-lg font-semibold mb-2" { "Recent Withdrawals" }

            table class="w-full text-sm text-left rtl:text-right
                text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Employee" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Designation" }
                        th scope="col" class="px-6 py-3 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Note" }
                    }
                }

                tbody
                {
                    @for row in recent_withdrawals {
                        (table_row(row))
                    }

                    @if recent_withdrawals.is_empty() {
                        tr
                        {
                            td
                                colspan="5"
                                class="px-6 py-4 text-center
                                    text-gray-500 dark:text-gray-400"
                            {
                                "No withdrawals recorded yet."
                            }
                        }
                    }
                }
            }
        }
    )
}

fn dashboard_view(summary: &DashboardSummary, chart: Option<&DashboardChart>) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let head_elements = match chart {
        Some(chart) => vec![
            HeadElement::ScriptLink("/static/echarts-5.5.1-min.js".to_owned()),
            chart_script(chart),
        ],
        None => vec![],
    };

    let employee_count = summary.employee_count.to_string();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-6xl lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Dashboard" }

                    a href=(endpoints::EXPORT_CSV) class=(LINK_STYLE)
                    {
                        "Download CSV Report"
                    }
                }

                div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4"
                {
                    (stat_card("Employees", html!( (employee_count) )))
                    (stat_card("Total Salaries", html!( (format_currency(summary.total_salary)) )))
                    (stat_card("Total Withdrawn", html!( (format_currency(summary.total_withdrawn)) )))
                    (stat_card("Total Remaining", html!( (format_currency(summary.total_remaining)) )))
                }

                @if let Some(chart) = chart {
                    (chart_view(chart))
                }

                (recent_withdrawals_table(&summary.recent_withdrawals))
            }
        }
    );

    base("Dashboard", &head_elements, &content)
}

#[cfg(test)]
mod truncate_note_tests {
    use super::truncate_note;

    #[test]
    fn short_notes_pass_through() {
        assert_eq!(truncate_note("Eid advance"), "Eid advance");
    }

    #[test]
    fn long_notes_are_truncated() {
        let note = "a".repeat(50);

        let truncated = truncate_note(&note);

        assert_eq!(truncated, format!("{}...", "a".repeat(30)));
    }

    #[test]
    fn truncation_respects_grapheme_clusters() {
        // Family emoji is one grapheme built from several code points. It must
        // survive truncation intact or be dropped whole, never split.
        let note = format!("{}x", "👨‍👩‍👧‍👦".repeat(30));

        let truncated = truncate_note(&note);

        assert_eq!(truncated, format!("{}...", "👨‍👩‍👧‍👦".repeat(30)));
    }
}
