//! Withdrawal aggregation for the dashboard chart.
//!
//! Provides functions to aggregate withdrawal amounts by month and format the
//! result for chart display.

use std::collections::HashMap;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use time::Date;

/// Aggregates withdrawal amounts by month.
///
/// # Returns
/// HashMap mapping each month (as Date with day=1) to the sum of withdrawal amounts.
pub(super) fn aggregate_by_month(rows: &[(Date, Decimal)]) -> HashMap<Date, Decimal> {
    let mut totals = HashMap::new();

    for (date, amount) in rows {
        let month = date.replace_day(1).unwrap();
        *totals.entry(month).or_insert(Decimal::ZERO) += *amount;
    }

    totals
}

/// Formats month dates as three-letter abbreviations.
pub(super) fn format_month_labels(months: &[Date]) -> Vec<String> {
    use time::Month;
    let month_to_str = |date: &Date| {
        match date.month() {
            Month::January => "Jan",
            Month::February => "Feb",
            Month::March => "Mar",
            Month::April => "Apr",
            Month::May => "May",
            Month::June => "Jun",
            Month::July => "Jul",
            Month::August => "Aug",
            Month::September => "Sep",
            Month::October => "Oct",
            Month::November => "Nov",
            Month::December => "Dec",
        }
        .to_string()
    };

    months.iter().map(month_to_str).collect()
}

/// Converts monthly aggregate data into sorted labels and values for charting.
///
/// The conversion to float is for chart display only; the ledger itself never
/// leaves [Decimal].
pub(super) fn get_monthly_label_and_value_pairs(
    monthly_totals: &HashMap<Date, Decimal>,
) -> (Vec<String>, Vec<f64>) {
    let mut sorted_months: Vec<Date> = monthly_totals.keys().copied().collect();
    sorted_months.sort();

    let labels = format_month_labels(&sorted_months);
    let values = sorted_months
        .iter()
        .map(|month| monthly_totals[month].to_f64().unwrap_or(0.0))
        .collect();

    (labels, values)
}
