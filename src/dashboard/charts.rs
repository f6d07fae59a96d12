//! Chart generation for the dashboard.
//!
//! The withdrawals-per-month chart is generated as JSON configuration for the
//! ECharts library and rendered with an HTML container and JavaScript
//! initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger,
    },
    series::Bar,
};
use maud::{Markup, PreEscaped, html};
use rust_decimal::Decimal;
use time::Date;

use crate::{
    dashboard::aggregation::{aggregate_by_month, get_monthly_label_and_value_pairs},
    html::HeadElement,
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML container for a dashboard chart.
pub(super) fn chart_view(chart: &DashboardChart) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div
                id=(chart.id)
                class="min-h-[380px] rounded dark:bg-gray-100"
            {}
        }
    )
}

/// Generates JavaScript initialization code for a dashboard chart.
///
/// Creates a script that initializes the ECharts instance with dark mode
/// support and responsive resizing.
pub(super) fn chart_script(chart: &DashboardChart) -> HeadElement {
    let script_content = format!(
        r#"(function() {{
            const chartDom = document.getElementById("{}");
            const chart = echarts.init(chartDom);
            const option = {};
            chart.setOption(option);

            window.addEventListener('resize', chart.resize);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                const isDarkMode = darkModeMediaQuery.matches;
                chart.setTheme(isDarkMode ? 'dark' : 'default');
            }}
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }})();"#,
        chart.id, chart.options
    );

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Build the withdrawals-per-month bar chart from raw (date, amount) rows.
pub(super) fn monthly_withdrawals_chart(rows: &[(Date, Decimal)]) -> Chart {
    let monthly_totals = aggregate_by_month(rows);
    let (labels, values) = get_monthly_label_and_value_pairs(&monthly_totals);

    Chart::new()
        .title(
            Title::new()
                .text("Withdrawals")
                .subtext("Last twelve months"),
        )
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Withdrawals").data(values))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod chart_tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use time::macros::date;

    use super::monthly_withdrawals_chart;

    #[test]
    fn chart_options_are_valid_json() {
        let rows = vec![
            (date!(2024 - 01 - 15), Decimal::from_str("100").unwrap()),
            (date!(2024 - 02 - 10), Decimal::from_str("250.50").unwrap()),
        ];

        let options = monthly_withdrawals_chart(&rows).to_string();

        // JsFunction values are spliced into the JSON as raw JavaScript, so
        // only check the chart renders non-empty options containing our data.
        assert!(options.contains("Withdrawals"));
        assert!(options.contains("Jan"));
        assert!(options.contains("Feb"));
    }

    #[test]
    fn chart_handles_no_data() {
        let options = monthly_withdrawals_chart(&[]).to_string();

        assert!(options.contains("Withdrawals"));
    }
}
