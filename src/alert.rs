//! Alert fragments for displaying success and error messages to the operator.
//!
//! Alerts are rendered as HTML fragments that htmx swaps into the
//! `#alert-container` element via the response-targets extension.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};

/// A success or error message with optional supporting detail.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message with no extra detail.
    SuccessSimple {
        /// The headline shown to the operator.
        message: String,
    },
    /// An error message with supporting detail text.
    Error {
        /// The headline shown to the operator.
        message: String,
        /// Extra detail explaining the error or how to recover.
        details: String,
    },
}

impl Alert {
    /// Create a new error alert.
    pub fn error(message: &str, details: &str) -> Self {
        Self::Error {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    fn into_markup(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::SuccessSimple { message } => (
                "flex items-start gap-3 p-4 text-sm rounded border shadow-lg \
                text-green-800 border-green-300 bg-green-50 \
                dark:bg-gray-800 dark:text-green-400 dark:border-green-800",
                message,
                String::new(),
            ),
            Alert::Error { message, details } => (
                "flex items-start gap-3 p-4 text-sm rounded border shadow-lg \
                text-red-800 border-red-300 bg-red-50 \
                dark:bg-gray-800 dark:text-red-400 dark:border-red-800",
                message,
                details,
            ),
        };

        html!(
            div
                class=(container_style)
                role="alert"
            {
                div class="flex-1"
                {
                    span class="font-medium" { (message) }

                    @if !details.is_empty() {
                        p { (details) }
                    }
                }

                button
                    type="button"
                    class="font-bold cursor-pointer"
                    aria-label="Dismiss"
                    onclick="this.closest('[role=alert]').remove();"
                {
                    "✕"
                }
            }
        )
    }
}

impl IntoResponse for Alert {
    // The status code has to be 200 OK or HTMX will not perform row swaps,
    // so success alerts always render as OK.
    fn into_response(self) -> Response {
        render_alert(StatusCode::OK, self)
    }
}

/// Render `alert` as an HTML fragment response with `status_code`.
///
/// The fragment is swapped into `#alert-container` by the htmx
/// response-targets extension (see the `hx-target-error` attributes on forms
/// and delete buttons).
pub fn render_alert(status_code: StatusCode, alert: Alert) -> Response {
    (status_code, Html(alert.into_markup().into_string())).into_response()
}
