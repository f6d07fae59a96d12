//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/employees/{employee_id}/edit',
//! use [format_endpoint].

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page listing employees and their balances.
pub const EMPLOYEES_VIEW: &str = "/employees";
/// The page for adding a new employee.
pub const NEW_EMPLOYEE_VIEW: &str = "/employees/new";
/// The page for editing an existing employee.
pub const EDIT_EMPLOYEE_VIEW: &str = "/employees/{employee_id}/edit";
/// The page listing an employee's withdrawal history.
pub const EMPLOYEE_HISTORY_VIEW: &str = "/employees/{employee_id}/history";
/// The page for recording a withdrawal against an employee's salary.
pub const NEW_WITHDRAWAL_VIEW: &str = "/employees/{employee_id}/withdrawals/new";
/// The route for downloading the ledger as a CSV file.
pub const EXPORT_CSV: &str = "/export/csv";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page for changing the admin password.
pub const CHANGE_PASSWORD_VIEW: &str = "/change_password";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route for changing the admin password.
pub const CHANGE_PASSWORD_API: &str = "/api/change_password";
/// The route to create an employee.
pub const POST_EMPLOYEE: &str = "/api/employees";
/// The route to update an employee.
pub const PUT_EMPLOYEE: &str = "/api/employees/{employee_id}";
/// The route to delete an employee.
pub const DELETE_EMPLOYEE: &str = "/api/employees/{employee_id}";
/// The route to record a withdrawal.
pub const POST_WITHDRAWAL: &str = "/api/withdrawals";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/employees/{employee_id}/edit',
/// '{employee_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EMPLOYEES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_EMPLOYEE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_EMPLOYEE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EMPLOYEE_HISTORY_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_WITHDRAWAL_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EXPORT_CSV);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN_VIEW);
        assert_endpoint_is_valid_uri(endpoints::CHANGE_PASSWORD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);

        assert_endpoint_is_valid_uri(endpoints::COFFEE);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN_API);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::CHANGE_PASSWORD_API);
        assert_endpoint_is_valid_uri(endpoints::POST_EMPLOYEE);
        assert_endpoint_is_valid_uri(endpoints::PUT_EMPLOYEE);
        assert_endpoint_is_valid_uri(endpoints::DELETE_EMPLOYEE);
        assert_endpoint_is_valid_uri(endpoints::POST_WITHDRAWAL);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
