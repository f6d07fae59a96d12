//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{auth_guard, auth_guard_hx},
    change_password::{change_password_endpoint, get_change_password_page},
    dashboard::get_dashboard_page,
    employee::{
        create_employee_endpoint, delete_employee_endpoint, edit_employee_endpoint,
        get_create_employee_page, get_edit_employee_page, get_employee_history_page,
        get_employees_page,
    },
    endpoints,
    export::get_export_csv,
    internal_server_error::get_internal_server_error_page,
    log_in::{get_log_in_page, post_log_in},
    log_out::get_log_out,
    not_found::get_404_not_found,
    withdrawal::{create_withdrawal_endpoint, get_create_withdrawal_page},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::EMPLOYEES_VIEW, get(get_employees_page))
        .route(endpoints::NEW_EMPLOYEE_VIEW, get(get_create_employee_page))
        .route(endpoints::EDIT_EMPLOYEE_VIEW, get(get_edit_employee_page))
        .route(
            endpoints::EMPLOYEE_HISTORY_VIEW,
            get(get_employee_history_page),
        )
        .route(
            endpoints::NEW_WITHDRAWAL_VIEW,
            get(get_create_withdrawal_page),
        )
        .route(endpoints::EXPORT_CSV, get(get_export_csv))
        .route(
            endpoints::CHANGE_PASSWORD_VIEW,
            get(get_change_password_page),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST/PUT/DELETE routes need to use the HX-Redirect header for auth
    // redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::POST_EMPLOYEE, post(create_employee_endpoint))
            .route(endpoints::PUT_EMPLOYEE, put(edit_employee_endpoint))
            .route(endpoints::DELETE_EMPLOYEE, delete(delete_employee_endpoint))
            .route(endpoints::POST_WITHDRAWAL, post(create_withdrawal_endpoint))
            .route(
                endpoints::CHANGE_PASSWORD_API,
                post(change_password_endpoint),
            )
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, Html("I'm a teapot")).into_response()
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
