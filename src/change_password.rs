//! The change-password page and endpoint for the admin user.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, PasswordHash,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, password_input},
    navigation::NavBar,
    user::{UserID, get_user_by_id, update_password},
};

/// The state needed to change the admin password.
#[derive(Debug, Clone)]
pub struct ChangePasswordState {
    /// The database connection holding the user table.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ChangePasswordState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for changing the password.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordForm {
    /// The current password, for re-authentication.
    pub old_password: String,
    /// The new password.
    pub new_password: String,
    /// The new password, typed a second time.
    pub confirm_password: String,
}

/// Render the change-password page.
pub async fn get_change_password_page() -> Response {
    change_password_view(None).into_response()
}

/// Handle the change-password form submission.
///
/// The auth middleware puts the logged-in user's ID into the request
/// extensions, so re-fetching the user here never races a log-out.
pub async fn change_password_endpoint(
    State(state): State<ChangePasswordState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ChangePasswordForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let user = match get_user_by_id(user_id, &connection) {
        Ok(user) => user,
        Err(error) => {
            tracing::error!("Could not load user {user_id}: {error}");
            return error.into_alert_response();
        }
    };

    let is_old_password_valid = match user.password_hash.verify(&form.old_password) {
        Ok(is_valid) => is_valid,
        Err(error) => {
            tracing::error!("Could not verify password: {error}");
            return Error::HashingError(error.to_string()).into_alert_response();
        }
    };

    if !is_old_password_valid {
        return change_password_form_view(Some("Current password is incorrect.")).into_response();
    }

    if form.new_password != form.confirm_password {
        return change_password_form_view(Some("New passwords do not match.")).into_response();
    }

    let password_hash =
        match PasswordHash::from_raw_password(&form.new_password, PasswordHash::DEFAULT_COST) {
            Ok(password_hash) => password_hash,
            Err(Error::TooWeak(feedback)) => {
                return change_password_form_view(Some(&format!(
                    "Password is too weak: {feedback}"
                )))
                .into_response();
            }
            Err(error) => {
                tracing::error!("Could not hash new password: {error}");
                return error.into_alert_response();
            }
        };

    match update_password(user.id, &password_hash, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not update password: {error}");
            error.into_alert_response()
        }
    }
}

fn change_password_view(error_message: Option<&str>) -> Markup {
    let nav_bar = NavBar::new(endpoints::CHANGE_PASSWORD_VIEW).into_html();
    let form = change_password_form_view(error_message);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold my-4" { "Change Password" }
            (form)
        }
    };

    base("Change Password", &[], &content)
}

fn change_password_form_view(error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::CHANGE_PASSWORD_API)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (password_input("old_password", "Current Password", None))
            (password_input("new_password", "New Password", None))
            (password_input("confirm_password", "Confirm New Password", error_message))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Change Password" }
        }
    }
}

#[cfg(test)]
mod change_password_page_tests {
    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_document,
        },
    };

    use super::get_change_password_page;

    #[tokio::test]
    async fn render_page() {
        let response = get_change_password_page().await;

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::CHANGE_PASSWORD_API, "hx-post");
        assert_form_input(&form, "old_password", "password");
        assert_form_input(&form, "new_password", "password");
        assert_form_input(&form, "confirm_password", "password");
        assert_form_submit_button(&form);
    }
}
