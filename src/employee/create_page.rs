//! The page for adding a new employee.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
};

/// Render the employee creation page.
pub async fn get_create_employee_page() -> Response {
    let nav_bar = NavBar::new(endpoints::NEW_EMPLOYEE_VIEW).into_html();
    let form = new_employee_form_view("");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold my-4" { "Add Employee" }
            (form)
        }
    };

    base("Add Employee", &[], &content).into_response()
}

/// The employee creation form, with an optional error message from a previous
/// submission.
pub(super) fn new_employee_form_view(error_message: &str) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_EMPLOYEE)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Employee name"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="designation" class=(FORM_LABEL_STYLE) { "Designation" }

                input
                    id="designation"
                    type="text"
                    name="designation"
                    placeholder="e.g. Head Chef"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="monthly_salary" class=(FORM_LABEL_STYLE) { "Monthly Salary" }

                input
                    id="monthly_salary"
                    type="number"
                    name="monthly_salary"
                    min="0"
                    step="0.01"
                    placeholder="30000"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="join_date" class=(FORM_LABEL_STYLE) { "Join Date" }

                input
                    id="join_date"
                    type="date"
                    name="join_date"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Employee" }
        }
    }
}

#[cfg(test)]
mod new_employee_page_tests {
    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_document,
        },
    };

    use super::get_create_employee_page;

    #[tokio::test]
    async fn render_page() {
        let response = get_create_employee_page().await;

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_EMPLOYEE, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "designation", "text");
        assert_form_input(&form, "monthly_salary", "number");
        assert_form_input(&form, "join_date", "date");
        assert_form_submit_button(&form);
    }
}
