//! Sandbox page renderer.
//!
//! Serves a single templated HTML page that bootstraps the configured UI
//! component in isolation. Activates only for [`SANDBOX_PATH`]; the server
//! routes every other path past it. The template is read per request — the
//! only suspending operation in the request path — and a read failure is
//! fatal for that request only.

use std::path::PathBuf;

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::server::AppState;

/// The only path the sandbox renderer answers.
pub const SANDBOX_PATH: &str = "/sandbox.html";

/// The single substitution token the template may contain.
const COMPONENT_TOKEN: &str = "{{component}}";

/// Render the sandbox page for the configured component.
pub async fn render(state: &AppState) -> Response {
    let template_path = template_path(state);

    let template = match tokio::fs::read_to_string(&template_path).await {
        Ok(template) => template,
        Err(error) => {
            tracing::error!(
                %error,
                path = %template_path.display(),
                "failed to read sandbox template"
            );
            return (StatusCode::INTERNAL_SERVER_ERROR, "sandbox template unreadable")
                .into_response();
        }
    };

    let body = apply_component(&template, &state.options.component);
    html_response(body)
}

fn template_path(state: &AppState) -> PathBuf {
    state.options.template_dir().join("sandbox.html")
}

/// Substitute every occurrence of the component token. No other tokens are
/// supported; unknown tokens pass through untouched.
fn apply_component(template: &str, component: &str) -> String {
    template.replace(COMPONENT_TOKEN, component)
}

fn html_response(body: String) -> Response {
    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .header(header::CONTENT_LENGTH, body.len())
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff");

    match builder.body(Body::from(body)) {
        Ok(response) => response,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_every_occurrence_of_the_token() {
        let template = r#"<div data-name="{{component}}" id="{{component}}"></div>"#;
        assert_eq!(
            apply_component(template, "my.app.Component"),
            r#"<div data-name="my.app.Component" id="my.app.Component"></div>"#
        );
    }

    #[test]
    fn unknown_tokens_pass_through() {
        let template = "{{component}} and {{other}}";
        assert_eq!(
            apply_component(template, "x"),
            "x and {{other}}"
        );
    }

    #[test]
    fn template_without_token_is_returned_verbatim() {
        assert_eq!(apply_component("<html></html>", "x"), "<html></html>");
    }
}
