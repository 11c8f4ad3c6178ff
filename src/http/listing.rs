//! Directory listing fallback.
//!
//! When no static asset matched and the request path names a directory
//! under one of the mounts, render an HTML index of its entries from the
//! listing template. An unreadable template falls back to a built-in one;
//! the listing is a convenience, not a contract.

use std::path::Path;

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::server::AppState;

const PATH_TOKEN: &str = "{{path}}";
const ENTRIES_TOKEN: &str = "{{entries}}";

const FALLBACK_TEMPLATE: &str =
    "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Index of {{path}}</title></head>\
     <body><h1>Index of {{path}}</h1><ul>{{entries}}</ul></body></html>";

/// Render a listing when `request_path` names a directory under one of the
/// mounts. `None` lets the fallback chain continue.
pub async fn try_render(state: &AppState, request_path: &str) -> Option<Response> {
    let relative = request_path.trim_start_matches('/');
    if relative.split('/').any(|segment| segment == "..") {
        return None;
    }

    for mount in &state.table.mounts {
        let dir = mount.join(relative);
        let is_dir = tokio::fs::metadata(&dir)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        if is_dir {
            return Some(render_directory(state, request_path, &dir).await);
        }
    }

    None
}

async fn render_directory(state: &AppState, request_path: &str, dir: &Path) -> Response {
    let template_path = state.options.template_dir().join("listing.html");
    let template = match tokio::fs::read_to_string(&template_path).await {
        Ok(template) => template,
        Err(error) => {
            tracing::debug!(
                %error,
                path = %template_path.display(),
                "listing template unreadable, using built-in"
            );
            FALLBACK_TEMPLATE.to_owned()
        }
    };

    let entries = collect_entries(dir).await;
    let items = render_entries(request_path, &entries);
    let body = template
        .replace(PATH_TOKEN, request_path)
        .replace(ENTRIES_TOKEN, &items);

    match Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Body::from(body))
    {
        Ok(response) => response,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// Entry names in sorted order, directories marked with a trailing slash.
async fn collect_entries(dir: &Path) -> Vec<String> {
    let mut entries = Vec::new();

    match tokio::fs::read_dir(dir).await {
        Ok(mut reader) => {
            while let Ok(Some(entry)) = reader.next_entry().await {
                let mut name = entry.file_name().to_string_lossy().into_owned();
                let is_dir = entry
                    .file_type()
                    .await
                    .map(|kind| kind.is_dir())
                    .unwrap_or(false);
                if is_dir {
                    name.push('/');
                }
                entries.push(name);
            }
        }
        Err(error) => {
            tracing::warn!(%error, path = %dir.display(), "could not read directory");
        }
    }

    entries.sort();
    entries
}

fn render_entries(request_path: &str, entries: &[String]) -> String {
    let base = if request_path.ends_with('/') {
        request_path.to_owned()
    } else {
        format!("{request_path}/")
    };

    entries
        .iter()
        .map(|name| format!("<li><a href=\"{base}{name}\">{name}</a></li>\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_link_relative_to_the_request_path() {
        let entries = vec!["css/".to_owned(), "index.html".to_owned()];
        let html = render_entries("/webapp", &entries);
        assert!(html.contains("<a href=\"/webapp/css/\">css/</a>"));
        assert!(html.contains("<a href=\"/webapp/index.html\">index.html</a>"));
    }

    #[test]
    fn trailing_slash_paths_are_not_doubled() {
        let entries = vec!["app.js".to_owned()];
        let html = render_entries("/webapp/", &entries);
        assert!(html.contains("<a href=\"/webapp/app.js\">"));
    }
}
