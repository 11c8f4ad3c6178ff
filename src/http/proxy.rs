//! Upstream forwarding.
//!
//! # Responsibilities
//! - Match the request path against the proxy table (first context wins)
//! - Rewrite the path, inject rule headers, forward upstream
//! - Stream the upstream response back unchanged
//!
//! # Design Decisions
//! - No retries, no load balancing: this is a development front
//! - Request bodies are buffered (uploads at dev scale), responses stream

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower::BoxError;

use crate::http::server::AppState;
use crate::routing::resolver::ProxyRule;

/// Middleware: forward requests matching a proxy rule, pass the rest on.
pub async fn proxy_middleware(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    let Some(rule) = state.table.matching(&path) else {
        return next.run(req).await;
    };
    let rule = rule.clone();

    match forward(&state, &rule, req).await {
        Ok(response) => response,
        Err(error) => {
            tracing::error!(%error, context = %rule.context, %path, "upstream request failed");
            (StatusCode::BAD_GATEWAY, "upstream request failed").into_response()
        }
    }
}

async fn forward(state: &AppState, rule: &ProxyRule, req: Request) -> Result<Response, BoxError> {
    let (parts, body) = req.into_parts();
    let url = upstream_url(rule, parts.uri.path(), parts.uri.query());

    tracing::debug!(context = %rule.context, %url, "proxying request");

    let mut headers = HeaderMap::new();
    for (name, value) in parts.headers.iter() {
        if name.as_str() == "host" || is_hop_by_hop(name) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    for (name, value) in &rule.headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            headers.insert(name, value);
        }
    }

    let body = axum::body::to_bytes(body, usize::MAX).await?;

    let upstream = state
        .client
        .request(parts.method.clone(), url)
        .headers(headers)
        .body(body)
        .send()
        .await?;

    let mut response = Response::builder().status(upstream.status());
    if let Some(response_headers) = response.headers_mut() {
        for (name, value) in upstream.headers() {
            if is_hop_by_hop(name) {
                continue;
            }
            response_headers.append(name.clone(), value.clone());
        }
    }

    Ok(response.body(Body::from_stream(upstream.bytes_stream()))?)
}

/// Upstream URL for a matched request: scheme from the rule's transport,
/// path with the context rewrite applied, query preserved.
fn upstream_url(rule: &ProxyRule, path: &str, query: Option<&str>) -> String {
    let scheme = if rule.https { "https" } else { "http" };
    let path = rule.rewritten_path(path);
    match query {
        Some(query) => format!("{scheme}://{}{path}?{query}", rule.authority()),
        None => format!("{scheme}://{}{path}", rule.authority()),
    }
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
            | "proxy-authenticate"
            | "proxy-authorization"
    )
}
