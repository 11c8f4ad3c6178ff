//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the middleware chain in contract order
//! - Serve the static mounts in mount order
//! - Hand unmatched paths to the directory listing and sandbox fallbacks
//! - Bind plain or TLS depending on the secure option
//!
//! # Middleware order (outermost first)
//! cookie rewrite → proxy match → static mounts → listing → sandbox → 404.
//! The cookie layer wraps the write path, so it always observes the final
//! `Set-Cookie` values the inner pipeline produced.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceExt;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::schema::ServeOptions;
use crate::http::{cookies, listing, proxy, sandbox, tls};
use crate::routing::table::RouteTable;

/// Application state shared by all request handlers. Read-only after start.
#[derive(Clone)]
pub struct AppState {
    pub options: Arc<ServeOptions>,
    pub table: Arc<RouteTable>,
    pub client: reqwest::Client,
}

/// The local development front.
pub struct DevServer {
    router: Router,
    options: Arc<ServeOptions>,
}

impl DevServer {
    /// Assemble the server from resolved options and route table.
    pub fn new(options: ServeOptions, table: RouteTable) -> Result<Self, reqwest::Error> {
        let options = Arc::new(options);
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let state = AppState {
            options: options.clone(),
            table: Arc::new(table),
            client,
        };

        let router = Self::build_router(state);
        Ok(Self { router, options })
    }

    /// Build the Axum router. Later layers wrap earlier ones, so the cookie
    /// rewrite is registered last to sit outermost (TraceLayer excepted).
    fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(static_or_fallback)
            .layer(middleware::from_fn_with_state(
                state.clone(),
                proxy::proxy_middleware,
            ))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                cookies::rewrite_set_cookie,
            ))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            scheme = self.options.scheme(),
            "development server starting"
        );

        if self.options.secure {
            let tls_config = tls::rustls_config(self.options.tls.as_ref()).await?;

            let handle = axum_server::Handle::new();
            let shutdown_handle = handle.clone();
            tokio::spawn(async move {
                shutdown_signal().await;
                shutdown_handle.graceful_shutdown(None);
            });

            axum_server::from_tcp_rustls(listener.into_std()?, tls_config)
                .handle(handle)
                .serve(self.router.into_make_service())
                .await?;
        } else {
            axum::serve(listener, self.router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }

        tracing::info!("development server stopped");
        Ok(())
    }
}

/// Serve the request from the static mounts, falling through to the
/// directory listing and the sandbox renderer.
async fn static_or_fallback(State(state): State<AppState>, req: Request) -> Response {
    let (parts, _) = req.into_parts();

    // The index document only steers the file lookup. The listing and
    // sandbox fallbacks below still see the path as requested.
    let mut serve_parts = parts.clone();
    if !state.options.index.is_empty() && serve_parts.uri.path().ends_with('/') {
        serve_parts.uri = with_index(&serve_parts.uri, &state.options.index);
    }

    for mount in &state.table.mounts {
        let request = Request::from_parts(serve_parts.clone(), Body::empty());
        if let Ok(response) = ServeDir::new(mount).oneshot(request).await {
            if response.status() != StatusCode::NOT_FOUND {
                return response.map(Body::new);
            }
        }
    }

    if let Some(response) = listing::try_render(&state, parts.uri.path()).await {
        return response;
    }

    if parts.uri.path() == sandbox::SANDBOX_PATH {
        return sandbox::render(&state).await;
    }

    StatusCode::NOT_FOUND.into_response()
}

/// Append the configured index document to a directory request.
fn with_index(uri: &Uri, index: &str) -> Uri {
    let path = format!("{}{}", uri.path(), index);
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path,
    };
    path_and_query.parse().unwrap_or_else(|_| uri.clone())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
