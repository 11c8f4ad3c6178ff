//! Route resolution logic.
//!
//! # Responsibilities
//! - Map one route descriptor to a proxy rule, a local mount, or nothing
//! - Dispatch exhaustively on target kind, then target name
//! - Attach Basic-auth material for destinations that carry credentials
//!
//! # Design Decisions
//! - Pure apart from the credential snapshot read and diagnostic logging
//! - A failed route resolves to `None`, never to a partial rule
//! - `rewrite` always holds exactly one entry keyed by the route's context

use std::collections::HashMap;
use std::path::PathBuf;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::config::schema::ServeOptions;
use crate::manifest::schema::{RouteDescriptor, RouteTarget};
use crate::routing::credentials::CredentialSnapshot;

/// Public host serving all SAPUI5 runtime versions.
pub const UI5_CDN_HOST: &str = "sapui5.hana.ondemand.com";

/// Resolved forwarding instruction for one path prefix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProxyRule {
    /// Path prefix this rule matches.
    pub context: String,

    /// Upstream host.
    pub host: String,

    /// Upstream port; absent means the scheme default.
    #[serde(default)]
    pub port: Option<u16>,

    /// Encrypted upstream transport.
    #[serde(default)]
    pub https: bool,

    /// Headers injected into forwarded requests.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Path rewrite, keyed by `context`.
    #[serde(default)]
    pub rewrite: HashMap<String, String>,
}

impl ProxyRule {
    /// Does the rule govern this request path?
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.context)
    }

    /// Upstream path after the context rewrite.
    pub fn rewritten_path(&self, path: &str) -> String {
        match self.rewrite.get(&self.context) {
            Some(replacement) if self.matches(path) => {
                format!("{}{}", replacement, &path[self.context.len()..])
            }
            _ => path.to_owned(),
        }
    }

    /// `host[:port]` authority for the upstream URL.
    pub fn authority(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }
}

/// Resolve a route to a proxy rule, or `None` when the route does not
/// produce one (unknown name, missing credentials, unsupported kind).
pub fn resolve_proxy(
    route: &RouteDescriptor,
    options: &ServeOptions,
    credentials: &CredentialSnapshot,
) -> Option<ProxyRule> {
    match &route.target {
        RouteTarget::Service { name, entry_path } => {
            resolve_service(route, name, entry_path.as_deref(), options)
        }
        RouteTarget::Destination { name, entry_path } => {
            resolve_destination(route, name, entry_path.as_deref(), credentials)
        }
        RouteTarget::Application { name, entry_path } => {
            resolve_application(route, name, entry_path.as_deref(), options, credentials)
        }
        RouteTarget::Unsupported => None,
    }
}

/// Resolve a route to an additional static mount. Only application targets
/// produce one; the result is independent of `resolve_proxy`.
pub fn resolve_path(route: &RouteDescriptor, credentials: &CredentialSnapshot) -> Option<PathBuf> {
    match &route.target {
        RouteTarget::Application { name, .. } => {
            let path = credentials.application_path(name);
            if path.is_none() {
                tracing::warn!(
                    application = %name,
                    route = %route.path,
                    "no path configured for application, skipping"
                );
            }
            path.map(PathBuf::from)
        }
        _ => None,
    }
}

fn resolve_service(
    route: &RouteDescriptor,
    name: &str,
    entry_path: Option<&str>,
    options: &ServeOptions,
) -> Option<ProxyRule> {
    match name {
        "sapui5" => {
            let version = if options.sap_ui5.is_empty() {
                String::new()
            } else {
                format!("/{}", options.sap_ui5)
            };

            let mut rewrite = HashMap::new();
            rewrite.insert(
                route.path.clone(),
                format!("{}{}", version, entry_path.unwrap_or_default()),
            );

            Some(ProxyRule {
                context: route.path.clone(),
                host: UI5_CDN_HOST.to_owned(),
                port: None,
                https: true,
                headers: HashMap::new(),
                rewrite,
            })
        }
        other => {
            tracing::warn!(service = %other, route = %route.path, "unrecognized service, skipping");
            None
        }
    }
}

fn resolve_destination(
    route: &RouteDescriptor,
    name: &str,
    entry_path: Option<&str>,
    credentials: &CredentialSnapshot,
) -> Option<ProxyRule> {
    let creds = credentials.destination(name);
    let Some(host) = creds.host else {
        tracing::warn!(
            destination = %name,
            route = %route.path,
            "no host configured for destination, skipping"
        );
        return None;
    };

    let mut headers = HashMap::new();
    if let (Some(user), Some(password)) = (creds.user, creds.password) {
        let token =
            base64::engine::general_purpose::STANDARD.encode(format!("{user}:{password}"));
        headers.insert("Authorization".to_owned(), format!("Basic {token}"));
    }

    let mut rewrite = HashMap::new();
    rewrite.insert(
        route.path.clone(),
        entry_path.unwrap_or_default().to_owned(),
    );

    Some(ProxyRule {
        context: route.path.clone(),
        host,
        port: None,
        https: true,
        headers,
        rewrite,
    })
}

fn resolve_application(
    route: &RouteDescriptor,
    name: &str,
    entry_path: Option<&str>,
    options: &ServeOptions,
    credentials: &CredentialSnapshot,
) -> Option<ProxyRule> {
    if credentials.application_path(name).is_none() {
        tracing::warn!(
            application = %name,
            route = %route.path,
            "no path configured for application, skipping"
        );
        return None;
    }

    let mut rewrite = HashMap::new();
    rewrite.insert(
        route.path.clone(),
        entry_path.unwrap_or_default().to_owned(),
    );

    // The local loop-back mirrors the front server's own transport.
    Some(ProxyRule {
        context: route.path.clone(),
        host: "localhost".to_owned(),
        port: Some(options.port),
        https: options.secure,
        headers: HashMap::new(),
        rewrite,
    })
}
