//! Configuration schema definitions.
//!
//! This module defines the runtime options for the development server.
//! All types derive Serde traits for deserialization from the options file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::routing::ProxyRule;

/// Runtime options for the development server.
///
/// Mirrors the options block of the routing task this tool replaces:
/// every field has a default, absence never causes failure.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServeOptions {
    /// Listen port.
    pub port: u16,

    /// Open the browser once the server is listening.
    pub open: bool,

    /// Project root; static root and templates resolve against it.
    pub base_dir: PathBuf,

    /// Static root, relative to `base_dir`.
    pub base_path: PathBuf,

    /// Index document for directory requests. Empty selects the server
    /// default (`index.html`).
    pub index: String,

    /// SAPUI5 version pin for the `sapui5` service route. Empty means latest.
    pub sap_ui5: String,

    /// Component id substituted into the sandbox page.
    pub component: String,

    /// Serve over https and keep `Secure;` cookie attributes.
    pub secure: bool,

    /// Certificate material for secure mode. When absent a throwaway
    /// self-signed localhost certificate is generated.
    pub tls: Option<TlsOptions>,

    /// Caller-supplied proxy rules, checked before the manifest-derived ones.
    pub proxies: Vec<ProxyRule>,

    /// Extra static roots mounted after the base static root.
    pub local_resources: Vec<PathBuf>,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            port: 62493,
            open: false,
            base_dir: PathBuf::from("."),
            base_path: PathBuf::from("./webapp"),
            index: String::new(),
            sap_ui5: String::new(),
            component: String::new(),
            secure: false,
            tls: None,
            proxies: Vec::new(),
            local_resources: Vec::new(),
        }
    }
}

impl ServeOptions {
    /// Effective static root: `base_path` resolved against `base_dir`.
    pub fn static_root(&self) -> PathBuf {
        self.base_dir.join(&self.base_path)
    }

    /// Directory holding the sandbox and listing templates.
    pub fn template_dir(&self) -> PathBuf {
        self.base_dir.join("templates")
    }

    /// URL scheme of the local listener.
    pub fn scheme(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }
}

/// TLS material for the listener in secure mode.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsOptions {
    /// Path to certificate file (PEM).
    pub cert_path: PathBuf,

    /// Path to private key file (PEM).
    pub key_path: PathBuf,
}
