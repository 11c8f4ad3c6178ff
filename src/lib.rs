//! Local development server for NEO routing manifests.
//!
//! Reads a `neo-app.json` route table and serves the application behind a
//! local HTTP front that reverse-proxies each path prefix to its target
//! (the SAPUI5 CDN, a named destination, or a locally running application)
//! and statically serves everything else, rewriting response cookies so
//! browser sessions survive against `localhost`.

pub mod config;
pub mod http;
pub mod manifest;
pub mod routing;

pub use config::ServeOptions;
pub use http::DevServer;
pub use manifest::Manifest;
pub use routing::{CredentialSnapshot, RouteTable};
