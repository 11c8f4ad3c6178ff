//! Routing manifest subsystem.
//!
//! # Data Flow
//! ```text
//! neo-app.json
//!     → loader.rs (read & deserialize)
//!     → Manifest { routes: Vec<RouteDescriptor> }
//!     → routing::RouteTable::build (resolution at startup)
//! ```
//!
//! # Design Decisions
//! - Missing file ⇒ empty manifest plus a diagnostic, never an error
//! - Malformed JSON is the only condition that aborts server start
//! - `routes` present but not an array is treated as absent
//! - Unknown target kinds deserialize to an explicit `Unsupported` variant
//!   so resolution can skip them without a default branch

pub mod loader;
pub mod schema;

pub use loader::{load_manifest, ManifestError};
pub use schema::{Manifest, RouteDescriptor, RouteTarget};
