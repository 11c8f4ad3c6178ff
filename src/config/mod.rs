//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! localneo.toml (optional)
//!     → loader.rs (parse & deserialize; absent file ⇒ defaults)
//!     → CLI overrides applied by main
//!     → ServeOptions (immutable for the process lifetime)
//!     → shared via Arc to all request handlers
//! ```
//!
//! # Design Decisions
//! - Every option has a default; a missing file or field never fails
//! - Options are immutable once the server starts
//! - CLI flags win over the options file

pub mod loader;
pub mod schema;

pub use loader::{load_options, OptionsError};
pub use schema::{ServeOptions, TlsOptions};
