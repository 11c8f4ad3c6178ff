//! HTTP front subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware order, static mounts)
//!     → cookies.rs (Set-Cookie rewrite wraps every response)
//!     → proxy.rs (first matching context forwards upstream)
//!     → static mounts (tower-http ServeDir, in mount order)
//!     → listing.rs / sandbox.rs (fallbacks for unmatched paths)
//! ```

pub mod cookies;
pub mod listing;
pub mod proxy;
pub mod sandbox;
pub mod server;
pub mod tls;

pub use server::{AppState, DevServer};
