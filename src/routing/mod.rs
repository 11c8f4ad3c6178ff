//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Resolution (at startup):
//!     RouteDescriptor[] + ServeOptions + CredentialSnapshot
//!     → resolver.rs (per route: proxy rule, local mount, or nothing)
//!     → table.rs (overrides-first concat, mount list)
//!     → Freeze as immutable RouteTable
//!
//! Request time:
//!     path → RouteTable::matching (first context prefix wins)
//! ```
//!
//! # Design Decisions
//! - Resolution runs once, synchronously, before any request is accepted
//! - A route that cannot be resolved produces no rule, never a partial one
//! - Credentials come from an immutable snapshot, never read ad hoc
//! - Duplicate contexts coexist in the table; first match wins

pub mod credentials;
pub mod resolver;
pub mod table;

pub use credentials::{CredentialSnapshot, DestinationCredentials};
pub use resolver::{resolve_path, resolve_proxy, ProxyRule};
pub use table::RouteTable;
