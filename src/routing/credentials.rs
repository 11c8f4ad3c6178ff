//! Credential snapshot: per-destination connection material.
//!
//! # Design Decisions
//! - Captured from the process environment once at startup, immutable after
//! - Threaded as an argument into resolution, never read ad hoc
//! - Naming convention: `DEST_<NAME>_{HOST,USER,PASSWORD,PATH}`, name case
//!   preserved exactly as authored in the manifest
//! - Empty values count as absent; no further format validation

use std::collections::HashMap;

/// Immutable capture of the `DEST_*` process configuration.
#[derive(Debug, Clone, Default)]
pub struct CredentialSnapshot {
    vars: HashMap<String, String>,
}

/// Connection material for one named destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationCredentials {
    pub host: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl CredentialSnapshot {
    /// Capture the current process environment.
    pub fn capture() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build a snapshot from explicit key/value pairs.
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            vars: vars.into_iter().collect(),
        }
    }

    /// Connection material for a named destination.
    pub fn destination(&self, name: &str) -> DestinationCredentials {
        DestinationCredentials {
            host: self.get(&format!("DEST_{name}_HOST")),
            user: self.get(&format!("DEST_{name}_USER")),
            password: self.get(&format!("DEST_{name}_PASSWORD")),
        }
    }

    /// Local filesystem root for a named application.
    pub fn application_path(&self, name: &str) -> Option<String> {
        self.get(&format!("DEST_{name}_PATH"))
    }

    fn get(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .filter(|value| !value.is_empty())
            .cloned()
    }
}
