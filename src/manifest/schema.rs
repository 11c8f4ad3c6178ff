//! Manifest schema definitions.

use serde::{Deserialize, Deserializer, Serialize};

/// The routing manifest: the `routes` array of `neo-app.json`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Manifest {
    /// Route declarations in manifest order. A `routes` value that is not
    /// an array is treated as absent.
    #[serde(default, deserialize_with = "routes_or_empty")]
    pub routes: Vec<RouteDescriptor>,
}

/// One entry of the routing manifest: a path prefix plus its target.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteDescriptor {
    /// Path prefix this route governs. Must begin with `/`.
    pub path: String,

    /// Where matching requests go.
    pub target: RouteTarget,
}

/// Closed set of route target kinds.
///
/// Adding a kind is a compile-time-checked change: every resolver matches
/// exhaustively. Manifest entries with a kind this tool does not know
/// deserialize to `Unsupported` and are skipped during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RouteTarget {
    /// A shared asset provider. Only `sapui5` is recognized.
    #[serde(rename_all = "camelCase")]
    Service {
        name: String,
        #[serde(default)]
        entry_path: Option<String>,
    },

    /// A named external backend configured via `DEST_<NAME>_*` variables.
    #[serde(rename_all = "camelCase")]
    Destination {
        name: String,
        #[serde(default)]
        entry_path: Option<String>,
    },

    /// A locally running backend whose files are also mounted statically.
    #[serde(rename_all = "camelCase")]
    Application {
        name: String,
        #[serde(default)]
        entry_path: Option<String>,
    },

    /// Any target kind this tool does not recognize.
    #[serde(other)]
    Unsupported,
}

fn routes_or_empty<'de, D>(deserializer: D) -> Result<Vec<RouteDescriptor>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(serde::de::Error::custom))
            .collect(),
        _ => Ok(Vec::new()),
    }
}
