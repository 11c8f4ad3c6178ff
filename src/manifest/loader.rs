//! Manifest loading from disk.

use std::path::Path;

use thiserror::Error;

use crate::manifest::schema::Manifest;

/// Error type for manifest loading. Parse failure is the only condition
/// that aborts server start: no meaningful route table can be derived.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed manifest {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Load the routing manifest.
///
/// A missing file is served as an empty manifest with a diagnostic so a
/// plain static project still runs.
pub fn load_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    if !path.exists() {
        tracing::warn!(
            path = %path.display(),
            "routing manifest not found, serving without routes"
        );
        return Ok(Manifest::default());
    }

    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ManifestError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_manifest_is_empty_not_an_error() {
        let manifest = load_manifest(Path::new("no/such/neo-app.json")).unwrap();
        assert!(manifest.routes.is_empty());
    }

    #[test]
    fn malformed_manifest_aborts() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        assert!(matches!(
            load_manifest(file.path()),
            Err(ManifestError::Parse { .. })
        ));
    }

    #[test]
    fn valid_manifest_round_trips() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"routes": [{{"path": "/ui5", "target": {{"type": "service", "name": "sapui5", "entryPath": "/resources"}}}}]}}"#
        )
        .unwrap();

        let manifest = load_manifest(file.path()).unwrap();
        assert_eq!(manifest.routes.len(), 1);
        assert_eq!(manifest.routes[0].path, "/ui5");
    }
}
