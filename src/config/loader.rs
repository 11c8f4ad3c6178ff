//! Options loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ServeOptions;

/// Error type for options loading.
#[derive(Debug)]
pub enum OptionsError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl std::fmt::Display for OptionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionsError::Io(e) => write!(f, "IO error: {}", e),
            OptionsError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for OptionsError {}

/// Load options from a TOML file.
///
/// A missing file is not an error: every option has a default.
pub fn load_options(path: &Path) -> Result<ServeOptions, OptionsError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no options file, using defaults");
        return Ok(ServeOptions::default());
    }

    let content = fs::read_to_string(path).map_err(OptionsError::Io)?;
    let options = toml::from_str(&content).map_err(OptionsError::Parse)?;

    Ok(options)
}
