//! Configuration loading
//!
//! Reads a [`RespecConfig`] from YAML or JSON. Every field is optional; the
//! built-in status and MIME tables and the default base URL fill the gaps.
//!
//! ```yaml
//! base_url: "http://www.example.com/"
//! statuses:
//!   client_closed: 499
//! mimes:
//!   csv: "text/csv"
//! ```

use std::path::Path;

use respec_application::RespecConfig;
use thiserror::Error;
use tracing::debug;

use crate::serialization::{SerializationError, from_json};

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// YAML parsing failed.
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing failed.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] SerializationError),

    /// The file extension names no supported format.
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// The values parsed but are inconsistent.
    #[error(transparent)]
    Invalid(#[from] respec_application::ApplicationError),
}

/// Parses and validates a YAML configuration.
///
/// # Errors
///
/// Returns [`ConfigError::Yaml`] or [`ConfigError::Invalid`].
pub fn config_from_yaml(source: &str) -> Result<RespecConfig, ConfigError> {
    let config: RespecConfig = serde_yaml::from_str(source)?;
    config.validate()?;
    Ok(config)
}

/// Parses and validates a JSON configuration.
///
/// # Errors
///
/// Returns [`ConfigError::Json`] or [`ConfigError::Invalid`].
pub fn config_from_json(source: &str) -> Result<RespecConfig, ConfigError> {
    let config: RespecConfig = from_json(source)?;
    config.validate()?;
    Ok(config)
}

/// Loads a configuration file; `.yaml`/`.yml` or `.json` selects the format.
///
/// # Errors
///
/// Returns an error if the file cannot be read, its extension is not
/// supported, or its content does not parse or validate.
pub fn load_config(path: impl AsRef<Path>) -> Result<RespecConfig, ConfigError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let parse: fn(&str) -> Result<RespecConfig, ConfigError> = match extension.as_str() {
        "yaml" | "yml" => config_from_yaml,
        "json" => config_from_json,
        _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    };

    let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config = parse(&source)?;
    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}
