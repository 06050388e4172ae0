//! JSON serialization helpers and the JSON record serializer.

use respec_application::RecordSerializer;
use respec_domain::{ResolutionError, Value};
use serde::de::DeserializeOwned;

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),

    /// XML writing failed.
    #[error("XML serialization failed: {0}")]
    Xml(String),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl From<SerializationError> for ResolutionError {
    fn from(err: SerializationError) -> Self {
        Self::new("record", err.to_string())
    }
}

/// Deserializes JSON from a string.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, SerializationError> {
    serde_json::from_str(json).map_err(SerializationError::Deserialize)
}

/// Compact JSON rendering of a record, as a JSON API would respond with it.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer {
    include_root: bool,
}

impl JsonSerializer {
    /// Serializes the record alone.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            include_root: false,
        }
    }

    /// Wraps the record in an object keyed by its name: `{"foo": {...}}`.
    #[must_use]
    pub const fn with_root() -> Self {
        Self { include_root: true }
    }

    /// Renders `record`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render(&self, name: &str, record: &Value) -> Result<String, SerializationError> {
        if self.include_root {
            let mut root = serde_json::Map::new();
            root.insert(name.to_string(), record.clone());
            Ok(serde_json::to_string(&root)?)
        } else {
            Ok(serde_json::to_string(record)?)
        }
    }
}

impl RecordSerializer for JsonSerializer {
    fn serialize(&self, name: &str, record: &Value) -> Result<String, ResolutionError> {
        Ok(self.render(name, record)?)
    }
}
