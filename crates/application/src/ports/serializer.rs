//! Record serializer ports

use std::sync::Arc;

use respec_domain::{ResolutionError, Value};

/// Turns a context record into the text a structured response should contain.
pub trait RecordSerializer: Send + Sync {
    /// Serializes `record`; `name` is the record's name (the last path segment).
    ///
    /// # Errors
    ///
    /// Returns a [`ResolutionError`] if the record cannot be represented.
    fn serialize(&self, name: &str, record: &Value) -> Result<String, ResolutionError>;
}

/// Default serializers, keyed by format extension.
pub trait SerializerSet: Send + Sync {
    /// Returns the serializer for `extension` (e.g. `xml`, `json`).
    fn for_format(&self, extension: &str) -> Option<Arc<dyn RecordSerializer>>;
}
