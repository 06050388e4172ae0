//! Record serializers for structured-data renders.
//!
//! The default serializer of a format is picked by its extension through
//! [`DefaultSerializers`].

mod json;
mod xml;

use std::sync::Arc;

use indexmap::IndexMap;
use respec_application::{RecordSerializer, SerializerSet};

pub use json::{JsonSerializer, SerializationError, from_json};
pub use xml::XmlSerializer;

/// Format extension → serializer, with `xml` and `json` registered.
#[derive(Clone)]
pub struct DefaultSerializers {
    by_format: IndexMap<String, Arc<dyn RecordSerializer>>,
}

impl Default for DefaultSerializers {
    fn default() -> Self {
        Self::new()
            .with_format("xml", XmlSerializer::new())
            .with_format("json", JsonSerializer::new())
    }
}

impl DefaultSerializers {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_format: IndexMap::new(),
        }
    }

    /// Registers or replaces the serializer for `extension`.
    #[must_use]
    pub fn with_format(
        mut self,
        extension: impl Into<String>,
        serializer: impl RecordSerializer + 'static,
    ) -> Self {
        self.by_format.insert(extension.into(), Arc::new(serializer));
        self
    }

    /// Registered extensions.
    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.by_format.keys().map(String::as_str)
    }
}

impl SerializerSet for DefaultSerializers {
    fn for_format(&self, extension: &str) -> Option<Arc<dyn RecordSerializer>> {
        self.by_format.get(extension).cloned()
    }
}

impl std::fmt::Debug for DefaultSerializers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultSerializers")
            .field("formats", &self.by_format.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_cover_xml_and_json() {
        let set = DefaultSerializers::default();
        assert_eq!(set.formats().collect::<Vec<_>>(), ["xml", "json"]);
        assert!(set.for_format("yaml").is_none());

        let json = set.for_format("json").unwrap();
        assert_eq!(json.serialize("foo", &json!({"id": 1})).unwrap(), r#"{"id":1}"#);
    }

    #[test]
    fn test_override_format() {
        let set = DefaultSerializers::default().with_format("json", JsonSerializer::with_root());
        let json = set.for_format("json").unwrap();
        assert_eq!(json.serialize("foo", &json!(1)).unwrap(), r#"{"foo":1}"#);
    }
}
