//! Content types: format extensions and their MIME types.

use indexmap::IndexMap;
use mime::Mime;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Extension used when a template declaration names no format.
pub const DEFAULT_FORMAT: &str = "html";

/// Extension used when a structured-data declaration names no format.
pub const DEFAULT_STRUCTURED_FORMAT: &str = "xml";

/// Web formats whose MIME type differs from, or is missing in, the generic
/// extension database.
const BUILTIN_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("text", "text/plain"),
    ("js", "text/javascript"),
    ("css", "text/css"),
    ("ics", "text/calendar"),
    ("csv", "text/csv"),
    ("xml", "application/xml"),
    ("rss", "application/rss+xml"),
    ("atom", "application/atom+xml"),
    ("yaml", "application/x-yaml"),
    ("json", "application/json"),
    ("multipart_form", "multipart/form-data"),
    ("url_encoded_form", "application/x-www-form-urlencoded"),
];

/// How a declaration states the expected content type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContentTypeSpecifier {
    /// No format given: the declaration family decides (HTML or XML).
    #[default]
    Default,
    /// A format extension such as `xml` or `json`.
    Extension(String),
}

impl ContentTypeSpecifier {
    /// Returns the extension to look up, falling back to `default`.
    #[must_use]
    pub fn extension_or<'a>(&'a self, default: &'a str) -> &'a str {
        match self {
            Self::Default => default,
            Self::Extension(ext) => ext,
        }
    }
}

impl From<&str> for ContentTypeSpecifier {
    fn from(value: &str) -> Self {
        let ext = value.trim().trim_start_matches([':', '.']).to_ascii_lowercase();
        Self::Extension(ext)
    }
}

impl From<String> for ContentTypeSpecifier {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

/// Extension → MIME type lookup.
///
/// Resolution order: custom entries, the built-in web formats, then the
/// `mime_guess` extension database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MimeTable {
    custom: IndexMap<String, String>,
}

impl MimeTable {
    /// Creates a table with only the built-in formats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a custom format.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidMimeType`] if `mime_type` does not parse.
    pub fn with_type(mut self, extension: impl Into<String>, mime_type: &str) -> DomainResult<Self> {
        let extension = extension.into();
        if mime_type.parse::<Mime>().is_err() {
            return Err(DomainError::InvalidMimeType {
                extension,
                value: mime_type.to_string(),
            });
        }
        self.custom.insert(extension, mime_type.to_string());
        Ok(self)
    }

    /// Checks that every custom entry parses.
    ///
    /// # Errors
    ///
    /// Returns the first invalid entry.
    pub fn validate(&self) -> DomainResult<()> {
        match self
            .custom
            .iter()
            .find(|(_, value)| value.parse::<Mime>().is_err())
        {
            Some((extension, value)) => Err(DomainError::InvalidMimeType {
                extension: extension.clone(),
                value: value.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Looks up the MIME type for an extension.
    #[must_use]
    pub fn lookup(&self, extension: &str) -> Option<Mime> {
        let extension = extension.trim_start_matches('.');
        if let Some(custom) = self.custom.get(extension) {
            return custom.parse().ok();
        }
        BUILTIN_TYPES
            .iter()
            .find(|(ext, _)| *ext == extension)
            .and_then(|(_, mime)| mime.parse().ok())
            .or_else(|| mime_guess::from_ext(extension).first())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_web_formats() {
        let table = MimeTable::new();
        assert_eq!(table.lookup("html").unwrap().essence_str(), "text/html");
        assert_eq!(table.lookup("xml").unwrap().essence_str(), "application/xml");
        assert_eq!(table.lookup("json").unwrap().essence_str(), "application/json");
        assert_eq!(table.lookup("rss").unwrap().essence_str(), "application/rss+xml");
    }

    #[test]
    fn test_falls_back_to_extension_database() {
        let table = MimeTable::new();
        assert_eq!(table.lookup("png").unwrap().essence_str(), "image/png");
        assert!(table.lookup("definitely-not-a-format").is_none());
    }

    #[test]
    fn test_custom_types_override() {
        let table = MimeTable::new()
            .with_type("xml", "text/xml")
            .unwrap()
            .with_type("ndjson", "application/x-ndjson")
            .unwrap();
        assert_eq!(table.lookup("xml").unwrap().essence_str(), "text/xml");
        assert_eq!(
            table.lookup("ndjson").unwrap().essence_str(),
            "application/x-ndjson"
        );
    }

    #[test]
    fn test_invalid_custom_type_rejected() {
        let result = MimeTable::new().with_type("bad", "not a mime");
        assert!(matches!(result, Err(DomainError::InvalidMimeType { .. })));
    }

    #[test]
    fn test_specifier_normalizes_extension() {
        assert_eq!(
            ContentTypeSpecifier::from(":XML"),
            ContentTypeSpecifier::Extension("xml".into())
        );
        assert_eq!(ContentTypeSpecifier::Default.extension_or(DEFAULT_FORMAT), "html");
        assert_eq!(ContentTypeSpecifier::from("json").extension_or(DEFAULT_FORMAT), "json");
    }
}
