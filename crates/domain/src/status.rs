//! HTTP status codes, reason phrases and symbolic status names.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Canonical reason phrases. Symbolic names (`not_found`, `unprocessable_entity`)
/// are derived from these by snake-casing.
const STATUS_CODES: &[(u16, &str)] = &[
    (100, "Continue"),
    (101, "Switching Protocols"),
    (102, "Processing"),
    (200, "OK"),
    (201, "Created"),
    (202, "Accepted"),
    (203, "Non-Authoritative Information"),
    (204, "No Content"),
    (205, "Reset Content"),
    (206, "Partial Content"),
    (207, "Multi-Status"),
    (226, "IM Used"),
    (300, "Multiple Choices"),
    (301, "Moved Permanently"),
    (302, "Found"),
    (303, "See Other"),
    (304, "Not Modified"),
    (305, "Use Proxy"),
    (307, "Temporary Redirect"),
    (308, "Permanent Redirect"),
    (400, "Bad Request"),
    (401, "Unauthorized"),
    (402, "Payment Required"),
    (403, "Forbidden"),
    (404, "Not Found"),
    (405, "Method Not Allowed"),
    (406, "Not Acceptable"),
    (407, "Proxy Authentication Required"),
    (408, "Request Timeout"),
    (409, "Conflict"),
    (410, "Gone"),
    (411, "Length Required"),
    (412, "Precondition Failed"),
    (413, "Request Entity Too Large"),
    (414, "Request-URI Too Long"),
    (415, "Unsupported Media Type"),
    (416, "Requested Range Not Satisfiable"),
    (417, "Expectation Failed"),
    (422, "Unprocessable Entity"),
    (423, "Locked"),
    (424, "Failed Dependency"),
    (426, "Upgrade Required"),
    (429, "Too Many Requests"),
    (500, "Internal Server Error"),
    (501, "Not Implemented"),
    (502, "Bad Gateway"),
    (503, "Service Unavailable"),
    (504, "Gateway Timeout"),
    (505, "HTTP Version Not Supported"),
    (507, "Insufficient Storage"),
    (510, "Not Extended"),
];

/// HTTP status code with semantic helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// Creates a new `StatusCode`.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns true if this is a 2xx success status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns true if this is a 3xx redirection status.
    #[must_use]
    pub const fn is_redirection(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }

    /// Returns the canonical reason phrase, if the code is known.
    #[must_use]
    pub fn reason_phrase(&self) -> Option<&'static str> {
        STATUS_CODES
            .iter()
            .find(|(code, _)| *code == self.0)
            .map(|(_, reason)| *reason)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason_phrase() {
            Some(reason) => write!(f, "{} {reason}", self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// Converts a reason phrase to its symbolic name: `"Not Found"` → `not_found`.
fn symbol_for(reason: &str) -> String {
    reason
        .chars()
        .filter_map(|c| match c {
            ' ' | '-' => Some('_'),
            c if c.is_ascii_alphanumeric() => Some(c.to_ascii_lowercase()),
            _ => None,
        })
        .collect()
}

/// How a declaration states the expected status.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusSpecifier {
    /// No status given: any 2xx passes.
    #[default]
    Success,
    /// Exact numeric code.
    Code(u16),
    /// Symbolic name resolved through a [`StatusTable`].
    Named(String),
}

impl StatusSpecifier {
    /// Symbolic status, e.g. `StatusSpecifier::named("not_found")`.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

impl From<u16> for StatusSpecifier {
    fn from(code: u16) -> Self {
        Self::Code(code)
    }
}

impl From<&str> for StatusSpecifier {
    /// Digits become a code, anything else a symbolic name.
    fn from(value: &str) -> Self {
        let value = value.trim().trim_start_matches(':');
        value
            .parse::<u16>()
            .map_or_else(|_| Self::Named(value.to_string()), Self::Code)
    }
}

impl FromStr for StatusSpecifier {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// Symbolic status names → numeric codes.
///
/// The built-in names cover every code in the reason-phrase table; custom
/// entries are consulted first and may override them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusTable {
    custom: IndexMap<String, u16>,
}

impl StatusTable {
    /// Creates a table with only the built-in names.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an extra name (builder pattern).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>, code: u16) -> Self {
        self.custom.insert(name.into(), code);
        self
    }

    /// Resolves a symbolic name to its code.
    #[must_use]
    pub fn code_for(&self, name: &str) -> Option<u16> {
        let name = name.trim_start_matches(':');
        self.custom.get(name).copied().or_else(|| {
            STATUS_CODES
                .iter()
                .find(|(_, reason)| symbol_for(reason) == name)
                .map(|(code, _)| *code)
        })
    }

    /// Returns the reason phrase for a code, if known.
    #[must_use]
    pub fn reason_for(&self, code: u16) -> Option<&'static str> {
        StatusCode::new(code).reason_phrase()
    }
}
