//! Domain error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors detected while a declaration is being built or validated.
///
/// These surface at registration time, before any check exists.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A name (assigned state key, template, header...) is empty.
    #[error("empty name in {0} declaration")]
    EmptyName(&'static str),

    /// A dotted value path is malformed.
    #[error("invalid value path: {0:?}")]
    InvalidPath(String),

    /// A declaration carries nothing to check.
    #[error("{0} declaration has no entries")]
    EmptyDeclaration(&'static str),

    /// A MIME type string could not be parsed.
    #[error("invalid MIME type for extension {extension:?}: {value:?}")]
    InvalidMimeType {
        /// Extension the type was registered under.
        extension: String,
        /// The rejected MIME string.
        value: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// The action under test returned an error.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ActionError {
    message: String,
}

impl ActionError {
    /// Creates an action error from any displayable cause.
    pub fn new(cause: impl std::fmt::Display) -> Self {
        Self {
            message: cause.to_string(),
        }
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A named reference, path, table entry or serializer could not be resolved
/// while a check was running.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("cannot resolve {subject}: {reason}")]
pub struct ResolutionError {
    /// What was being resolved (e.g. `foo.errors`, `status :bogus`).
    pub subject: String,
    /// Why it failed.
    pub reason: String,
}

impl ResolutionError {
    /// Creates a new resolution error.
    pub fn new(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            reason: reason.into(),
        }
    }

    /// The subject is not defined in the context.
    pub fn undefined(subject: impl Into<String>) -> Self {
        Self::new(subject, "not defined")
    }
}

/// Why a single check did not pass.
///
/// `Assertion` and `Absence` are ordinary failures. `Action` and `Resolution`
/// are errors: the check could not decide either way.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckError {
    /// Expected and actual values differ.
    #[error("{message}")]
    Assertion {
        /// Human-readable mismatch description.
        message: String,
    },

    /// A key expected to be undefined is present, or a key expected to be set
    /// is structurally absent.
    #[error("{}", absence_message(subject, *expected_absent))]
    Absence {
        /// The key that was looked up.
        subject: String,
        /// `true` when the key was expected to be undefined.
        expected_absent: bool,
    },

    /// The action under test failed.
    #[error("action failed: {0}")]
    Action(ActionError),

    /// A reference needed by the check could not be resolved.
    #[error(transparent)]
    Resolution(ResolutionError),

    /// The check body panicked.
    #[error("check panicked: {message}")]
    Panicked {
        /// Panic payload text.
        message: String,
    },
}

fn absence_message(subject: &str, expected_absent: bool) -> String {
    if expected_absent {
        format!("expected {subject} to be undefined, but it is present")
    } else {
        format!("expected {subject} to be defined, but it is absent")
    }
}

impl CheckError {
    /// Creates an assertion failure.
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion {
            message: message.into(),
        }
    }

    /// Returns true for plain failures, false for errors.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Assertion { .. } | Self::Absence { .. })
    }
}

/// Text of a panic payload caught with `catch_unwind`.
#[must_use]
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

impl From<ActionError> for CheckError {
    fn from(err: ActionError) -> Self {
        Self::Action(err)
    }
}

impl From<ResolutionError> for CheckError {
    fn from(err: ResolutionError) -> Self {
        Self::Resolution(err)
    }
}
