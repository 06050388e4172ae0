//! Checks: independently reported units derived from a declaration.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CheckError;

/// Body of a check. Runs the action (through the memoizer) and asserts.
pub type CheckFn = dyn Fn() -> Result<(), CheckError> + Send + Sync;

/// A described, deferred assertion.
///
/// Nothing runs when a check is built; [`Check::run`] executes the closure.
#[derive(Clone)]
pub struct Check {
    description: String,
    body: Arc<CheckFn>,
}

impl Check {
    /// Creates a check from a description and its body.
    pub fn new<F>(description: impl Into<String>, body: F) -> Self
    where
        F: Fn() -> Result<(), CheckError> + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            body: Arc::new(body),
        }
    }

    /// Human-readable description, e.g. `renders index`.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Executes the check.
    #[must_use]
    pub fn run(&self) -> Outcome {
        Outcome::from((self.body)())
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Result of running one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    /// The assertion held.
    Pass,
    /// The assertion did not hold.
    Fail(CheckError),
    /// The check could not be evaluated.
    Error(CheckError),
}

impl Outcome {
    /// Returns true for [`Outcome::Pass`].
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns true for [`Outcome::Fail`].
    #[must_use]
    pub const fn is_fail(&self) -> bool {
        matches!(self, Self::Fail(_))
    }

    /// Returns true for [`Outcome::Error`].
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The failure or error cause, if any.
    #[must_use]
    pub const fn reason(&self) -> Option<&CheckError> {
        match self {
            Self::Pass => None,
            Self::Fail(reason) | Self::Error(reason) => Some(reason),
        }
    }
}

impl From<Result<(), CheckError>> for Outcome {
    fn from(result: Result<(), CheckError>) -> Self {
        match result {
            Ok(()) => Self::Pass,
            Err(err) if err.is_failure() => Self::Fail(err),
            Err(err) => Self::Error(err),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => f.write_str("pass"),
            Self::Fail(reason) => write!(f, "fail: {reason}"),
            Self::Error(reason) => write!(f, "error: {reason}"),
        }
    }
}
