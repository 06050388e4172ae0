//! Expected-value specifiers
//!
//! Each named entry of a flash/session/header/assigned-state declaration
//! carries one [`Expected`] describing what the actual value must look like.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::context::Context;
use crate::error::ResolutionError;

/// Signature of a deferred expectation: computed from the context when the
/// check runs, not when it is declared.
pub type DeferredFn = dyn Fn(&Context) -> Result<Value, ResolutionError> + Send + Sync;

/// A lazily evaluated expected value.
#[derive(Clone)]
pub struct DeferredValue {
    label: Option<String>,
    compute: Arc<DeferredFn>,
}

impl DeferredValue {
    /// Wraps a closure.
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn(&Context) -> Result<Value, ResolutionError> + Send + Sync + 'static,
    {
        Self {
            label: None,
            compute: Arc::new(compute),
        }
    }

    /// Wraps a closure with a label used in failure messages.
    pub fn labeled<F>(label: impl Into<String>, compute: F) -> Self
    where
        F: Fn(&Context) -> Result<Value, ResolutionError> + Send + Sync + 'static,
    {
        Self {
            label: Some(label.into()),
            compute: Arc::new(compute),
        }
    }

    /// Evaluates the closure against the context.
    ///
    /// # Errors
    ///
    /// Propagates the closure's [`ResolutionError`].
    pub fn evaluate(&self, context: &Context) -> Result<Value, ResolutionError> {
        (self.compute)(context)
    }

    /// Returns the label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl fmt::Debug for DeferredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredValue")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// What a named value must be.
#[derive(Debug, Clone)]
pub enum Expected {
    /// Must equal this value. A `null` here also accepts a missing key.
    Value(Value),
    /// Must be present and not `null`.
    NotNil,
    /// The key must be structurally absent.
    Undefined,
    /// Must equal the context value at this (possibly dotted) name.
    Reference(String),
    /// Must equal the value computed at check time.
    Deferred(DeferredValue),
}

impl Expected {
    /// Concrete value expectation.
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// Expects `null` (or a missing key).
    #[must_use]
    pub const fn nil() -> Self {
        Self::Value(Value::Null)
    }

    /// Expects the same value as the named context entry.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference(name.into())
    }

    /// Expects the value produced by `compute` when the check runs.
    pub fn deferred<F>(compute: F) -> Self
    where
        F: Fn(&Context) -> Result<Value, ResolutionError> + Send + Sync + 'static,
    {
        Self::Deferred(DeferredValue::new(compute))
    }

    /// Short description used in failure messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Value(value) => value.to_string(),
            Self::NotNil => "not nil".to_string(),
            Self::Undefined => "undefined".to_string(),
            Self::Reference(name) => format!("@{name}"),
            Self::Deferred(deferred) => deferred
                .label()
                .map_or_else(|| "<deferred>".to_string(), ToString::to_string),
        }
    }
}

/// Ordered `name → Expected` entries of one declaration.
///
/// Entries expand in insertion order. Inserting an existing name replaces its
/// specifier and keeps the original position.
#[derive(Debug, Clone, Default)]
pub struct Expectations {
    entries: IndexMap<String, Expected>,
}

impl Expectations {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry (builder pattern).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, expected: Expected) -> Self {
        self.insert(name, expected);
        self
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, name: impl Into<String>, expected: Expected) -> Option<Expected> {
        self.entries.insert(name.into(), expected)
    }

    /// Looks up the specifier for a name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Expected> {
        self.entries.get(name)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expected)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, Expected)> for Expectations {
    fn from_iter<T: IntoIterator<Item = (K, Expected)>>(iter: T) -> Self {
        let mut expectations = Self::new();
        for (name, expected) in iter {
            expectations.insert(name, expected);
        }
        expectations
    }
}

impl IntoIterator for Expectations {
    type Item = (String, Expected);
    type IntoIter = indexmap::map::IntoIter<String, Expected>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_insertion_order_is_kept() {
        let expectations = Expectations::new()
            .with("notice", Expected::value("Saved"))
            .with("error", Expected::Undefined)
            .with("alert", Expected::NotNil);

        let names: Vec<_> = expectations.names().collect();
        assert_eq!(names, ["notice", "error", "alert"]);
    }

    #[test]
    fn test_reinsert_replaces_in_place() {
        let mut expectations = Expectations::new()
            .with("a", Expected::NotNil)
            .with("b", Expected::NotNil);
        let previous = expectations.insert("a", Expected::Undefined);

        assert!(matches!(previous, Some(Expected::NotNil)));
        assert_eq!(expectations.len(), 2);
        assert_eq!(expectations.names().next(), Some("a"));
        assert!(matches!(expectations.get("a"), Some(Expected::Undefined)));
    }

    #[test]
    fn test_deferred_evaluates_against_context() {
        let expected = Expected::deferred(|ctx| {
            ctx.get("user_id")
                .cloned()
                .ok_or_else(|| ResolutionError::undefined("user_id"))
        });
        let Expected::Deferred(deferred) = expected else {
            unreachable!("constructor builds a deferred value");
        };

        let ctx = Context::new().with("user_id", 42);
        assert_eq!(deferred.evaluate(&ctx), Ok(json!(42)));
        assert!(deferred.evaluate(&Context::new()).is_err());
    }

    #[test]
    fn test_describe() {
        assert_eq!(Expected::value("x").describe(), "\"x\"");
        assert_eq!(Expected::nil().describe(), "null");
        assert_eq!(Expected::NotNil.describe(), "not nil");
        assert_eq!(Expected::reference("foo").describe(), "@foo");
        let labeled = Expected::Deferred(DeferredValue::labeled("user id", |_| Ok(json!(1))));
        assert_eq!(labeled.describe(), "user id");
    }

    #[test]
    fn test_from_iterator() {
        let expectations: Expectations = [("x", Expected::NotNil), ("y", Expected::Undefined)]
            .into_iter()
            .collect();
        assert_eq!(expectations.len(), 2);
    }
}
