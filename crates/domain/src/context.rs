//! Example context
//!
//! The context is the example's own named state: records created by fixtures,
//! values stored by the action under test, anything an expectation may refer to.
//! A key that was never set is absent (`None`), which is different from a key
//! holding `null`.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
pub use serde_json::Value;

use crate::error::{DomainError, DomainResult};

/// Named values visible to deferred expressions and references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    values: IndexMap<String, Value>,
}

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value (builder pattern).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a value, returning the previous one if any.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    /// Removes a value, making the name undefined again.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.shift_remove(name)
    }

    /// Looks up a top-level value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns true if the name is defined, even when it holds `null`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Walks `path` starting at the value named `root`.
    ///
    /// Object members are looked up by key, array elements by decimal index.
    /// Returns `None` as soon as a step cannot be taken.
    #[must_use]
    pub fn get_path<S: AsRef<str>>(&self, root: &str, path: &[S]) -> Option<&Value> {
        path.iter()
            .try_fold(self.get(root)?, |current, segment| step(current, segment.as_ref()))
    }

    /// Resolves a dotted path such as `foo.errors`.
    #[must_use]
    pub fn resolve(&self, path: &ValuePath) -> Option<&Value> {
        self.get_path(path.root(), path.rest())
    }

    /// Number of defined names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over names and values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn step<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// A dotted path into the context: a root name followed by member steps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ValuePath {
    segments: Vec<String>,
}

impl ValuePath {
    /// Parses `foo` or `foo.errors.base`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPath`] if the path or any segment is empty.
    pub fn parse(input: &str) -> DomainResult<Self> {
        let segments: Vec<String> = input.split('.').map(str::trim).map(String::from).collect();
        if segments.iter().any(String::is_empty) {
            return Err(DomainError::InvalidPath(input.to_string()));
        }
        Ok(Self { segments })
    }

    /// The context name the path starts from.
    #[must_use]
    pub fn root(&self) -> &str {
        // parse() guarantees at least one segment
        self.segments.first().map_or("", String::as_str)
    }

    /// The member steps after the root.
    #[must_use]
    pub fn rest(&self) -> &[String] {
        self.segments.get(1..).unwrap_or_default()
    }

    /// The last segment, used to name serialized records.
    #[must_use]
    pub fn leaf(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Returns true for a bare name without member steps.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.segments.len() == 1
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl TryFrom<String> for ValuePath {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ValuePath> for String {
    fn from(path: ValuePath) -> Self {
        path.to_string()
    }
}
