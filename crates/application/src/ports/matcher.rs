//! Equality matcher port

use respec_domain::Value;

/// Decides whether an actual value satisfies an expected one.
///
/// The expansion engine only decides which comparisons to make; the
/// comparison itself is delegated here.
pub trait Matcher: Send + Sync {
    /// Returns true if `actual` equals `expected`.
    fn equals(&self, actual: &Value, expected: &Value) -> bool;

    /// Renders a value for failure messages.
    fn describe(&self, value: &Value) -> String {
        value.to_string()
    }
}
