//! Equality matchers

use respec_application::Matcher;
use respec_domain::Value;

/// Exact JSON equality: `404` and `"404"` differ.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictEquality;

impl Matcher for StrictEquality {
    fn equals(&self, actual: &Value, expected: &Value) -> bool {
        actual == expected
    }
}

/// Compares scalars by their string form, so `404` equals `"404"` and `true`
/// equals `"true"`. Arrays and objects are compared element-wise with the same
/// rule. `null` only equals `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientEquality;

impl Matcher for LenientEquality {
    fn equals(&self, actual: &Value, expected: &Value) -> bool {
        lenient_eq(actual, expected)
    }
}

fn lenient_eq(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Null, Value::Null) => true,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| lenient_eq(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| lenient_eq(x, y)))
        }
        (a, b) => match (scalar_text(a), scalar_text(b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
