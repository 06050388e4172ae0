//! Value-set expander
//!
//! Turns an ordered `name → Expected` map into one check per entry. All the
//! checks share the declaration's [`ActionScope`] and differ only in which
//! value they resolve and how they compare it.

use std::sync::Arc;

use respec_domain::{Check, CheckError, Expectations, Expected, ResolutionError, Value, ValuePath};

use crate::memoizer::ActionScope;
use crate::ports::{Matcher, ResponseLike};

/// The keyed state families an expectation map can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateFamily {
    /// State assigned by the action for its view.
    Assigns,
    /// Flash entries.
    Flash,
    /// Session entries.
    Session,
    /// Response headers.
    Headers,
}

/// What the response holds for one key.
#[derive(Debug, Clone, PartialEq)]
pub struct Observed {
    /// The value, `None` when the key is absent.
    pub value: Option<Value>,
    /// Whether the key is structurally present.
    pub present: bool,
}

impl StateFamily {
    /// Description of the check for `key`.
    #[must_use]
    pub fn describe(self, key: &str) -> String {
        match self {
            Self::Assigns => format!("assigns {key}"),
            Self::Flash => format!("assigns flash[{key:?}]"),
            Self::Session => format!("assigns session[{key:?}]"),
            Self::Headers => format!("assigns {key:?} header"),
        }
    }

    /// How the key is named in failure messages.
    #[must_use]
    pub fn subject(self, key: &str) -> String {
        match self {
            Self::Assigns => format!("@{key}"),
            Self::Flash => format!("flash[{key:?}]"),
            Self::Session => format!("session[{key:?}]"),
            Self::Headers => format!("header {key:?}"),
        }
    }

    /// Resolves `key` against a response.
    pub fn observe<R: ResponseLike + ?Sized>(self, response: &R, key: &str) -> Observed {
        let state = match self {
            Self::Assigns => response.assigns(),
            Self::Flash => response.flash(),
            Self::Session => response.session(),
            Self::Headers => {
                let value = response.header(key).map(|v| Value::String(v.to_string()));
                return Observed {
                    present: value.is_some(),
                    value,
                };
            }
        };
        Observed {
            value: state.get(key).cloned(),
            present: state.contains(key),
        }
    }
}

/// Expands every entry into its own check, in insertion order.
pub fn expand<R>(
    family: StateFamily,
    expectations: Expectations,
    scope: &Arc<ActionScope<R>>,
    matcher: &Arc<dyn Matcher>,
) -> Vec<Check>
where
    R: ResponseLike + 'static,
{
    expectations
        .into_iter()
        .map(|(key, expected)| entry_check(family, key, expected, scope, matcher))
        .collect()
}

/// Builds the check for a single entry.
pub fn entry_check<R>(
    family: StateFamily,
    key: String,
    expected: Expected,
    scope: &Arc<ActionScope<R>>,
    matcher: &Arc<dyn Matcher>,
) -> Check
where
    R: ResponseLike + 'static,
{
    let scope = Arc::clone(scope);
    let matcher = Arc::clone(matcher);
    Check::new(family.describe(&key), move || {
        let response = scope.perform()?;
        let observed = family.observe(&*response, &key);
        verify(
            &family.subject(&key),
            &expected,
            observed,
            &scope,
            matcher.as_ref(),
        )
    })
}

/// Applies the comparison rules of one specifier.
///
/// # Errors
///
/// Returns an assertion or absence failure when the observation does not
/// satisfy `expected`, or a resolution error when the expected value itself
/// cannot be computed.
pub fn verify<R>(
    subject: &str,
    expected: &Expected,
    observed: Observed,
    scope: &ActionScope<R>,
    matcher: &dyn Matcher,
) -> Result<(), CheckError> {
    match expected {
        Expected::Value(value) => compare(subject, observed, value, matcher),
        Expected::NotNil => match observed.value {
            Some(Value::Null) => Err(CheckError::assertion(format!(
                "expected {subject} not to be nil, got null"
            ))),
            Some(_) => Ok(()),
            None => Err(CheckError::Absence {
                subject: subject.to_string(),
                expected_absent: false,
            }),
        },
        Expected::Undefined => {
            if observed.present {
                Err(CheckError::Absence {
                    subject: subject.to_string(),
                    expected_absent: true,
                })
            } else {
                Ok(())
            }
        }
        Expected::Reference(name) => {
            let expected = resolve_reference(name, scope)?;
            compare(subject, observed, &expected, matcher)
        }
        Expected::Deferred(deferred) => {
            let expected = scope.with_context(|ctx| deferred.evaluate(ctx))?;
            compare(subject, observed, &expected, matcher)
        }
    }
}

fn resolve_reference<R>(name: &str, scope: &ActionScope<R>) -> Result<Value, ResolutionError> {
    let path = ValuePath::parse(name).map_err(|err| ResolutionError::new(name, err.to_string()))?;
    scope
        .with_context(|ctx| ctx.resolve(&path).cloned())
        .ok_or_else(|| ResolutionError::undefined(format!("@{path}")))
}

fn compare(
    subject: &str,
    observed: Observed,
    expected: &Value,
    matcher: &dyn Matcher,
) -> Result<(), CheckError> {
    // A missing key reads as null, like an ordinary map lookup.
    let actual = observed.value.unwrap_or(Value::Null);
    if matcher.equals(&actual, expected) {
        Ok(())
    } else {
        Err(CheckError::assertion(format!(
            "expected {subject} to equal {}, got {}",
            matcher.describe(expected),
            matcher.describe(&actual)
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeResponse, StrictMatcher, scope_for, scope_with};
    use pretty_assertions::assert_eq;
    use respec_domain::{Context, Outcome};
    use serde_json::json;

    fn matcher() -> Arc<dyn Matcher> {
        Arc::new(StrictMatcher)
    }

    #[test]
    fn test_descriptions_per_family() {
        assert_eq!(StateFamily::Assigns.describe("foo"), "assigns foo");
        assert_eq!(StateFamily::Flash.describe("notice"), "assigns flash[\"notice\"]");
        assert_eq!(StateFamily::Session.describe("user"), "assigns session[\"user\"]");
        assert_eq!(StateFamily::Headers.describe("Location"), "assigns \"Location\" header");
    }

    #[test]
    fn test_one_check_per_entry_in_order() {
        let scope = scope_for(FakeResponse::default(), Context::new());
        let expectations = Expectations::new()
            .with("notice", Expected::value("Saved"))
            .with("error", Expected::Undefined)
            .with("alert", Expected::NotNil);

        let checks = expand(StateFamily::Flash, expectations, &scope, &matcher());
        let descriptions: Vec<_> = checks.iter().map(Check::description).collect();
        assert_eq!(
            descriptions,
            [
                "assigns flash[\"notice\"]",
                "assigns flash[\"error\"]",
                "assigns flash[\"alert\"]",
            ]
        );
        assert_eq!(scope.invocations(), 0);
    }

    #[test]
    fn test_not_nil_rules() {
        let response = FakeResponse::default()
            .assign("null_foo", Value::Null)
            .assign("five", json!(5));
        let scope = scope_for(response, Context::new());
        let expectations = Expectations::new()
            .with("null_foo", Expected::NotNil)
            .with("five", Expected::NotNil)
            .with("missing", Expected::NotNil);

        let outcomes: Vec<_> = expand(StateFamily::Assigns, expectations, &scope, &matcher())
            .iter()
            .map(Check::run)
            .collect();
        assert!(outcomes[0].is_fail());
        assert!(outcomes[1].is_pass());
        assert!(matches!(
            &outcomes[2],
            Outcome::Fail(CheckError::Absence { expected_absent: false, .. })
        ));
    }

    #[test]
    fn test_undefined_distinguishes_null_from_absent() {
        let response = FakeResponse::default().assign("foo", Value::Null);
        let scope = scope_for(response, Context::new());
        let expectations = Expectations::new()
            .with("foo", Expected::Undefined)
            .with("bar", Expected::Undefined);

        let checks = expand(StateFamily::Assigns, expectations, &scope, &matcher());
        assert!(matches!(
            checks[0].run(),
            Outcome::Fail(CheckError::Absence { expected_absent: true, .. })
        ));
        assert!(checks[1].run().is_pass());
    }

    #[test]
    fn test_concrete_null_accepts_missing_key() {
        let response = FakeResponse::default().flash("set", json!("x"));
        let scope = scope_for(response, Context::new());
        let expectations = Expectations::new()
            .with("missing", Expected::nil())
            .with("set", Expected::nil());

        let checks = expand(StateFamily::Flash, expectations, &scope, &matcher());
        assert!(checks[0].run().is_pass());
        let outcome = checks[1].run();
        assert_eq!(
            outcome.reason().map(ToString::to_string).as_deref(),
            Some("expected flash[\"set\"] to equal null, got \"x\"")
        );
    }

    #[test]
    fn test_reference_resolves_from_context() {
        let response = FakeResponse::default().assign("foo", json!({"id": 1}));
        let context = Context::new().with("foo", json!({"id": 1})).with("bar", json!(2));
        let scope = scope_for(response, context);
        let expectations = Expectations::new()
            .with("foo", Expected::reference("foo"))
            .with("missing", Expected::reference("bar"))
            .with("foo", Expected::reference("foo"));

        let checks = expand(StateFamily::Assigns, expectations, &scope, &matcher());
        assert_eq!(checks.len(), 2);
        assert!(checks[0].run().is_pass());
        assert!(checks[1].run().is_fail());

        let unresolved = entry_check(
            StateFamily::Assigns,
            "foo".into(),
            Expected::reference("nope"),
            &scope,
            &matcher(),
        );
        assert!(matches!(
            unresolved.run(),
            Outcome::Error(CheckError::Resolution(_))
        ));
    }

    #[test]
    fn test_deferred_sees_context_after_action() {
        let response = FakeResponse::default().session("user_id", json!(9));
        let scope = scope_with(response, Context::new(), |ctx| {
            ctx.set("user", json!({"id": 9}));
        });
        let check = entry_check(
            StateFamily::Session,
            "user_id".into(),
            Expected::deferred(|ctx| {
                ctx.get_path("user", &["id"])
                    .cloned()
                    .ok_or_else(|| ResolutionError::undefined("user.id"))
            }),
            &scope,
            &matcher(),
        );
        assert!(check.run().is_pass());
    }

    #[test]
    fn test_headers_family() {
        let response = FakeResponse::default().header("Location", "http://x");
        let scope = scope_for(response, Context::new());
        let expectations = Expectations::new()
            .with("location", Expected::value("http://x"))
            .with("X-Missing", Expected::Undefined)
            .with("Location", Expected::value("http://y"));

        let checks = expand(StateFamily::Headers, expectations, &scope, &matcher());
        assert!(checks[0].run().is_pass());
        assert!(checks[1].run().is_pass());
        assert!(checks[2].run().is_fail());
        assert_eq!(scope.invocations(), 1);
    }
}
