//! Status and content-type assertion builders
//!
//! The rendered-output declarations derive these checks from their options
//! and register them as siblings of the primary check.

use std::sync::Arc;

use mime::Mime;
use respec_domain::{
    Check, CheckError, ContentTypeSpecifier, MimeTable, ResolutionError, StatusCode,
    StatusSpecifier, StatusTable,
};

use crate::memoizer::ActionScope;
use crate::ports::ResponseLike;

/// Builds the status check for `specifier`.
///
/// An unknown symbolic name still yields a check; running it reports a
/// resolution error without invoking the action.
pub fn status_check<R>(
    specifier: &StatusSpecifier,
    statuses: &StatusTable,
    scope: &Arc<ActionScope<R>>,
) -> Check
where
    R: ResponseLike + 'static,
{
    match specifier {
        StatusSpecifier::Success => {
            let scope = Arc::clone(scope);
            Check::new("is successful", move || {
                scope.perform_with(|response| {
                    if response.is_success() {
                        Ok(())
                    } else {
                        Err(CheckError::assertion(format!(
                            "expected a successful response, got status {}",
                            StatusCode::new(response.status())
                        )))
                    }
                })
            })
        }
        StatusSpecifier::Code(code) => exact_status_check(*code, scope),
        StatusSpecifier::Named(name) => match statuses.code_for(name) {
            Some(code) => exact_status_check(code, scope),
            None => {
                let name = name.clone();
                Check::new(format!("renders with status of unknown {name:?}"), move || {
                    Err(ResolutionError::new(format!("status {name:?}"), "unknown status name").into())
                })
            }
        },
    }
}

fn exact_status_check<R>(code: u16, scope: &Arc<ActionScope<R>>) -> Check
where
    R: ResponseLike + 'static,
{
    let expected = StatusCode::new(code);
    let description = match expected.reason_phrase() {
        Some(reason) => format!("renders with status of {reason:?}"),
        None => format!("renders with status of {code}"),
    };
    let scope = Arc::clone(scope);
    Check::new(description, move || {
        scope.perform_with(|response| {
            let actual = StatusCode::new(response.status());
            if actual.as_u16().to_string() == expected.as_u16().to_string() {
                Ok(())
            } else {
                Err(CheckError::assertion(format!(
                    "expected status {expected}, got {actual}"
                )))
            }
        })
    })
}

/// Builds the content-type check. `default_format` applies when the
/// specifier names no format.
pub fn content_type_check<R>(
    specifier: &ContentTypeSpecifier,
    default_format: &str,
    mimes: &MimeTable,
    scope: &Arc<ActionScope<R>>,
) -> Check
where
    R: ResponseLike + 'static,
{
    let extension = specifier.extension_or(default_format).to_string();
    let Some(expected) = mimes.lookup(&extension) else {
        return Check::new(
            format!("renders with Content-Type of unknown {extension:?}"),
            move || {
                Err(ResolutionError::new(
                    format!("format {extension:?}"),
                    "no MIME type registered",
                )
                .into())
            },
        );
    };

    let expected = expected.essence_str().to_string();
    let scope = Arc::clone(scope);
    Check::new(format!("renders with Content-Type of {expected}"), move || {
        scope.perform_with(|response| match response.content_type() {
            Some(header) if essence(header) == expected => Ok(()),
            Some(header) => Err(CheckError::assertion(format!(
                "expected Content-Type {expected}, got {header}"
            ))),
            None => Err(CheckError::assertion(format!(
                "expected Content-Type {expected}, got none"
            ))),
        })
    })
}

/// `type/subtype` of a header value, parameters dropped.
fn essence(header: &str) -> String {
    header.parse::<Mime>().map_or_else(
        |_| {
            header
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        },
        |mime| mime.essence_str().to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeResponse, scope_for};
    use pretty_assertions::assert_eq;
    use respec_domain::{Context, Outcome};

    #[test]
    fn test_success_status() {
        let ok = scope_for(FakeResponse::default().status(204), Context::new());
        let check = status_check(&StatusSpecifier::Success, &StatusTable::new(), &ok);
        assert_eq!(check.description(), "is successful");
        assert!(check.run().is_pass());

        let missing = scope_for(FakeResponse::default().status(404), Context::new());
        let check = status_check(&StatusSpecifier::Success, &StatusTable::new(), &missing);
        assert!(check.run().is_fail());
    }

    #[test]
    fn test_named_status() {
        let scope = scope_for(FakeResponse::default().status(404), Context::new());
        let check = status_check(&StatusSpecifier::named("not_found"), &StatusTable::new(), &scope);
        assert_eq!(check.description(), "renders with status of \"Not Found\"");
        assert!(check.run().is_pass());

        let check = status_check(&StatusSpecifier::Code(422), &StatusTable::new(), &scope);
        assert_eq!(
            check.run().reason().map(ToString::to_string).as_deref(),
            Some("expected status 422 Unprocessable Entity, got 404 Not Found")
        );
    }

    #[test]
    fn test_custom_and_unknown_status_names() {
        let scope = scope_for(FakeResponse::default().status(499), Context::new());
        let table = StatusTable::new().with_name("client_closed", 499);

        let check = status_check(&StatusSpecifier::named("client_closed"), &table, &scope);
        assert_eq!(check.description(), "renders with status of 499");
        assert!(check.run().is_pass());

        let check = status_check(&StatusSpecifier::named("bogus"), &table, &scope);
        assert_eq!(check.description(), "renders with status of unknown \"bogus\"");
        assert!(matches!(check.run(), Outcome::Error(CheckError::Resolution(_))));
    }

    #[test]
    fn test_content_type_ignores_parameters() {
        let response = FakeResponse::default().header("Content-Type", "text/html; charset=utf-8");
        let scope = scope_for(response, Context::new());
        let check = content_type_check(
            &ContentTypeSpecifier::Default,
            "html",
            &MimeTable::new(),
            &scope,
        );
        assert_eq!(check.description(), "renders with Content-Type of text/html");
        assert!(check.run().is_pass());

        let check =
            content_type_check(&ContentTypeSpecifier::from("xml"), "html", &MimeTable::new(), &scope);
        assert_eq!(check.description(), "renders with Content-Type of application/xml");
        assert!(check.run().is_fail());
    }

    #[test]
    fn test_content_type_missing_header_and_unknown_format() {
        let scope = scope_for(FakeResponse::default(), Context::new());
        let check = content_type_check(
            &ContentTypeSpecifier::Default,
            "xml",
            &MimeTable::new(),
            &scope,
        );
        assert!(check.run().is_fail());

        let check = content_type_check(
            &ContentTypeSpecifier::from("nonsense_format"),
            "xml",
            &MimeTable::new(),
            &scope,
        );
        assert!(matches!(check.run(), Outcome::Error(CheckError::Resolution(_))));
        assert_eq!(scope.invocations(), 1);
    }
}
