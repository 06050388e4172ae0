//! `renders :blank`, `renders :template` and structured-data renders.

use std::sync::Arc;

use respec_domain::{
    Check, CheckError, Context, DEFAULT_FORMAT, DEFAULT_STRUCTURED_FORMAT, Fragment,
    RenderOptions, ResolutionError, Value, ValuePath,
};

use crate::assertions::{content_type_check, status_check};
use crate::config::RespecConfig;
use crate::group::GroupDeps;
use crate::memoizer::ActionScope;
use crate::ports::{ResponseLike, SerializerSet};

/// Blank body plus the status check.
pub fn compile_blank<R>(
    options: &RenderOptions,
    scope: &Arc<ActionScope<R>>,
    config: &RespecConfig,
) -> Vec<Check>
where
    R: ResponseLike + 'static,
{
    let primary = {
        let scope = Arc::clone(scope);
        Check::new("renders a blank response", move || {
            scope.perform_with(|response| {
                if response.body().trim().is_empty() {
                    Ok(())
                } else {
                    Err(CheckError::assertion(format!(
                        "expected a blank body, got {:?}",
                        response.body()
                    )))
                }
            })
        })
    };
    vec![primary, status_check(&options.status, &config.statuses, scope)]
}

/// Rendered template plus status and content-type checks (HTML by default).
pub fn compile_template<R>(
    name: String,
    options: &RenderOptions,
    scope: &Arc<ActionScope<R>>,
    config: &RespecConfig,
) -> Vec<Check>
where
    R: ResponseLike + 'static,
{
    let primary = {
        let scope = Arc::clone(scope);
        Check::new(format!("renders {name}"), move || {
            scope.perform_with(|response| match response.rendered_template() {
                Some(rendered) if template_matches(rendered, &name) => Ok(()),
                Some(rendered) => Err(CheckError::assertion(format!(
                    "expected template {name:?} to be rendered, got {rendered:?}"
                ))),
                None => Err(CheckError::assertion(format!(
                    "expected template {name:?} to be rendered, but nothing was"
                ))),
            })
        })
    };
    vec![
        primary,
        status_check(&options.status, &config.statuses, scope),
        content_type_check(&options.format, DEFAULT_FORMAT, &config.mimes, scope),
    ]
}

/// Returns true if `rendered` designates the template `expected`.
///
/// `foos/index.html.erb` matches `index`, `foos/index` and
/// `foos/index.html`; `foos/reindex` does not match `index`.
#[must_use]
pub fn template_matches(rendered: &str, expected: &str) -> bool {
    let rendered = strip_extensions(rendered.trim());
    let expected = strip_extensions(expected.trim());
    rendered == expected || rendered.ends_with(&format!("/{expected}"))
}

fn strip_extensions(template: &str) -> &str {
    let leaf_start = template.rfind('/').map_or(0, |slash| slash + 1);
    match template[leaf_start..].find('.') {
        Some(dot) => &template[..leaf_start + dot],
        None => template,
    }
}

/// Body contains the expected fragment, plus status and content-type checks
/// (XML by default).
pub fn compile_structured<R>(
    fragment: Fragment,
    options: &RenderOptions,
    scope: &Arc<ActionScope<R>>,
    deps: &GroupDeps,
) -> Vec<Check>
where
    R: ResponseLike + 'static,
{
    let format = options
        .format
        .extension_or(DEFAULT_STRUCTURED_FORMAT)
        .to_string();

    let primary = {
        let scope = Arc::clone(scope);
        let serializers = Arc::clone(&deps.serializers);
        Check::new(format!("renders {format}"), move || {
            let response = scope.perform()?;
            let expected = scope
                .with_context(|ctx| expected_fragment(&fragment, &format, ctx, serializers.as_ref()))?;
            if response.body().contains(&expected) {
                Ok(())
            } else {
                Err(CheckError::assertion(format!(
                    "expected body to contain {expected:?}, got {:?}",
                    response.body()
                )))
            }
        })
    };
    vec![
        primary,
        status_check(&options.status, &deps.config.statuses, scope),
        content_type_check(
            &options.format,
            DEFAULT_STRUCTURED_FORMAT,
            &deps.config.mimes,
            scope,
        ),
    ]
}

fn expected_fragment(
    fragment: &Fragment,
    format: &str,
    context: &Context,
    serializers: &dyn SerializerSet,
) -> Result<String, ResolutionError> {
    match fragment {
        Fragment::Literal(text) => Ok(text.clone()),
        Fragment::Record(path) => {
            let record = lookup(path, context)?;
            let serializer = serializers.for_format(format).ok_or_else(|| {
                ResolutionError::new(format!("format {format:?}"), "no default serializer")
            })?;
            serializer.serialize(path.leaf(), record)
        }
        Fragment::Custom { path, render } => render(lookup(path, context)?),
    }
}

fn lookup<'a>(
    path: &ValuePath,
    context: &'a Context,
) -> Result<&'a Value, ResolutionError> {
    context
        .resolve(path)
        .ok_or_else(|| ResolutionError::undefined(format!("@{path}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::test_support::{FakeResponse, deps, scope_for};
    use pretty_assertions::assert_eq;
    use respec_domain::Outcome;
    use serde_json::json;

    #[test]
    fn test_template_matching() {
        assert!(template_matches("foos/index.html.erb", "index"));
        assert!(template_matches("foos/index", "foos/index"));
        assert!(template_matches("index.html", "index.html"));
        assert!(template_matches("admin/foos/index", "foos/index"));
        assert!(!template_matches("foos/reindex", "index"));
        assert!(!template_matches("foos/show", "index"));
    }

    #[test]
    fn test_blank_gives_two_checks() {
        let scope = scope_for(FakeResponse::default().body("  \n"), Context::new());
        let checks = compile_blank(&RenderOptions::new(), &scope, &RespecConfig::default());
        assert_eq!(
            checks.iter().map(Check::description).collect::<Vec<_>>(),
            ["renders a blank response", "is successful"]
        );
        assert!(checks.iter().all(|check| check.run().is_pass()));
    }

    #[test]
    fn test_blank_fails_on_content() {
        let scope = scope_for(FakeResponse::default().body("hello"), Context::new());
        let checks = compile_blank(&RenderOptions::new(), &scope, &RespecConfig::default());
        assert!(checks[0].run().is_fail());
        assert!(checks[1].run().is_pass());
    }

    #[test]
    fn test_template_gives_three_checks() {
        let response = FakeResponse::default()
            .status(404)
            .template("foos/index.html.erb")
            .header("Content-Type", "text/html; charset=utf-8");
        let scope = scope_for(response, Context::new());
        let options = RenderOptions::new().with_status("not_found");
        let checks = compile_template("index".into(), &options, &scope, &RespecConfig::default());

        assert_eq!(
            checks.iter().map(Check::description).collect::<Vec<_>>(),
            [
                "renders index",
                "renders with status of \"Not Found\"",
                "renders with Content-Type of text/html",
            ]
        );
        assert!(checks.iter().all(|check| check.run().is_pass()));
        assert_eq!(scope.invocations(), 1);
    }

    #[test]
    fn test_structured_record_fragment() {
        let context = Context::new().with("foo", json!({"id": 1}));
        let response = FakeResponse::default()
            .body(r#"{"foo":{"id":1}}"#)
            .header("Content-Type", "application/json");
        let scope = scope_for(response, context);
        let options = RenderOptions::new().with_format("json");
        let fragment = Fragment::record("foo").unwrap();

        let checks = compile_structured(fragment, &options, &scope, &deps());
        assert_eq!(checks[0].description(), "renders json");
        assert_eq!(
            checks[2].description(),
            "renders with Content-Type of application/json"
        );
        assert!(checks.iter().all(|check| check.run().is_pass()));
    }

    #[test]
    fn test_structured_custom_and_literal_fragments() {
        let context = Context::new().with("foo", json!({"errors": ["name is blank"]}));
        let response = FakeResponse::default()
            .status(422)
            .body("<errors><error>name is blank</error></errors>");
        let scope = scope_for(response, context);

        let custom = Fragment::custom("foo.errors", |errors| {
            Ok(errors
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(Value::as_str)
                .map(|e| format!("<error>{e}</error>"))
                .collect())
        })
        .unwrap();
        let checks = compile_structured(
            custom,
            &RenderOptions::new().with_status(422_u16),
            &scope,
            &deps(),
        );
        assert_eq!(checks[0].description(), "renders xml");
        assert!(checks[0].run().is_pass());
        assert!(checks[1].run().is_pass());

        let literal = Fragment::literal("<missing/>");
        let checks = compile_structured(literal, &RenderOptions::new(), &scope, &deps());
        assert!(checks[0].run().is_fail());
    }

    #[test]
    fn test_structured_unresolvable_record_errors() {
        let scope = scope_for(FakeResponse::default(), Context::new());
        let fragment = Fragment::record("foo.errors").unwrap();
        let checks = compile_structured(fragment, &RenderOptions::new(), &scope, &deps());
        assert!(matches!(
            checks[0].run(),
            Outcome::Error(CheckError::Resolution(_))
        ));
    }
}
