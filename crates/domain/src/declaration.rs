//! Declarations: one author-facing call describing an expected response.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::content_type::ContentTypeSpecifier;
use crate::context::{Context, ValuePath};
use crate::error::{DomainError, DomainResult, ResolutionError};
use crate::expected::{Expectations, Expected};
use crate::status::StatusSpecifier;

/// Computes a redirect target from the context when the check runs.
pub type RouteFn = dyn Fn(&Context) -> Result<String, ResolutionError> + Send + Sync;

/// Renders a resolved record into the text the body must contain.
pub type RenderFn = dyn Fn(&Value) -> Result<String, ResolutionError> + Send + Sync;

/// Where a redirect is expected to go.
#[derive(Clone)]
pub enum Route {
    /// A fixed URL or path.
    Literal(String),
    /// A path with `{dotted.path}` placeholders filled from the context,
    /// e.g. `/foos/{foo.id}`.
    Template(String),
    /// Any computation over the context.
    Computed(Arc<RouteFn>),
}

impl Route {
    /// A fixed target.
    pub fn literal(target: impl Into<String>) -> Self {
        Self::Literal(target.into())
    }

    /// A target with context placeholders.
    pub fn template(template: impl Into<String>) -> Self {
        Self::Template(template.into())
    }

    /// A computed target.
    pub fn computed<F>(compute: F) -> Self
    where
        F: Fn(&Context) -> Result<String, ResolutionError> + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(compute))
    }

    /// Text used in the check description when no hint is given.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Literal(target) | Self::Template(target) => format!("{target:?}"),
            Self::Computed(_) => "<computed route>".to_string(),
        }
    }

    /// Produces the target URL.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolutionError`] if a placeholder is malformed, undefined or
    /// not a scalar, or if the computation fails.
    pub fn resolve(&self, context: &Context) -> Result<String, ResolutionError> {
        match self {
            Self::Literal(target) => Ok(target.clone()),
            Self::Template(template) => interpolate(template, context),
            Self::Computed(compute) => compute(context),
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(target) => f.debug_tuple("Literal").field(target).finish(),
            Self::Template(template) => f.debug_tuple("Template").field(template).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

fn interpolate(template: &str, context: &Context) -> Result<String, ResolutionError> {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| ResolutionError::new(template, "unclosed placeholder"))?;
        let placeholder = &after[..close];
        let path = ValuePath::parse(placeholder)
            .map_err(|err| ResolutionError::new(template, err.to_string()))?;
        let value = context
            .resolve(&path)
            .ok_or_else(|| ResolutionError::undefined(path.to_string()))?;
        output.push_str(&scalar_text(&path, value)?);
        rest = &after[close + 1..];
    }

    output.push_str(rest);
    Ok(output)
}

fn scalar_text(path: &ValuePath, value: &Value) -> Result<String, ResolutionError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(ResolutionError::new(path.to_string(), "is null")),
        Value::Array(_) | Value::Object(_) => {
            Err(ResolutionError::new(path.to_string(), "is not a scalar"))
        }
    }
}

/// Where the expected fragment of a structured-data response comes from.
#[derive(Clone)]
pub enum Fragment {
    /// The body must contain this text verbatim.
    Literal(String),
    /// The context value at this path, serialized with the format's default
    /// serializer.
    Record(ValuePath),
    /// The context value at this path, rendered by a custom closure.
    Custom {
        /// Path of the record in the context.
        path: ValuePath,
        /// Replaces the default serializer.
        render: Arc<RenderFn>,
    },
}

impl Fragment {
    /// A literal fragment.
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// A context record, by name (`foo`) or dotted path (`foo.errors`).
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPath`] for a malformed path.
    pub fn record(path: &str) -> DomainResult<Self> {
        ValuePath::parse(path).map(Self::Record)
    }

    /// A context record rendered by `render`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPath`] for a malformed path.
    pub fn custom<F>(path: &str, render: F) -> DomainResult<Self>
    where
        F: Fn(&Value) -> Result<String, ResolutionError> + Send + Sync + 'static,
    {
        Ok(Self::Custom {
            path: ValuePath::parse(path)?,
            render: Arc::new(render),
        })
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Self::Record(path) => f.debug_tuple("Record").field(path).finish(),
            Self::Custom { path, .. } => f
                .debug_struct("Custom")
                .field("path", path)
                .finish_non_exhaustive(),
        }
    }
}

/// Options accepted by the rendered-output declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Expected status; success when absent.
    pub status: StatusSpecifier,
    /// Expected format; family default when absent.
    pub format: ContentTypeSpecifier,
}

impl RenderOptions {
    /// Default options: success status, family default format.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the expected status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<StatusSpecifier>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets the expected format extension.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<ContentTypeSpecifier>) -> Self {
        self.format = format.into();
        self
    }
}

/// Argument shapes of an assigned-state declaration.
#[derive(Debug, Clone)]
pub enum AssignsArgs {
    /// `assigns foo`: the assigned value must equal the context value `foo`.
    SingleName(String),
    /// `assigns foo, bar`: one reference check per name.
    NameList(Vec<String>),
    /// `assigns foo => expected, ...`: one check per entry.
    NameValueMap(Expectations),
}

impl AssignsArgs {
    /// A single name.
    pub fn single(name: impl Into<String>) -> Self {
        Self::SingleName(name.into())
    }

    /// Several names.
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::NameList(names.into_iter().map(Into::into).collect())
    }

    /// Explicit specifiers.
    #[must_use]
    pub const fn map(expectations: Expectations) -> Self {
        Self::NameValueMap(expectations)
    }

    /// Normalizes every shape into ordered `(name, specifier)` entries, one
    /// per check.
    ///
    /// A bare name `n` means `n => Reference(n)`. Repeated names in a list
    /// stay repeated.
    #[must_use]
    pub fn into_entries(self) -> Vec<(String, Expected)> {
        match self {
            Self::SingleName(name) => vec![reference_entry(name)],
            Self::NameList(names) => names.into_iter().map(reference_entry).collect(),
            Self::NameValueMap(expectations) => expectations.into_iter().collect(),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::SingleName(_) => 1,
            Self::NameList(names) => names.len(),
            Self::NameValueMap(expectations) => expectations.len(),
        }
    }
}

fn reference_entry(name: String) -> (String, Expected) {
    let expected = Expected::reference(name.clone());
    (name, expected)
}

/// The declaration families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    /// `redirects_to`
    Redirect,
    /// `assigns`
    Assigns,
    /// `renders :blank`
    RendersBlank,
    /// `renders :template`
    RendersTemplate,
    /// `renders :xml` and other structured formats
    RendersStructured,
    /// `assigns_flash`
    Flash,
    /// `assigns_session`
    Session,
    /// `assigns_headers`
    Headers,
}

impl DeclarationKind {
    /// Stable name for logs and errors.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Redirect => "redirects_to",
            Self::Assigns => "assigns",
            Self::RendersBlank => "renders_blank",
            Self::RendersTemplate => "renders_template",
            Self::RendersStructured => "renders_structured",
            Self::Flash => "assigns_flash",
            Self::Session => "assigns_session",
            Self::Headers => "assigns_headers",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One expected-response declaration.
#[derive(Debug, Clone)]
pub enum Declaration {
    /// The response redirects to `route`.
    Redirect {
        /// Replaces the route in the description.
        hint: Option<String>,
        /// Expected target, evaluated when the check runs.
        route: Route,
    },
    /// The action assigned response state.
    Assigns(AssignsArgs),
    /// The body is empty or whitespace.
    RendersBlank(RenderOptions),
    /// A template was rendered.
    RendersTemplate {
        /// Template name, e.g. `index` or `foos/index`.
        name: String,
        /// Status and format.
        options: RenderOptions,
    },
    /// The body contains a structured-data fragment.
    RendersStructured {
        /// Expected fragment.
        fragment: Fragment,
        /// Status and format.
        options: RenderOptions,
    },
    /// Flash entries.
    Flash(Expectations),
    /// Session entries.
    Session(Expectations),
    /// Response headers.
    Headers(Expectations),
}

impl Declaration {
    /// The declaration family.
    #[must_use]
    pub const fn kind(&self) -> DeclarationKind {
        match self {
            Self::Redirect { .. } => DeclarationKind::Redirect,
            Self::Assigns(_) => DeclarationKind::Assigns,
            Self::RendersBlank(_) => DeclarationKind::RendersBlank,
            Self::RendersTemplate { .. } => DeclarationKind::RendersTemplate,
            Self::RendersStructured { .. } => DeclarationKind::RendersStructured,
            Self::Flash(_) => DeclarationKind::Flash,
            Self::Session(_) => DeclarationKind::Session,
            Self::Headers(_) => DeclarationKind::Headers,
        }
    }

    /// Number of checks this declaration registers, from its shape alone.
    #[must_use]
    pub fn check_count(&self) -> usize {
        match self {
            Self::Redirect { .. } => 1,
            Self::Assigns(args) => args.len(),
            Self::RendersBlank(_) => 2,
            Self::RendersTemplate { .. } | Self::RendersStructured { .. } => 3,
            Self::Flash(entries) | Self::Session(entries) | Self::Headers(entries) => {
                entries.len()
            }
        }
    }

    /// Rejects declarations that would check nothing or name nothing.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyName`] or [`DomainError::EmptyDeclaration`].
    pub fn validate(&self) -> DomainResult<()> {
        let kind = self.kind().as_str();
        match self {
            Self::Redirect { .. } | Self::RendersBlank(_) | Self::RendersStructured { .. } => {
                Ok(())
            }
            Self::RendersTemplate { name, .. } => non_empty(name, kind),
            Self::Assigns(AssignsArgs::SingleName(name)) => non_empty(name, kind),
            Self::Assigns(AssignsArgs::NameList(names)) => {
                if names.is_empty() {
                    return Err(DomainError::EmptyDeclaration(kind));
                }
                names.iter().try_for_each(|name| non_empty(name, kind))
            }
            Self::Assigns(AssignsArgs::NameValueMap(entries))
            | Self::Flash(entries)
            | Self::Session(entries)
            | Self::Headers(entries) => {
                if entries.is_empty() {
                    return Err(DomainError::EmptyDeclaration(kind));
                }
                entries.names().try_for_each(|name| non_empty(name, kind))
            }
        }
    }
}

fn non_empty(name: &str, kind: &'static str) -> DomainResult<()> {
    if name.trim().is_empty() {
        Err(DomainError::EmptyName(kind))
    } else {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_route_template_interpolation() {
        let ctx = Context::new().with("foo", json!({"id": 12, "slug": "hello"}));
        let route = Route::template("/foos/{foo.id}/{foo.slug}");
        assert_eq!(route.resolve(&ctx).unwrap(), "/foos/12/hello");
        assert_eq!(route.describe(), "\"/foos/{foo.id}/{foo.slug}\"");
    }

    #[test]
    fn test_route_template_errors() {
        let ctx = Context::new().with("foo", json!({"id": null, "tags": []}));
        assert!(Route::template("/foos/{bar.id}").resolve(&ctx).is_err());
        assert!(Route::template("/foos/{foo.id}").resolve(&ctx).is_err());
        assert!(Route::template("/foos/{foo.tags}").resolve(&ctx).is_err());
        assert!(Route::template("/foos/{foo.id").resolve(&ctx).is_err());
    }

    #[test]
    fn test_computed_route_is_lazy() {
        let route = Route::computed(|ctx| {
            ctx.get("foo_id")
                .map(|id| format!("/foos/{id}"))
                .ok_or_else(|| ResolutionError::undefined("foo_id"))
        });
        assert_eq!(route.describe(), "<computed route>");
        assert!(route.resolve(&Context::new()).is_err());
        let ctx = Context::new().with("foo_id", 3);
        assert_eq!(route.resolve(&ctx).unwrap(), "/foos/3");
    }

    #[test]
    fn test_assigns_shapes_normalize() {
        let single = AssignsArgs::single("foo").into_entries();
        assert!(matches!(
            &single[..],
            [(name, Expected::Reference(r))] if name == "foo" && r == "foo"
        ));

        let list = AssignsArgs::names(["foo", "bar"]).into_entries();
        let names: Vec<_> = list.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["foo", "bar"]);
    }

    #[test]
    fn test_check_count_from_shape() {
        let flash = Declaration::Flash(
            Expectations::new()
                .with("notice", Expected::value("ok"))
                .with("error", Expected::Undefined),
        );
        assert_eq!(flash.check_count(), 2);

        let template = Declaration::RendersTemplate {
            name: "index".into(),
            options: RenderOptions::new(),
        };
        assert_eq!(template.check_count(), 3);
        assert_eq!(Declaration::RendersBlank(RenderOptions::new()).check_count(), 2);
        assert_eq!(
            Declaration::Assigns(AssignsArgs::names(["a", "b", "c"])).check_count(),
            3
        );

        let repeated = AssignsArgs::names(["foo", "foo"]);
        assert_eq!(Declaration::Assigns(repeated.clone()).check_count(), 2);
        assert_eq!(repeated.into_entries().len(), 2);
        assert_eq!(
            Declaration::Redirect {
                hint: None,
                route: Route::literal("/"),
            }
            .check_count(),
            1
        );
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert_eq!(
            Declaration::Headers(Expectations::new()).validate(),
            Err(DomainError::EmptyDeclaration("assigns_headers"))
        );
        assert_eq!(
            Declaration::Assigns(AssignsArgs::single(" ")).validate(),
            Err(DomainError::EmptyName("assigns"))
        );
        assert_eq!(
            Declaration::RendersTemplate {
                name: String::new(),
                options: RenderOptions::new(),
            }
            .validate(),
            Err(DomainError::EmptyName("renders_template"))
        );
        assert!(Declaration::Assigns(AssignsArgs::names(Vec::<String>::new()))
            .validate()
            .is_err());
    }

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new().with_status("not_found").with_format("xml");
        assert_eq!(options.status, StatusSpecifier::named("not_found"));
        assert_eq!(options.format, ContentTypeSpecifier::Extension("xml".into()));
    }
}
