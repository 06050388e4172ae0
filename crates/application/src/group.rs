//! Example groups
//!
//! An [`ExampleGroup`] is the declaration surface. It holds the action under
//! test, the seed context and the registry checks are handed to. Every
//! declaration gets a fresh [`ActionScope`] seeded with a copy of the
//! group's context, so declarations never share a response.

use std::sync::Arc;

use respec_domain::{
    AssignsArgs, Check, Context, Declaration, Expectations, Fragment, RenderOptions, Route, Value,
};
use tracing::debug;

use crate::compilers::compile;
use crate::config::RespecConfig;
use crate::error::ApplicationResult;
use crate::memoizer::{ActionFn, ActionScope};
use crate::ports::{CheckRegistry, Matcher, ResponseLike, SerializerSet};

/// Collaborators shared by every declaration of a group.
#[derive(Clone)]
pub struct GroupDeps {
    /// Status and MIME tables, redirect base URL.
    pub config: Arc<RespecConfig>,
    /// Equality used by the keyed-state families.
    pub matcher: Arc<dyn Matcher>,
    /// Default record serializers for structured renders.
    pub serializers: Arc<dyn SerializerSet>,
}

impl GroupDeps {
    /// Bundles the collaborators.
    pub fn new(
        config: RespecConfig,
        matcher: Arc<dyn Matcher>,
        serializers: Arc<dyn SerializerSet>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            matcher,
            serializers,
        }
    }
}

impl std::fmt::Debug for GroupDeps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupDeps")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Declarations about one action, compiled into checks as they are made.
pub struct ExampleGroup<R, G = Vec<Check>> {
    name: String,
    action: Arc<ActionFn<R>>,
    context: Context,
    deps: GroupDeps,
    registry: G,
    declared: usize,
}

impl<R, G> ExampleGroup<R, G>
where
    R: ResponseLike + 'static,
    G: CheckRegistry,
{
    /// Creates a group for `action`, registering checks into `registry`.
    pub fn new<F>(name: impl Into<String>, action: F, deps: GroupDeps, registry: G) -> Self
    where
        F: Fn(&mut Context) -> Result<R, respec_domain::ActionError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            action: Arc::new(action),
            context: Context::new(),
            deps,
            registry,
            declared: 0,
        }
    }

    /// Replaces the seed context. Only later declarations see it.
    #[must_use]
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Sets one seed value for later declarations.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.context.set(name, value);
        self
    }

    /// The seed context.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.context
    }

    /// Group name, used in logs and scope labels.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validates and compiles a declaration, registering its checks.
    ///
    /// Returns how many checks were registered.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Domain`](crate::ApplicationError::Domain)
    /// for an empty name or an empty expectation map. Nothing is registered
    /// in that case.
    pub fn declare(&mut self, declaration: Declaration) -> ApplicationResult<usize> {
        declaration.validate()?;

        let kind = declaration.kind();
        self.declared += 1;
        let label = format!("{} {kind} #{}", self.name, self.declared);
        let scope = Arc::new(ActionScope::new(
            label,
            Arc::clone(&self.action),
            self.context.clone(),
        ));

        let checks = compile(declaration, &scope, &self.deps);
        let count = checks.len();
        for check in checks {
            self.registry.register(check);
        }

        debug!(group = %self.name, declaration = %kind, checks = count, "compiled declaration");
        Ok(count)
    }

    /// `redirects_to route`.
    ///
    /// # Errors
    ///
    /// See [`declare`](Self::declare).
    pub fn redirects_to(&mut self, route: Route) -> ApplicationResult<usize> {
        self.declare(Declaration::Redirect { hint: None, route })
    }

    /// `redirects_to route` with a description hint.
    ///
    /// # Errors
    ///
    /// See [`declare`](Self::declare).
    pub fn redirects_to_hinted(
        &mut self,
        hint: impl Into<String>,
        route: Route,
    ) -> ApplicationResult<usize> {
        self.declare(Declaration::Redirect {
            hint: Some(hint.into()),
            route,
        })
    }

    /// `assigns ...`
    ///
    /// # Errors
    ///
    /// See [`declare`](Self::declare).
    pub fn assigns(&mut self, args: AssignsArgs) -> ApplicationResult<usize> {
        self.declare(Declaration::Assigns(args))
    }

    /// `renders :blank`
    ///
    /// # Errors
    ///
    /// See [`declare`](Self::declare).
    pub fn renders_blank(&mut self, options: RenderOptions) -> ApplicationResult<usize> {
        self.declare(Declaration::RendersBlank(options))
    }

    /// `renders :template => name`
    ///
    /// # Errors
    ///
    /// See [`declare`](Self::declare).
    pub fn renders_template(
        &mut self,
        name: impl Into<String>,
        options: RenderOptions,
    ) -> ApplicationResult<usize> {
        self.declare(Declaration::RendersTemplate {
            name: name.into(),
            options,
        })
    }

    /// `renders :xml => fragment` and other structured formats.
    ///
    /// # Errors
    ///
    /// See [`declare`](Self::declare).
    pub fn renders_structured(
        &mut self,
        fragment: Fragment,
        options: RenderOptions,
    ) -> ApplicationResult<usize> {
        self.declare(Declaration::RendersStructured { fragment, options })
    }

    /// `assigns_flash`
    ///
    /// # Errors
    ///
    /// See [`declare`](Self::declare).
    pub fn assigns_flash(&mut self, entries: Expectations) -> ApplicationResult<usize> {
        self.declare(Declaration::Flash(entries))
    }

    /// `assigns_session`
    ///
    /// # Errors
    ///
    /// See [`declare`](Self::declare).
    pub fn assigns_session(&mut self, entries: Expectations) -> ApplicationResult<usize> {
        self.declare(Declaration::Session(entries))
    }

    /// `assigns_headers`
    ///
    /// # Errors
    ///
    /// See [`declare`](Self::declare).
    pub fn assigns_headers(&mut self, entries: Expectations) -> ApplicationResult<usize> {
        self.declare(Declaration::Headers(entries))
    }

    /// The registry checks were handed to.
    #[must_use]
    pub const fn registry(&self) -> &G {
        &self.registry
    }

    /// Consumes the group, returning its registry.
    #[must_use]
    pub fn into_registry(self) -> G {
        self.registry
    }
}
