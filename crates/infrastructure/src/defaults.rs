//! Default wiring of the ports.

use std::sync::Arc;

use respec_application::{CheckRegistry, ExampleGroup, GroupDeps, RespecConfig};
use respec_domain::{ActionError, Context};

use crate::adapters::{StrictEquality, TestResponse};
use crate::serialization::DefaultSerializers;

/// Strict equality and the XML/JSON serializers over `config`.
#[must_use]
pub fn default_deps(config: RespecConfig) -> GroupDeps {
    GroupDeps::new(
        config,
        Arc::new(StrictEquality),
        Arc::new(DefaultSerializers::default()),
    )
}

/// An example group over [`TestResponse`] with the default collaborators.
pub fn example_group<F, G>(
    name: impl Into<String>,
    action: F,
    config: RespecConfig,
    registry: G,
) -> ExampleGroup<TestResponse, G>
where
    F: Fn(&mut Context) -> Result<TestResponse, ActionError> + Send + Sync + 'static,
    G: CheckRegistry,
{
    ExampleGroup::new(name, action, default_deps(config), registry)
}
