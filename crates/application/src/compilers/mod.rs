//! Declaration compilers
//!
//! Each declaration family turns into its checks here. Compilation is pure:
//! nothing runs until a check does.

mod redirect;
mod renders;
mod state;

use std::sync::Arc;

use respec_domain::{Check, Declaration};

use crate::expander::StateFamily;
use crate::group::GroupDeps;
use crate::memoizer::ActionScope;
use crate::ports::ResponseLike;

pub use redirect::compile_redirect;
pub use renders::{compile_blank, compile_structured, compile_template, template_matches};
pub use state::{compile_assigns, compile_state};

/// Compiles one declaration against its scope.
///
/// The checks come back in registration order: the primary check first, then
/// the derived status and content-type checks, or one check per entry for the
/// keyed families.
pub fn compile<R>(
    declaration: Declaration,
    scope: &Arc<ActionScope<R>>,
    deps: &GroupDeps,
) -> Vec<Check>
where
    R: ResponseLike + 'static,
{
    match declaration {
        Declaration::Redirect { hint, route } => {
            vec![compile_redirect(hint, route, scope, &deps.config.base_url)]
        }
        Declaration::Assigns(args) => compile_assigns(args, scope, &deps.matcher),
        Declaration::RendersBlank(options) => compile_blank(&options, scope, &deps.config),
        Declaration::RendersTemplate { name, options } => {
            compile_template(name, &options, scope, &deps.config)
        }
        Declaration::RendersStructured { fragment, options } => {
            compile_structured(fragment, &options, scope, deps)
        }
        Declaration::Flash(entries) => {
            compile_state(StateFamily::Flash, entries, scope, &deps.matcher)
        }
        Declaration::Session(entries) => {
            compile_state(StateFamily::Session, entries, scope, &deps.matcher)
        }
        Declaration::Headers(entries) => {
            compile_state(StateFamily::Headers, entries, scope, &deps.matcher)
        }
    }
}
