//! Keyed-state families: assigns, flash, session and headers.

use std::sync::Arc;

use respec_domain::{AssignsArgs, Check, Expectations};

use crate::expander::{StateFamily, entry_check, expand};
use crate::memoizer::ActionScope;
use crate::ports::{Matcher, ResponseLike};

/// Compiles an assigned-state declaration. A bare name compares the assigned
/// value with the context value of the same name. Every listed name gets its
/// own check, repeats included.
pub fn compile_assigns<R>(
    args: AssignsArgs,
    scope: &Arc<ActionScope<R>>,
    matcher: &Arc<dyn Matcher>,
) -> Vec<Check>
where
    R: ResponseLike + 'static,
{
    args.into_entries()
        .into_iter()
        .map(|(name, expected)| entry_check(StateFamily::Assigns, name, expected, scope, matcher))
        .collect()
}

/// Compiles a flash, session or headers declaration.
pub fn compile_state<R>(
    family: StateFamily,
    entries: Expectations,
    scope: &Arc<ActionScope<R>>,
    matcher: &Arc<dyn Matcher>,
) -> Vec<Check>
where
    R: ResponseLike + 'static,
{
    expand(family, entries, scope, matcher)
}
