//! `redirects_to`

use std::sync::Arc;

use respec_domain::{Check, CheckError, Route};
use url::Url;

use crate::memoizer::ActionScope;
use crate::ports::{ResponseLike, normalize_url};

/// Compiles a redirect declaration into its single check.
///
/// The route is resolved inside the check, after the action ran, so it can
/// refer to records the action created.
pub fn compile_redirect<R>(
    hint: Option<String>,
    route: Route,
    scope: &Arc<ActionScope<R>>,
    base_url: &Url,
) -> Check
where
    R: ResponseLike + 'static,
{
    let description = format!(
        "redirects to {}",
        hint.unwrap_or_else(|| route.describe())
    );
    let scope = Arc::clone(scope);
    let base_url = base_url.clone();
    Check::new(description, move || {
        let response = scope.perform()?;
        let target = scope.with_context(|ctx| route.resolve(ctx))?;
        if response.is_redirect_to(&target, &base_url) {
            return Ok(());
        }
        Err(CheckError::assertion(format!(
            "expected a redirect to {}, got status {} with Location {:?}",
            normalize_url(&target, &base_url),
            response.status(),
            response.location().unwrap_or_default()
        )))
    })
}
