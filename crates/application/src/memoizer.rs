//! Action memoizer
//!
//! One [`ActionScope`] exists per declaration. Every check compiled from that
//! declaration holds the same scope, so the action under test runs at most
//! once successfully no matter how many checks read its response, or in which
//! order they run.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use respec_domain::{ActionError, CheckError, Context, panic_message};
use tracing::{debug, warn};

/// The action under test. It may mutate the scope's context, e.g. to record
/// the id of a record it created.
pub type ActionFn<R> = dyn Fn(&mut Context) -> Result<R, ActionError> + Send + Sync;

struct ScopeState<R> {
    context: Context,
    response: Option<Arc<R>>,
}

/// Per-declaration cache around the action under test.
pub struct ActionScope<R> {
    label: String,
    action: Arc<ActionFn<R>>,
    state: Mutex<ScopeState<R>>,
    invocations: AtomicUsize,
}

impl<R> ActionScope<R> {
    /// Creates a scope with its own copy of the example context.
    pub fn new(label: impl Into<String>, action: Arc<ActionFn<R>>, context: Context) -> Self {
        Self {
            label: label.into(),
            action,
            state: Mutex::new(ScopeState {
                context,
                response: None,
            }),
            invocations: AtomicUsize::new(0),
        }
    }

    /// Returns the cached response, invoking the action first if needed.
    ///
    /// The lock is held across the invocation, so concurrent first callers
    /// wait for a single run. A failed or panicking run caches nothing and
    /// leaves the context as it was, so the next caller retries from the
    /// same state and fails the same way.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Action`] if the action fails or panics.
    pub fn perform(&self) -> Result<Arc<R>, CheckError> {
        let mut state = self.state.lock();
        if let Some(response) = &state.response {
            debug!(scope = %self.label, "replaying memoized response");
            return Ok(Arc::clone(response));
        }

        let attempt = self.invocations.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(scope = %self.label, attempt, "invoking action under test");

        let snapshot = state.context.clone();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (self.action)(&mut state.context)))
            .unwrap_or_else(|payload| {
                Err(ActionError::new(format!(
                    "panicked: {}",
                    panic_message(payload.as_ref())
                )))
            });

        match outcome {
            Ok(response) => {
                let response = Arc::new(response);
                state.response = Some(Arc::clone(&response));
                Ok(response)
            }
            Err(err) => {
                warn!(scope = %self.label, attempt, error = %err, "action under test failed");
                state.context = snapshot;
                Err(CheckError::Action(err))
            }
        }
    }

    /// Ensures the action ran, then hands its response to `observer`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Action`] if the action fails, or whatever the
    /// observer returns.
    pub fn perform_with<T>(
        &self,
        observer: impl FnOnce(&R) -> Result<T, CheckError>,
    ) -> Result<T, CheckError> {
        let response = self.perform()?;
        observer(&response)
    }

    /// Reads the scope's context. After [`perform`](Self::perform) this
    /// includes whatever the action stored.
    pub fn with_context<T>(&self, read: impl FnOnce(&Context) -> T) -> T {
        read(&self.state.lock().context)
    }

    /// How many times the raw action was invoked.
    #[must_use]
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    /// Returns true once a response is cached.
    #[must_use]
    pub fn is_performed(&self) -> bool {
        self.state.lock().response.is_some()
    }

    /// Label used in logs.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<R> std::fmt::Debug for ActionScope<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionScope")
            .field("label", &self.label)
            .field("invocations", &self.invocations())
            .field("performed", &self.is_performed())
            .finish_non_exhaustive()
    }
}
