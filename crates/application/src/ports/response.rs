//! Response ports
//!
//! The web framework under test is reached only through these traits.
//! Adapters wrap the framework's own response and session objects.

use std::collections::HashMap;

use indexmap::IndexMap;
use respec_domain::{Context, Value};
use url::Url;

/// Read access to a keyed state bag: flash, session or assigned state.
///
/// `get` returning `None` means the key is structurally absent, which is
/// different from a present `null`.
pub trait StateLike: Send + Sync {
    /// Looks up a key.
    fn get(&self, key: &str) -> Option<&Value>;

    /// Returns true if the key is present, even when it holds `null`.
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl StateLike for IndexMap<String, Value> {
    fn get(&self, key: &str) -> Option<&Value> {
        Self::get(self, key)
    }
}

impl StateLike for HashMap<String, Value> {
    fn get(&self, key: &str) -> Option<&Value> {
        Self::get(self, key)
    }
}

impl StateLike for serde_json::Map<String, Value> {
    fn get(&self, key: &str) -> Option<&Value> {
        Self::get(self, key)
    }
}

impl StateLike for Context {
    fn get(&self, key: &str) -> Option<&Value> {
        Self::get(self, key)
    }

    fn contains(&self, key: &str) -> bool {
        Self::contains(self, key)
    }
}

/// The response produced by the action under test.
pub trait ResponseLike: Send + Sync {
    /// Numeric status code.
    fn status(&self) -> u16;

    /// Response body as text.
    fn body(&self) -> &str;

    /// Header value by name (case-insensitive).
    fn header(&self, name: &str) -> Option<&str>;

    /// Name of the template the action rendered, if any.
    fn rendered_template(&self) -> Option<&str>;

    /// State the action assigned for its view.
    fn assigns(&self) -> &dyn StateLike;

    /// Flash entries set by the action.
    fn flash(&self) -> &dyn StateLike;

    /// Session after the action ran.
    fn session(&self) -> &dyn StateLike;

    /// `Content-Type` header.
    fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// `Location` header.
    fn location(&self) -> Option<&str> {
        self.header("location")
    }

    /// Returns true for 2xx.
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status())
    }

    /// Returns true for 3xx.
    fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status())
    }

    /// Returns true if this is a redirect whose `Location` designates `target`.
    ///
    /// Relative targets and locations are joined to `base` before comparing, so
    /// `/foos/1` matches `http://test.host/foos/1`.
    fn is_redirect_to(&self, target: &str, base: &Url) -> bool {
        self.is_redirect()
            && self
                .location()
                .is_some_and(|location| normalize_url(location, base) == normalize_url(target, base))
    }
}

/// Joins `target` to `base`; unparseable targets are compared verbatim.
#[must_use]
pub fn normalize_url(target: &str, base: &Url) -> String {
    base.join(target.trim())
        .map_or_else(|_| target.trim().to_string(), String::from)
}
