//! In-memory response adapter
//!
//! Carries what a framework's test harness captures after dispatching an
//! action: status, headers, body, the rendered template and the flash,
//! session and assigned state.

use std::collections::HashMap;

use indexmap::IndexMap;
use respec_application::{ResponseLike, StateLike};
use respec_domain::{StatusCode, Value};
use serde::{Deserialize, Serialize};

use super::SessionStore;

/// Captured response of the action under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResponse {
    /// HTTP status code.
    pub status: u16,
    /// Headers in insertion order; lookups ignore case.
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    /// Response body.
    #[serde(default)]
    pub body: String,
    /// Template the action rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// State assigned for the view.
    #[serde(default)]
    pub assigns: SessionStore,
    /// Flash entries.
    #[serde(default)]
    pub flash: SessionStore,
    /// Session after the action.
    #[serde(default)]
    pub session: SessionStore,
}

impl Default for TestResponse {
    fn default() -> Self {
        Self::new(200)
    }
}

impl TestResponse {
    /// Creates an empty response with the given status.
    #[must_use]
    pub fn new(status: impl Into<StatusCode>) -> Self {
        Self {
            status: status.into().as_u16(),
            headers: IndexMap::new(),
            body: String::new(),
            template: None,
            assigns: SessionStore::new(),
            flash: SessionStore::new(),
            session: SessionStore::new(),
        }
    }

    /// Builds a response from raw parts. Invalid UTF-8 in the body is
    /// replaced.
    #[must_use]
    pub fn from_parts(
        status: impl Into<StatusCode>,
        headers: HashMap<String, String>,
        body: &[u8],
    ) -> Self {
        let mut response = Self::new(status);
        response.headers.extend(headers);
        response.body = String::from_utf8_lossy(body).into_owned();
        response
    }

    /// A `302 Found` to `location`.
    #[must_use]
    pub fn redirect(location: &str) -> Self {
        Self::new(302).with_header("Location", location)
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<StatusCode>) -> Self {
        self.status = status.into().as_u16();
        self
    }

    /// Sets a header, replacing any existing one of the same name.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(name));
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Sets `Content-Type`.
    #[must_use]
    pub fn with_content_type(self, content_type: &str) -> Self {
        self.with_header("Content-Type", content_type)
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Records the rendered template.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Assigns view state.
    #[must_use]
    pub fn assign(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.assigns.insert(key, value);
        self
    }

    /// Sets a flash entry.
    #[must_use]
    pub fn with_flash(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.flash.insert(key, value);
        self
    }

    /// Sets a session entry.
    #[must_use]
    pub fn with_session(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.session.insert(key, value);
        self
    }

    /// The status as a [`StatusCode`].
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::new(self.status)
    }
}

impl ResponseLike for TestResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn body(&self) -> &str {
        &self.body
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn rendered_template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    fn assigns(&self) -> &dyn StateLike {
        &self.assigns
    }

    fn flash(&self) -> &dyn StateLike {
        &self.flash
    }

    fn session(&self) -> &dyn StateLike {
        &self.session
    }
}
