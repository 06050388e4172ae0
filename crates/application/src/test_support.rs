//! In-crate fakes for unit tests.

use std::sync::Arc;

use indexmap::IndexMap;
use respec_domain::{Context, ResolutionError, Value};

use crate::config::RespecConfig;
use crate::group::GroupDeps;
use crate::memoizer::{ActionFn, ActionScope};
use crate::ports::{Matcher, RecordSerializer, ResponseLike, SerializerSet, StateLike};

#[derive(Debug, Clone)]
pub struct FakeResponse {
    pub status: u16,
    pub body: String,
    pub headers: Vec<(String, String)>,
    pub template: Option<String>,
    pub assigns: IndexMap<String, Value>,
    pub flash: IndexMap<String, Value>,
    pub session: IndexMap<String, Value>,
}

impl Default for FakeResponse {
    fn default() -> Self {
        Self {
            status: 200,
            body: String::new(),
            headers: Vec::new(),
            template: None,
            assigns: IndexMap::new(),
            flash: IndexMap::new(),
            session: IndexMap::new(),
        }
    }
}

impl FakeResponse {
    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn template(mut self, template: &str) -> Self {
        self.template = Some(template.to_string());
        self
    }

    pub fn assign(mut self, key: &str, value: Value) -> Self {
        self.assigns.insert(key.to_string(), value);
        self
    }

    pub fn flash(mut self, key: &str, value: Value) -> Self {
        self.flash.insert(key.to_string(), value);
        self
    }

    pub fn session(mut self, key: &str, value: Value) -> Self {
        self.session.insert(key.to_string(), value);
        self
    }
}

impl ResponseLike for FakeResponse {
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

pub struct StrictMatcher;

impl Matcher for StrictMatcher {
    fn equals(&self, actual: &Value, expected: &Value) -> bool {
        actual == expected
    }
}

pub fn action_returning(response: FakeResponse) -> Arc<ActionFn<FakeResponse>> {
    Arc::new(move |_: &mut Context| Ok(response.clone()))
}

pub fn scope_for(response: FakeResponse, context: Context) -> Arc<ActionScope<FakeResponse>> {
    Arc::new(ActionScope::new("test", action_returning(response), context))
}

pub fn scope_with<F>(
    response: FakeResponse,
    context: Context,
    effect: F,
) -> Arc<ActionScope<FakeResponse>>
where
    F: Fn(&mut Context) + Send + Sync + 'static,
{
    let action: Arc<ActionFn<FakeResponse>> = Arc::new(move |ctx: &mut Context| {
        effect(ctx);
        Ok(response.clone())
    });
    Arc::new(ActionScope::new("test", action, context))
}

/// Serializes every format as compact JSON.
pub struct JsonOnly;

impl RecordSerializer for JsonOnly {
    fn serialize(&self, _name: &str, record: &Value) -> Result<String, ResolutionError> {
        serde_json::to_string(record).map_err(|err| ResolutionError::new("record", err.to_string()))
    }
}

impl SerializerSet for JsonOnly {
    fn for_format(&self, _extension: &str) -> Option<Arc<dyn RecordSerializer>> {
        Some(Arc::new(Self))
    }
}

pub fn deps() -> GroupDeps {
    GroupDeps::new(RespecConfig::default(), Arc::new(StrictMatcher), Arc::new(JsonOnly))
}
