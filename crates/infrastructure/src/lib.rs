//! Respec Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports defined in the
//! application layer: an in-memory response, equality matchers, XML and JSON
//! record serializers, the suite runner, configuration loading and tracing
//! setup.

pub mod adapters;
pub mod config;
pub mod defaults;
pub mod serialization;
pub mod telemetry;
pub mod testing;

pub use adapters::{LenientEquality, SessionStore, StrictEquality, TestResponse};
pub use config::{ConfigError, config_from_json, config_from_yaml, load_config};
pub use defaults::{default_deps, example_group};
pub use serialization::{
    DefaultSerializers, JsonSerializer, SerializationError, XmlSerializer, from_json,
};
pub use telemetry::init_tracing;
pub use testing::CheckSuite;
