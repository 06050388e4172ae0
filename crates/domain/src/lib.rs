//! Respec Domain - Core types of the declarative response DSL
//!
//! This crate defines declarations, expected-value specifiers, the example
//! context, status and MIME tables, checks and their outcomes.
//! All types here are pure Rust with no I/O dependencies.

pub mod check;
pub mod content_type;
pub mod context;
pub mod declaration;
pub mod error;
pub mod expected;
pub mod report;
pub mod status;

pub use check::{Check, CheckFn, Outcome};
pub use content_type::{
    ContentTypeSpecifier, DEFAULT_FORMAT, DEFAULT_STRUCTURED_FORMAT, MimeTable,
};
pub use context::{Context, Value, ValuePath};
pub use declaration::{
    AssignsArgs, Declaration, DeclarationKind, Fragment, RenderFn, RenderOptions, Route, RouteFn,
};
pub use error::{
    ActionError, CheckError, DomainError, DomainResult, ResolutionError, panic_message,
};
pub use expected::{DeferredFn, DeferredValue, Expectations, Expected};
pub use report::{CheckResult, SuiteReport};
pub use status::{StatusCode, StatusSpecifier, StatusTable};
