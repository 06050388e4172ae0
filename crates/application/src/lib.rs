//! Respec Application - Expansion engine of the declarative response DSL
//!
//! This crate compiles declarations into checks: the per-declaration action
//! memoizer, the value-set expander, the family compilers and the status and
//! content-type builders. External collaborators are reached through the
//! traits in [`ports`].

pub mod assertions;
pub mod compilers;
pub mod config;
pub mod error;
pub mod expander;
pub mod group;
pub mod memoizer;
pub mod ports;

#[cfg(test)]
mod test_support;

pub use assertions::{content_type_check, status_check};
pub use compilers::compile;
pub use config::{DEFAULT_BASE_URL, RespecConfig};
pub use error::{ApplicationError, ApplicationResult};
pub use expander::{Observed, StateFamily, expand};
pub use group::{ExampleGroup, GroupDeps};
pub use memoizer::{ActionFn, ActionScope};
pub use ports::{
    CheckRegistry, Matcher, RecordSerializer, ResponseLike, SerializerSet, StateLike,
    normalize_url,
};
