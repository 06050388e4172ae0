//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the expansion engine and the external
//! collaborators: the framework's response objects, the equality matcher,
//! record serializers and the test runner's registry.
//! Each port is a trait implemented by adapters in the infrastructure layer.

mod matcher;
mod registry;
mod response;
mod serializer;

pub use matcher::Matcher;
pub use registry::CheckRegistry;
pub use response::{ResponseLike, StateLike, normalize_url};
pub use serializer::{RecordSerializer, SerializerSet};
