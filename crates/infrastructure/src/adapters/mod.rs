//! Adapters for the application ports.

mod equality;
mod session_store;
mod test_response;

pub use equality::{LenientEquality, StrictEquality};
pub use session_store::SessionStore;
pub use test_response::TestResponse;
