//! Running compiled checks.
//!
//! [`CheckSuite`] is the registry an example group hands its checks to, and
//! the runner that executes them.

mod suite;

pub use suite::CheckSuite;
