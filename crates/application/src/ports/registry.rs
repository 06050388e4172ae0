//! Check registry port

use respec_domain::Check;

/// Hands checks to the external test runner.
///
/// Each registered check is an independently reported unit.
pub trait CheckRegistry {
    /// Registers one check.
    fn register(&mut self, check: Check);
}

impl CheckRegistry for Vec<Check> {
    fn register(&mut self, check: Check) {
        self.push(check);
    }
}
