//! Check suite runner.
//!
//! Collects checks in registration order and runs them, producing a
//! [`SuiteReport`].

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use chrono::Utc;
use respec_application::CheckRegistry;
use respec_domain::{Check, CheckError, CheckResult, Outcome, SuiteReport, panic_message};
use tracing::{debug, info, warn};

/// Registry and runner for compiled checks.
#[derive(Debug, Default)]
pub struct CheckSuite {
    name: String,
    checks: Vec<Check>,
    stop_on_failure: bool,
}

impl CheckSuite {
    /// Create an empty suite.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checks: Vec::new(),
            stop_on_failure: false,
        }
    }

    /// Set whether to stop on the first failed or errored check.
    #[must_use]
    pub const fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    /// Suite name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered checks, in order.
    #[must_use]
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Number of registered checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Descriptions of the registered checks.
    pub fn descriptions(&self) -> impl Iterator<Item = &str> {
        self.checks.iter().map(Check::description)
    }

    /// Runs every check.
    #[must_use]
    pub fn run(&self) -> SuiteReport {
        self.run_matching(|_| true)
    }

    /// Runs only the checks whose description satisfies `filter`. The others
    /// are skipped entirely, so each selected check runs in isolation.
    #[must_use]
    pub fn run_matching<F>(&self, filter: F) -> SuiteReport
    where
        F: Fn(&str) -> bool,
    {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut results = Vec::new();

        for check in self.checks.iter().filter(|c| filter(c.description())) {
            let result = run_one(check);
            let stop = self.stop_on_failure && !result.outcome.is_pass();
            results.push(result);
            if stop {
                break;
            }
        }

        let report = SuiteReport::new(&self.name, started_at, results, elapsed_ms(start));
        info!(
            suite = %self.name,
            total = report.total,
            passed = report.passed,
            failed = report.failed,
            errored = report.errored,
            duration_ms = report.duration_ms,
            "suite finished"
        );
        report
    }
}

fn run_one(check: &Check) -> CheckResult {
    let start = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| check.run())).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        warn!(check = check.description(), %message, "check panicked");
        Outcome::Error(CheckError::Panicked { message })
    });
    match &outcome {
        Outcome::Pass => debug!(check = check.description(), "pass"),
        Outcome::Fail(reason) => debug!(check = check.description(), %reason, "fail"),
        Outcome::Error(reason) => debug!(check = check.description(), %reason, "error"),
    }
    CheckResult::new(check.description(), outcome, elapsed_ms(start))
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

impl CheckRegistry for CheckSuite {
    fn register(&mut self, check: Check) {
        self.checks.push(check);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn suite() -> CheckSuite {
        let mut suite = CheckSuite::new("FoosController");
        suite.register(Check::new("passes", || Ok(())));
        suite.register(Check::new("fails", || Err(CheckError::assertion("nope"))));
        suite.register(Check::new("passes again", || Ok(())));
        suite
    }

    #[test]
    fn test_run_reports_every_check() {
        let report = suite().run();
        assert_eq!(report.suite_name, "FoosController");
        assert_eq!(report.total, 3);
        assert_eq!(report.passed, 2);
        assert_eq!(report.failed, 1);
        assert!(!report.all_passed());
        assert_eq!(
            report.descriptions().collect::<Vec<_>>(),
            ["passes", "fails", "passes again"]
        );
    }

    #[test]
    fn test_stop_on_failure() {
        let report = suite().with_stop_on_failure(true).run();
        assert_eq!(report.total, 2);
    }

    #[test]
    fn test_run_matching() {
        let report = suite().run_matching(|d| d.starts_with("passes"));
        assert_eq!(report.total, 2);
        assert!(report.all_passed());
    }

    #[test]
    fn test_panicking_check_is_reported_and_run_continues() {
        let mut suite = CheckSuite::new("FoosController");
        suite.register(Check::new("panics", || panic!("index out of bounds")));
        suite.register(Check::new("passes", || Ok(())));

        let report = suite.run();
        assert_eq!(report.total, 2);
        assert_eq!(report.errored, 1);
        assert_eq!(report.passed, 1);
        assert_eq!(
            report.results[0].outcome,
            Outcome::Error(CheckError::Panicked {
                message: "index out of bounds".into()
            })
        );
    }
}
