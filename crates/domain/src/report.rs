//! Check results and suite reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::check::Outcome;

/// Result of running a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// The check's description.
    pub description: String,
    /// What happened.
    pub outcome: Outcome,
    /// Execution time in milliseconds.
    pub duration_ms: u64,
}

impl CheckResult {
    /// Creates a result.
    #[must_use]
    pub fn new(description: impl Into<String>, outcome: Outcome, duration_ms: u64) -> Self {
        Self {
            description: description.into(),
            outcome,
            duration_ms,
        }
    }
}

/// Results from running a set of checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Unique identifier of this run.
    pub id: Uuid,
    /// Suite name (usually the example group name).
    pub suite_name: String,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Individual results, in run order.
    pub results: Vec<CheckResult>,
    /// Total number of checks run.
    pub total: usize,
    /// Checks that passed.
    pub passed: usize,
    /// Checks whose assertion did not hold.
    pub failed: usize,
    /// Checks that could not be evaluated.
    pub errored: usize,
    /// Execution time in milliseconds.
    pub duration_ms: u64,
}

impl SuiteReport {
    /// Creates a report, computing the counts.
    #[must_use]
    pub fn new(
        suite_name: impl Into<String>,
        started_at: DateTime<Utc>,
        results: Vec<CheckResult>,
        duration_ms: u64,
    ) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.outcome.is_pass()).count();
        let failed = results.iter().filter(|r| r.outcome.is_fail()).count();
        let errored = total - passed - failed;

        Self {
            id: Uuid::now_v7(),
            suite_name: suite_name.into(),
            started_at,
            results,
            total,
            passed,
            failed,
            errored,
            duration_ms,
        }
    }

    /// Check if all checks passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }

    /// Get pass rate as percentage.
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let rate = (self.passed as f64 / self.total as f64) * 100.0;
            rate
        }
    }

    /// Finds the result for a description.
    #[must_use]
    pub fn result(&self, description: &str) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.description == description)
    }

    /// Descriptions of all results, in run order.
    pub fn descriptions(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(|r| r.description.as_str())
    }
}
