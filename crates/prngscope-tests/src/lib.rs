//! NIST SP 800-22 rev1a test battery over packed bit streams.
//!
//! The battery runs in two phases. [`check_eligibility`] decides, per test,
//! whether a bit stream is long enough for the test to mean anything.
//! [`run_battery`] then executes exactly the eligible tests, in catalog order,
//! and returns one [`TestVerdict`] per test.
//!
//! Each test implements [`StatisticalTest`] and reports a p-value as its
//! score. A test passes when the score is at least [`ALPHA`].

use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

pub mod battery;
pub mod sp800_22;

pub use battery::{
    BatteryError, Catalog, Eligibility, FailurePolicy, calculate_quality_score,
    check_eligibility, run_battery,
};

/// Significance level for pass/fail.
pub const ALPHA: f64 = 0.01;

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

/// What a single test run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TestOutcome {
    pub passed: bool,
    pub score: f64,
    pub details: String,
}

impl TestOutcome {
    /// Score a p-value against [`ALPHA`].
    pub fn from_p(p: f64, details: impl Into<String>) -> Self {
        Self {
            passed: pass_from_p(p, ALPHA),
            score: p,
            details: details.into(),
        }
    }
}

/// Error raised by a test that cannot compute its statistic.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct TestError(pub String);

impl TestError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A named statistical test over a bit slice (one 0/1 per element).
pub trait StatisticalTest: Send + Sync {
    /// Display name. Unique within a catalog.
    fn name(&self) -> &'static str;

    /// Shortest stream this test accepts.
    fn min_bits(&self) -> usize;

    /// Eligibility predicate. Must stay true when `bits` is extended.
    fn is_eligible(&self, bits: &[u8]) -> bool {
        bits.len() >= self.min_bits()
    }

    /// Range every valid score falls in.
    fn score_range(&self) -> RangeInclusive<f64> {
        0.0..=1.0
    }

    /// Letter grade for a score.
    fn grade(&self, score: f64) -> char {
        grade_from_p(Some(score))
    }

    fn run(&self, bits: &[u8]) -> Result<TestOutcome, TestError>;
}

/// Result of one test within a battery run.
#[derive(Debug, Clone, PartialEq)]
pub struct TestVerdict {
    pub name: String,
    pub passed: bool,
    pub score: f64,
    pub grade: char,
    pub details: String,
    pub elapsed: Duration,
}

impl TestVerdict {
    /// Score rounded to three decimals, as printed.
    pub fn rounded_score(&self) -> f64 {
        (self.score * 1000.0).round() / 1000.0
    }

    /// Wall-clock time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    pub fn label(&self) -> &'static str {
        if self.passed { "PASSED" } else { "FAILED" }
    }
}

impl fmt::Display for TestVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - score: {} - {} - elapsed time: {} ms",
            self.label(),
            self.rounded_score(),
            self.name,
            self.elapsed.as_millis()
        )
    }
}

/// Assign a letter grade based on p-value.
///
/// - A: p >= 0.1
/// - B: p >= 0.01
/// - C: p >= 0.001
/// - D: p >= 0.0001
/// - F: otherwise or None
pub fn grade_from_p(p: Option<f64>) -> char {
    match p {
        Some(p) if p >= 0.1 => 'A',
        Some(p) if p >= 0.01 => 'B',
        Some(p) if p >= 0.001 => 'C',
        Some(p) if p >= 0.0001 => 'D',
        _ => 'F',
    }
}

/// Determine pass/fail from p-value against a threshold.
pub fn pass_from_p(p: f64, threshold: f64) -> bool {
    p >= threshold
}
