//! Test catalog, eligibility checking and the battery runner.

use std::collections::HashSet;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::{Duration, Instant};

use crate::sp800_22::{
    ApproximateEntropy, BinaryMatrixRank, CumulativeSums, DiscreteFourierTransform,
    FrequencyWithinBlock, LinearComplexity, LongestRunOnesInABlock, MaurersUniversal, Monobit,
    NonOverlappingTemplateMatching, OverlappingTemplateMatching, RandomExcursion,
    RandomExcursionVariant, Runs, Serial,
};
use crate::{StatisticalTest, TestVerdict};

/// Fatal battery failures.
#[derive(Debug, thiserror::Error)]
pub enum BatteryError {
    #[error("eligibility map does not match catalog: {0}")]
    EligibilityMismatch(String),

    #[error("test '{test}' failed: {message}")]
    TestExecution { test: String, message: String },

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
}

/// Ordered, read-only collection of tests.
pub struct Catalog {
    tests: Vec<Box<dyn StatisticalTest>>,
}

impl Catalog {
    /// Build a catalog. Test names must be unique.
    pub fn new(tests: Vec<Box<dyn StatisticalTest>>) -> Result<Self, BatteryError> {
        let mut seen = HashSet::new();
        for test in &tests {
            if !seen.insert(test.name()) {
                return Err(BatteryError::InvalidCatalog(format!(
                    "duplicate test name '{}'",
                    test.name()
                )));
            }
        }
        Ok(Self { tests })
    }

    /// The fifteen SP 800-22 rev1a tests in their canonical order.
    pub fn sp800_22r1a() -> Self {
        Self {
            tests: vec![
                Box::new(Monobit),
                Box::new(FrequencyWithinBlock::default()),
                Box::new(Runs),
                Box::new(LongestRunOnesInABlock),
                Box::new(BinaryMatrixRank),
                Box::new(DiscreteFourierTransform),
                Box::new(NonOverlappingTemplateMatching::default()),
                Box::new(OverlappingTemplateMatching),
                Box::new(MaurersUniversal),
                Box::new(LinearComplexity),
                Box::new(Serial::default()),
                Box::new(ApproximateEntropy::default()),
                Box::new(CumulativeSums),
                Box::new(RandomExcursion),
                Box::new(RandomExcursionVariant),
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn StatisticalTest> {
        self.tests.iter().map(|t| t.as_ref())
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(|t| t.name()).collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::sp800_22r1a()
    }
}

/// Per-test eligibility for one bit stream, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eligibility {
    entries: Vec<(&'static str, bool)>,
}

impl Eligibility {
    pub fn from_entries(entries: Vec<(&'static str, bool)>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        self.entries.iter().copied()
    }

    pub fn eligible_names(&self) -> Vec<&'static str> {
        self.iter().filter(|&(_, ok)| ok).map(|(name, _)| name).collect()
    }

    /// `None` if `name` is not in the map.
    pub fn is_eligible(&self, name: &str) -> Option<bool> {
        self.iter().find(|&(n, _)| n == name).map(|(_, ok)| ok)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Evaluate every test's predicate against `bits`.
pub fn check_eligibility(bits: &[u8], catalog: &Catalog) -> Eligibility {
    let entries: Vec<(&'static str, bool)> = catalog
        .iter()
        .map(|test| (test.name(), test.is_eligible(bits)))
        .collect();
    let eligible = entries.iter().filter(|(_, ok)| *ok).count();
    log::info!(
        "{eligible}/{} tests eligible for {} bits",
        entries.len(),
        bits.len()
    );
    Eligibility { entries }
}

/// What to do when a single test errors or panics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record a FAILED verdict and keep going.
    #[default]
    Isolate,
    /// Stop the battery at the first failure.
    Abort,
}

/// Run every eligible test in catalog order.
pub fn run_battery(
    bits: &[u8],
    catalog: &Catalog,
    eligibility: &Eligibility,
    policy: FailurePolicy,
) -> Result<Vec<TestVerdict>, BatteryError> {
    if eligibility.len() != catalog.len() {
        return Err(BatteryError::EligibilityMismatch(format!(
            "{} entries for {} tests",
            eligibility.len(),
            catalog.len()
        )));
    }

    let mut verdicts = Vec::new();
    for (test, (name, eligible)) in catalog.iter().zip(eligibility.iter()) {
        if test.name() != name {
            return Err(BatteryError::EligibilityMismatch(format!(
                "expected '{}', found '{name}'",
                test.name()
            )));
        }
        if !eligible {
            continue;
        }
        if !test.is_eligible(bits) {
            return Err(BatteryError::EligibilityMismatch(format!(
                "'{name}' marked eligible but rejects {} bits",
                bits.len()
            )));
        }

        let start = Instant::now();
        let result = execute(test, bits);
        let elapsed = start.elapsed();
        log::debug!("{name}: {:.3} ms", elapsed.as_secs_f64() * 1000.0);

        let verdict = match result {
            Ok(outcome) => TestVerdict {
                name: name.to_string(),
                passed: outcome.passed,
                score: outcome.score,
                grade: test.grade(outcome.score),
                details: outcome.details,
                elapsed,
            },
            Err(message) => match policy {
                FailurePolicy::Abort => {
                    return Err(BatteryError::TestExecution {
                        test: name.to_string(),
                        message,
                    });
                }
                FailurePolicy::Isolate => {
                    log::warn!("{name} failed: {message}");
                    failed_verdict(name, message, elapsed)
                }
            },
        };
        verdicts.push(verdict);
    }
    Ok(verdicts)
}

/// Run one test, turning errors, panics and out-of-range scores into a message.
fn execute(test: &dyn StatisticalTest, bits: &[u8]) -> Result<crate::TestOutcome, String> {
    let outcome = match catch_unwind(AssertUnwindSafe(|| test.run(bits))) {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => return Err(e.to_string()),
        Err(panic) => return Err(panic_message(panic.as_ref())),
    };
    let range = test.score_range();
    if outcome.score.is_nan() || !range.contains(&outcome.score) {
        return Err(format!(
            "score {} outside {:?}",
            outcome.score, range
        ));
    }
    Ok(outcome)
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("test panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("test panicked: {s}")
    } else {
        "test panicked".to_string()
    }
}

fn failed_verdict(name: &str, message: String, elapsed: Duration) -> TestVerdict {
    TestVerdict {
        name: name.to_string(),
        passed: false,
        score: 0.0,
        grade: 'F',
        details: message,
        elapsed,
    }
}

/// Calculate overall quality score (0-100) from verdicts.
///
/// Each grade maps to a score: A=100, B=75, C=50, D=25, F=0.
/// Returns the average across all tests.
pub fn calculate_quality_score(verdicts: &[TestVerdict]) -> f64 {
    if verdicts.is_empty() {
        return 0.0;
    }
    let total: f64 = verdicts
        .iter()
        .map(|v| match v.grade {
            'A' => 100.0,
            'B' => 75.0,
            'C' => 50.0,
            'D' => 25.0,
            _ => 0.0,
        })
        .sum();
    total / verdicts.len() as f64
}
