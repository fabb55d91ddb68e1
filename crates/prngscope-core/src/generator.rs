//! Abstract sequence generator trait and the sequences it produces.
//!
//! Every generator implements the [`Generator`] trait, which provides metadata
//! via [`GeneratorInfo`] and deterministic sequence generation. A generator is a
//! pure function of `(seed, size)`: it holds no state between calls.

use std::ops::Range;

use crate::bits::BitPacking;
use crate::error::Result;

/// Family of pseudorandom generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    /// Linear congruential recurrence.
    Lcg,
    /// MT19937 Mersenne Twister.
    MersenneTwister,
}

impl std::fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lcg => write!(f, "lcg"),
            Self::MersenneTwister => write!(f, "mersenne"),
        }
    }
}

/// Metadata about a generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorInfo {
    /// Generator family.
    pub kind: GeneratorKind,
    /// Label used in report headers (e.g. `"LCG"`).
    pub label: &'static str,
    /// Title of the heat-map panel (e.g. `"Binary Sequence LCG"`).
    pub heatmap_title: &'static str,
    /// Half-open range every emitted value lies in.
    pub range: Range<i64>,
    /// How values of this generator are serialized into bits.
    pub packing: BitPacking,
}

/// Trait that every sequence generator must implement.
pub trait Generator: Send + Sync {
    /// Generator metadata.
    fn info(&self) -> &GeneratorInfo;

    /// Produce exactly `size` values for `seed`. Identical inputs give
    /// identical output.
    fn generate(&self, seed: i64, size: usize) -> Result<Sequence>;

    /// Convenience: report label from info.
    fn label(&self) -> &'static str {
        self.info().label
    }
}

/// An ordered, fixed-length list of generated values.
///
/// The sequence remembers the packing convention of the generator that
/// produced it, so [`crate::bits::pack`] needs no extra context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    values: Vec<i64>,
    packing: BitPacking,
}

impl Sequence {
    pub fn new(values: Vec<i64>, packing: BitPacking) -> Self {
        Self { values, packing }
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn packing(&self) -> BitPacking {
        self.packing
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
