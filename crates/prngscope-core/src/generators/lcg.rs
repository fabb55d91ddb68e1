//! Linear congruential generator.
//!
//! `x[0] = seed`, `x[i] = (a * x[i-1] + c) mod m`. The seed itself is not
//! emitted: a run of `size` values yields `x[1..=size]`.
//!
//! With the default constants `a = 6097 ≡ 1 (mod 127)` and
//! `c = 749060 ≡ 14 (mod 127)`, so the stream simply walks the residues in
//! steps of 14 and most of the battery rejects it.

use serde::{Deserialize, Serialize};

use crate::bits::BitPacking;
use crate::error::{Error, Result};
use crate::generator::{Generator, GeneratorInfo, GeneratorKind, Sequence};

/// Recurrence constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LcgParams {
    pub multiplier: i64,
    pub increment: i64,
    pub modulus: i64,
}

impl Default for LcgParams {
    fn default() -> Self {
        Self {
            multiplier: 6097,
            increment: 749_060,
            modulus: 127,
        }
    }
}

impl LcgParams {
    /// Check the constants describe a usable recurrence.
    pub fn validate(&self) -> Result<()> {
        if self.modulus < 2 {
            return Err(Error::Generation(format!(
                "LCG modulus must be at least 2, got {}",
                self.modulus
            )));
        }
        if self.multiplier < 0 || self.increment < 0 {
            return Err(Error::Generation(format!(
                "LCG multiplier and increment must be non-negative, got a={} c={}",
                self.multiplier, self.increment
            )));
        }
        Ok(())
    }

    /// One step of the recurrence. `x` must already lie in `[0, m)`.
    fn step(&self, x: i64) -> Result<i64> {
        self.multiplier
            .checked_mul(x)
            .and_then(|ax| ax.checked_add(self.increment))
            .map(|v| v.rem_euclid(self.modulus))
            .ok_or_else(|| {
                Error::Generation(format!(
                    "LCG overflow computing {} * {x} + {}",
                    self.multiplier, self.increment
                ))
            })
    }
}

/// Linear congruential generator with minimal-width bit packing.
pub struct LcgGenerator {
    params: LcgParams,
    info: GeneratorInfo,
}

impl LcgGenerator {
    pub fn new(params: LcgParams) -> Self {
        Self {
            params,
            info: GeneratorInfo {
                kind: GeneratorKind::Lcg,
                label: "LCG",
                heatmap_title: "Binary Sequence LCG",
                range: 0..params.modulus.max(0),
                packing: BitPacking::Minimal,
            },
        }
    }
}

impl Default for LcgGenerator {
    fn default() -> Self {
        Self::new(LcgParams::default())
    }
}

impl Generator for LcgGenerator {
    fn info(&self) -> &GeneratorInfo {
        &self.info
    }

    fn generate(&self, seed: i64, size: usize) -> Result<Sequence> {
        self.params.validate()?;
        // (a*s + c) mod m == (a*(s mod m) + c) mod m, and reducing first keeps
        // arbitrary i64 seeds away from overflow.
        let mut x = seed.rem_euclid(self.params.modulus);
        let mut values = Vec::with_capacity(size);
        for _ in 0..size {
            x = self.params.step(x)?;
            values.push(x);
        }
        log::debug!("lcg: seed={seed} size={size} params={:?}", self.params);
        Ok(Sequence::new(values, self.info.packing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(seed: i64, size: usize) -> Vec<i64> {
        let (a, c, m) = (6097i64, 749_060i64, 127i64);
        let mut x = seed;
        (0..size)
            .map(|_| {
                x = (a * x + c).rem_euclid(m);
                x
            })
            .collect()
    }

    #[test]
    fn test_seed_one_exact_values() {
        let seq = LcgGenerator::default().generate(1, 5).unwrap();
        assert_eq!(seq.values(), &[15, 29, 43, 57, 71]);
        assert_eq!(seq.values()[0], (6097 + 749_060) % 127);
    }

    #[test]
    fn test_seed_42_exact_values() {
        let seq = LcgGenerator::default().generate(42, 10).unwrap();
        assert_eq!(seq.values(), &[56, 70, 84, 98, 112, 126, 13, 27, 41, 55]);
    }

    #[test]
    fn test_matches_recurrence() {
        for seed in [0, 1, 7, 126, 127, 10_000] {
            let seq = LcgGenerator::default().generate(seed, 300).unwrap();
            assert_eq!(seq.values(), reference(seed, 300).as_slice());
        }
    }

    #[test]
    fn test_deterministic() {
        let g = LcgGenerator::default();
        assert_eq!(g.generate(99, 64).unwrap(), g.generate(99, 64).unwrap());
    }

    #[test]
    fn test_range_invariant() {
        let seq = LcgGenerator::default().generate(3, 1000).unwrap();
        assert!(seq.values().iter().all(|&v| (0..127).contains(&v)));
    }

    #[test]
    fn test_negative_seed_uses_euclidean_modulo() {
        let seq = LcgGenerator::default().generate(-5, 3).unwrap();
        assert_eq!(seq.values(), &[9, 23, 37]);
    }

    #[test]
    fn test_extreme_seed_does_not_overflow() {
        let seq = LcgGenerator::default().generate(i64::MAX, 4).unwrap();
        assert_eq!(seq.len(), 4);
        let seq = LcgGenerator::default().generate(i64::MIN, 4).unwrap();
        assert_eq!(seq.len(), 4);
    }

    #[test]
    fn test_zero_size() {
        let seq = LcgGenerator::default().generate(1, 0).unwrap();
        assert!(seq.is_empty());
    }

    #[test]
    fn test_invalid_modulus() {
        let g = LcgGenerator::new(LcgParams {
            modulus: 1,
            ..LcgParams::default()
        });
        assert!(matches!(g.generate(1, 3), Err(Error::Generation(_))));
    }

    #[test]
    fn test_negative_multiplier_rejected() {
        let g = LcgGenerator::new(LcgParams {
            multiplier: -3,
            ..LcgParams::default()
        });
        assert!(matches!(g.generate(1, 3), Err(Error::Generation(_))));
    }

    #[test]
    fn test_overflow_is_generation_error() {
        let g = LcgGenerator::new(LcgParams {
            multiplier: i64::MAX,
            increment: 1,
            modulus: i64::MAX,
        });
        assert!(matches!(g.generate(5, 2), Err(Error::Generation(_))));
    }

    #[test]
    fn test_info() {
        let g = LcgGenerator::default();
        assert_eq!(g.info().label, "LCG");
        assert_eq!(g.info().heatmap_title, "Binary Sequence LCG");
        assert_eq!(g.info().range, 0..127);
        assert_eq!(g.info().packing, BitPacking::Minimal);
    }
}
