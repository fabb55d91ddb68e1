//! NIST SP 800-22 rev1a statistical tests over bit slices.
//!
//! Every test consumes `&[u8]` holding one bit (0 or 1) per element and scores
//! its p-value. Tests that produce several p-values score the smallest.
//! Minimum lengths live in [`StatisticalTest::min_bits`]; `run` only refuses
//! inputs on which the statistic is undefined.

use rustfft::{FftPlanner, num_complex::Complex};
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};
use statrs::function::erf::erfc;

use crate::{StatisticalTest, TestError, TestOutcome};

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

/// Upper tail of the chi-squared distribution, i.e. `igamc(df/2, x/2)`.
fn chi2_sf(df: f64, x: f64) -> Result<f64, TestError> {
    let dist = ChiSquared::new(df)
        .map_err(|e| TestError::new(format!("chi-squared with df={df}: {e}")))?;
    Ok(dist.sf(x))
}

fn require(bits: &[u8], needed: usize) -> Result<usize, TestError> {
    let n = bits.len();
    if n < needed {
        return Err(TestError::new(format!(
            "insufficient data: need {needed} bits, got {n}"
        )));
    }
    Ok(n)
}

fn ones(bits: &[u8]) -> usize {
    bits.iter().map(|&b| b as usize).sum()
}

/// Count m-bit patterns over all `n` overlapping windows, wrapping at the end.
fn pattern_counts(bits: &[u8], m: usize) -> Vec<u64> {
    let n = bits.len();
    let mut counts = vec![0u64; 1usize << m];
    if m == 0 || n == 0 {
        return counts;
    }
    let mask = (1usize << m) - 1;
    let mut val = 0usize;
    for j in 0..m - 1 {
        val = (val << 1) | bits[j % n] as usize;
    }
    for i in 0..n {
        val = ((val << 1) | bits[(i + m - 1) % n] as usize) & mask;
        counts[val] += 1;
    }
    counts
}

fn floor_log2(n: usize) -> usize {
    if n == 0 { 0 } else { (usize::BITS - 1 - n.leading_zeros()) as usize }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 1. FREQUENCY TESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Test 1: Monobit -- proportion of ones should be close to 1/2.
pub struct Monobit;

impl StatisticalTest for Monobit {
    fn name(&self) -> &'static str {
        "Monobit"
    }

    fn min_bits(&self) -> usize {
        100
    }

    fn run(&self, bits: &[u8]) -> Result<TestOutcome, TestError> {
        let n = require(bits, 1)?;
        let s: i64 = bits.iter().map(|&b| if b == 1 { 1i64 } else { -1i64 }).sum();
        let s_obs = (s as f64).abs() / (n as f64).sqrt();
        let p = erfc(s_obs / 2.0_f64.sqrt());
        Ok(TestOutcome::from_p(p, format!("S={s}, n={n}")))
    }
}

/// Test 2: Frequency within block -- chi-squared over the ones ratio of M-bit blocks.
///
/// By default `M = max(20, ceil(n / 99))`, which keeps the block count under 100.
#[derive(Default)]
pub struct FrequencyWithinBlock {
    block_size: Option<usize>,
}

impl FrequencyWithinBlock {
    pub fn with_block_size(block_size: usize) -> Self {
        Self {
            block_size: Some(block_size),
        }
    }

    fn block_size_for(&self, n: usize) -> usize {
        self.block_size.unwrap_or_else(|| 20.max(n.div_ceil(99)))
    }
}

impl StatisticalTest for FrequencyWithinBlock {
    fn name(&self) -> &'static str {
        "Frequency Within Block"
    }

    fn min_bits(&self) -> usize {
        100
    }

    fn run(&self, bits: &[u8]) -> Result<TestOutcome, TestError> {
        let n = bits.len();
        let m = self.block_size_for(n);
        if m == 0 {
            return Err(TestError::new("block size must be positive"));
        }
        let num_blocks = n / m;
        if num_blocks == 0 {
            return Err(TestError::new(format!("no complete {m}-bit block in {n} bits")));
        }
        let chi2: f64 = bits
            .chunks_exact(m)
            .map(|block| {
                let proportion = ones(block) as f64 / m as f64;
                (proportion - 0.5) * (proportion - 0.5)
            })
            .sum::<f64>()
            * 4.0
            * m as f64;
        let p = chi2_sf(num_blocks as f64, chi2)?;
        Ok(TestOutcome::from_p(p, format!("blocks={num_blocks}, M={m}, chi2={chi2:.4}")))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 2. RUNS TESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Test 3: Runs -- number of uninterrupted runs of identical bits.
pub struct Runs;

impl StatisticalTest for Runs {
    fn name(&self) -> &'static str {
        "Runs"
    }

    fn min_bits(&self) -> usize {
        100
    }

    fn run(&self, bits: &[u8]) -> Result<TestOutcome, TestError> {
        let n = require(bits, 2)?;
        let prop = ones(bits) as f64 / n as f64;
        // Frequency pre-test: a biased stream fails outright.
        if (prop - 0.5).abs() >= 2.0 / (n as f64).sqrt() {
            return Ok(TestOutcome::from_p(
                0.0,
                format!("pre-test failed: proportion={prop:.4}"),
            ));
        }
        let runs = 1 + bits.windows(2).filter(|w| w[0] != w[1]).count();
        let expected = 2.0 * n as f64 * prop * (1.0 - prop);
        let z = (runs as f64 - expected).abs()
            / (2.0 * (2.0 * n as f64).sqrt() * prop * (1.0 - prop));
        let p = erfc(z / 2.0_f64.sqrt());
        Ok(TestOutcome::from_p(p, format!("runs={runs}, expected={expected:.1}")))
    }
}

/// Block size, bin floor and class probabilities for the longest-run test.
struct LongestRunTable {
    block_size: usize,
    min_run: usize,
    probs: &'static [f64],
}

const LONGEST_RUN_M8: LongestRunTable = LongestRunTable {
    block_size: 8,
    min_run: 1,
    probs: &[0.2148, 0.3672, 0.2305, 0.1875],
};

const LONGEST_RUN_M128: LongestRunTable = LongestRunTable {
    block_size: 128,
    min_run: 4,
    probs: &[0.1174, 0.2430, 0.2493, 0.1752, 0.1027, 0.1124],
};

const LONGEST_RUN_M10000: LongestRunTable = LongestRunTable {
    block_size: 10_000,
    min_run: 10,
    probs: &[0.0882, 0.2092, 0.2483, 0.1933, 0.1208, 0.0675, 0.0727],
};

/// Test 4: Longest run of ones in a block -- chi-squared against the
/// theoretical distribution. M is 8, 128 or 10 000 depending on length.
pub struct LongestRunOnesInABlock;

impl LongestRunOnesInABlock {
    fn table(n: usize) -> &'static LongestRunTable {
        if n < 6272 {
            &LONGEST_RUN_M8
        } else if n < 750_000 {
            &LONGEST_RUN_M128
        } else {
            &LONGEST_RUN_M10000
        }
    }
}

impl StatisticalTest for LongestRunOnesInABlock {
    fn name(&self) -> &'static str {
        "Longest Run Ones In A Block"
    }

    fn min_bits(&self) -> usize {
        128
    }

    fn run(&self, bits: &[u8]) -> Result<TestOutcome, TestError> {
        let table = Self::table(bits.len());
        let num_blocks = bits.len() / table.block_size;
        if num_blocks == 0 {
            return Err(TestError::new("no complete block"));
        }
        let classes = table.probs.len();
        let mut observed = vec![0u64; classes];
        for block in bits.chunks_exact(table.block_size) {
            let mut max_run = 0usize;
            let mut current = 0usize;
            for &bit in block {
                if bit == 1 {
                    current += 1;
                    max_run = max_run.max(current);
                } else {
                    current = 0;
                }
            }
            let class = max_run.clamp(table.min_run, table.min_run + classes - 1) - table.min_run;
            observed[class] += 1;
        }
        let n_f = num_blocks as f64;
        let chi2: f64 = observed
            .iter()
            .zip(table.probs)
            .map(|(&o, &pi)| {
                let expected = n_f * pi;
                (o as f64 - expected).powi(2) / expected
            })
            .sum();
        let p = chi2_sf((classes - 1) as f64, chi2)?;
        Ok(TestOutcome::from_p(
            p,
            format!("blocks={num_blocks}, M={}, counts={observed:?}", table.block_size),
        ))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 3. MATRIX AND SPECTRAL TESTS
// ═══════════════════════════════════════════════════════════════════════════════

const MATRIX_ROWS: usize = 32;
const MATRIX_COLS: usize = 32;

/// GF(2) Gaussian elimination to compute binary matrix rank.
fn gf2_rank(matrix: &[u8], rows: usize, cols: usize) -> usize {
    let mut m: Vec<Vec<u8>> = (0..rows)
        .map(|r| matrix[r * cols..(r + 1) * cols].to_vec())
        .collect();
    let mut rank = 0;
    for col in 0..cols {
        let pivot = (rank..rows).find(|&row| m[row][col] == 1);
        let Some(pivot) = pivot else {
            continue;
        };
        m.swap(rank, pivot);
        for row in 0..rows {
            if row != rank && m[row][col] == 1 {
                let rank_row = m[rank].clone();
                for (m_c, r_c) in m[row].iter_mut().zip(rank_row.iter()) {
                    *m_c ^= r_c;
                }
            }
        }
        rank += 1;
        if rank == rows {
            break;
        }
    }
    rank
}

/// Test 5: Binary matrix rank -- rank distribution of disjoint 32x32 matrices.
pub struct BinaryMatrixRank;

impl StatisticalTest for BinaryMatrixRank {
    fn name(&self) -> &'static str {
        "Binary Matrix Rank"
    }

    fn min_bits(&self) -> usize {
        38 * MATRIX_ROWS * MATRIX_COLS
    }

    fn run(&self, bits: &[u8]) -> Result<TestOutcome, TestError> {
        let per_matrix = MATRIX_ROWS * MATRIX_COLS;
        let num_matrices = bits.len() / per_matrix;
        if num_matrices == 0 {
            return Err(TestError::new("no complete matrix"));
        }
        let mut full_rank = 0u64;
        let mut rank_m1 = 0u64;
        for matrix in bits.chunks_exact(per_matrix) {
            match gf2_rank(matrix, MATRIX_ROWS, MATRIX_COLS) {
                r if r == MATRIX_ROWS => full_rank += 1,
                r if r == MATRIX_ROWS - 1 => rank_m1 += 1,
                _ => {}
            }
        }
        let rest = num_matrices as u64 - full_rank - rank_m1;
        let n_f = num_matrices as f64;
        let (p_full, p_m1, p_rest) = (0.2888, 0.5776, 0.1336);
        let chi2 = (full_rank as f64 - n_f * p_full).powi(2) / (n_f * p_full)
            + (rank_m1 as f64 - n_f * p_m1).powi(2) / (n_f * p_m1)
            + (rest as f64 - n_f * p_rest).powi(2) / (n_f * p_rest);
        let p = chi2_sf(2.0, chi2)?;
        Ok(TestOutcome::from_p(
            p,
            format!("N={num_matrices}, full={full_rank}, full-1={rank_m1}"),
        ))
    }
}

/// Test 6: Discrete Fourier transform -- peaks above the 95% threshold.
pub struct DiscreteFourierTransform;

impl StatisticalTest for DiscreteFourierTransform {
    fn name(&self) -> &'static str {
        "Discrete Fourier Transform"
    }

    fn min_bits(&self) -> usize {
        1000
    }

    fn run(&self, bits: &[u8]) -> Result<TestOutcome, TestError> {
        let n = require(bits, 2)?;
        let mut buffer: Vec<Complex<f64>> = bits
            .iter()
            .map(|&b| Complex {
                re: if b == 1 { 1.0 } else { -1.0 },
                im: 0.0,
            })
            .collect();

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(n);
        fft.process(&mut buffer);

        let half = n / 2;
        let threshold = ((1.0_f64 / 0.05).ln() * n as f64).sqrt();
        let n0 = 0.95 * half as f64;
        let n1 = buffer[..half].iter().filter(|c| c.norm() < threshold).count();
        let d = (n1 as f64 - n0) / (n as f64 * 0.95 * 0.05 / 4.0).sqrt();
        let p = erfc(d.abs() / 2.0_f64.sqrt());
        Ok(TestOutcome::from_p(
            p,
            format!("peaks_below_threshold={n1}/{half}, d={d:.4}"),
        ))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 4. TEMPLATE TESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Test 7: Non-overlapping template matching -- occurrences of an aperiodic
/// template in N blocks, skipping past each hit.
pub struct NonOverlappingTemplateMatching {
    template: &'static [u8],
    blocks: usize,
}

impl Default for NonOverlappingTemplateMatching {
    fn default() -> Self {
        Self {
            template: &[0, 0, 0, 0, 0, 0, 0, 0, 1],
            blocks: 8,
        }
    }
}

impl NonOverlappingTemplateMatching {
    pub fn with_template(template: &'static [u8], blocks: usize) -> Self {
        Self { template, blocks }
    }
}

impl StatisticalTest for NonOverlappingTemplateMatching {
    fn name(&self) -> &'static str {
        "Non Overlapping Template Matching"
    }

    fn min_bits(&self) -> usize {
        4096
    }

    fn run(&self, bits: &[u8]) -> Result<TestOutcome, TestError> {
        let m = self.template.len();
        let big_n = self.blocks;
        if m == 0 || big_n == 0 {
            return Err(TestError::new("template and block count must be non-empty"));
        }
        let block_len = bits.len() / big_n;
        if block_len < m {
            return Err(TestError::new(format!(
                "blocks of {block_len} bits cannot hold a {m}-bit template"
            )));
        }
        let two_m = 2f64.powi(m as i32);
        let mu = (block_len - m + 1) as f64 / two_m;
        let var = block_len as f64 * (1.0 / two_m - (2.0 * m as f64 - 1.0) / (two_m * two_m));
        let mut chi2 = 0.0;
        let mut counts = Vec::with_capacity(big_n);
        for block in bits.chunks_exact(block_len).take(big_n) {
            let mut hits = 0u64;
            let mut i = 0;
            while i + m <= block_len {
                if block[i..i + m] == *self.template {
                    hits += 1;
                    i += m;
                } else {
                    i += 1;
                }
            }
            chi2 += (hits as f64 - mu).powi(2) / var;
            counts.push(hits);
        }
        let p = chi2_sf(big_n as f64, chi2)?;
        Ok(TestOutcome::from_p(
            p,
            format!("W={counts:?}, mu={mu:.2}, M={block_len}"),
        ))
    }
}

/// Test 8: Overlapping template matching -- runs of nine ones in 1032-bit blocks.
pub struct OverlappingTemplateMatching;

const OVERLAP_TEMPLATE_LEN: usize = 9;
const OVERLAP_BLOCK_LEN: usize = 1032;
const OVERLAP_PROBS: [f64; 6] = [0.364091, 0.185659, 0.139381, 0.100571, 0.070432, 0.139865];

impl StatisticalTest for OverlappingTemplateMatching {
    fn name(&self) -> &'static str {
        "Overlapping Template Matching"
    }

    fn min_bits(&self) -> usize {
        1_000_000
    }

    fn run(&self, bits: &[u8]) -> Result<TestOutcome, TestError> {
        let m = OVERLAP_TEMPLATE_LEN;
        let num_blocks = bits.len() / OVERLAP_BLOCK_LEN;
        if num_blocks == 0 {
            return Err(TestError::new("no complete block"));
        }
        let mut observed = [0u64; 6];
        for block in bits.chunks_exact(OVERLAP_BLOCK_LEN) {
            let hits = block
                .windows(m)
                .filter(|w| w.iter().all(|&b| b == 1))
                .count();
            observed[hits.min(5)] += 1;
        }
        let n_f = num_blocks as f64;
        let chi2: f64 = observed
            .iter()
            .zip(OVERLAP_PROBS.iter())
            .map(|(&o, &pi)| (o as f64 - n_f * pi).powi(2) / (n_f * pi))
            .sum();
        let p = chi2_sf(5.0, chi2)?;
        Ok(TestOutcome::from_p(
            p,
            format!("N={num_blocks}, counts={observed:?}"),
        ))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 5. COMPRESSION AND COMPLEXITY TESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// (L, minimum n, expected value, variance) for Maurer's test.
const MAURER_TABLE: [(usize, usize, f64, f64); 11] = [
    (6, 387_840, 5.217_705_2, 2.954),
    (7, 904_960, 6.196_250_7, 3.125),
    (8, 2_068_480, 7.183_665_6, 3.238),
    (9, 4_654_080, 8.176_424_8, 3.311),
    (10, 10_342_400, 9.172_324_3, 3.356),
    (11, 22_753_280, 10.170_032, 3.384),
    (12, 49_643_520, 11.168_765, 3.401),
    (13, 107_560_960, 12.168_070, 3.410),
    (14, 231_669_760, 13.167_693, 3.416),
    (15, 496_435_200, 14.167_488, 3.419),
    (16, 1_059_061_760, 15.167_379, 3.421),
];

/// Test 9: Maurer's universal statistical test -- distance between repeated
/// L-bit patterns, a proxy for compressibility.
pub struct MaurersUniversal;

impl StatisticalTest for MaurersUniversal {
    fn name(&self) -> &'static str {
        "Maurers Universal"
    }

    fn min_bits(&self) -> usize {
        MAURER_TABLE[0].1
    }

    fn run(&self, bits: &[u8]) -> Result<TestOutcome, TestError> {
        let n = bits.len();
        let &(l, _, expected, variance) = MAURER_TABLE
            .iter()
            .rev()
            .find(|&&(_, min_n, _, _)| n >= min_n)
            .ok_or_else(|| TestError::new(format!("insufficient data: {n} bits")))?;
        let q = 10 * (1usize << l);
        let total_blocks = n / l;
        let k = total_blocks - q;

        let block_at = |i: usize| -> usize {
            bits[i * l..(i + 1) * l]
                .iter()
                .fold(0usize, |acc, &b| (acc << 1) | b as usize)
        };

        let mut table = vec![0usize; 1 << l];
        for i in 0..q {
            table[block_at(i)] = i + 1;
        }
        let mut sum = 0.0f64;
        for i in q..q + k {
            let block = block_at(i);
            sum += ((i + 1 - table[block]) as f64).log2();
            table[block] = i + 1;
        }

        let fn_val = sum / k as f64;
        let l_f = l as f64;
        let c = 0.7 - 0.8 / l_f + (4.0 + 32.0 / l_f) * (k as f64).powf(-3.0 / l_f) / 15.0;
        let sigma = c * (variance / k as f64).sqrt();
        let p = erfc((fn_val - expected).abs() / (2.0_f64.sqrt() * sigma));
        Ok(TestOutcome::from_p(
            p,
            format!("fn={fn_val:.6}, expected={expected:.6}, L={l}, K={k}"),
        ))
    }
}

/// Berlekamp-Massey algorithm for binary sequences. Returns the LFSR complexity.
fn berlekamp_massey(seq: &[u8]) -> usize {
    let n = seq.len();
    let mut c = vec![0u8; n + 1];
    let mut b = vec![0u8; n + 1];
    c[0] = 1;
    b[0] = 1;
    let mut l: usize = 0;
    let mut m: isize = -1;

    for ni in 0..n {
        let mut d: u8 = seq[ni];
        for i in 1..=l {
            d ^= c[i] & seq[ni - i];
        }
        if d == 1 {
            let t = c.clone();
            let shift = (ni as isize - m) as usize;
            for i in shift..=n {
                c[i] ^= b[i - shift];
            }
            if l <= ni / 2 {
                l = ni + 1 - l;
                m = ni as isize;
                b = t;
            }
        }
    }
    l
}

const LINEAR_COMPLEXITY_BLOCK: usize = 500;
const LINEAR_COMPLEXITY_PROBS: [f64; 7] =
    [0.010417, 0.03125, 0.125, 0.5, 0.25, 0.0625, 0.020833];

/// Test 10: Linear complexity -- Berlekamp-Massey LFSR length of 500-bit blocks.
pub struct LinearComplexity;

impl StatisticalTest for LinearComplexity {
    fn name(&self) -> &'static str {
        "Linear Complexity"
    }

    fn min_bits(&self) -> usize {
        1_000_000
    }

    fn run(&self, bits: &[u8]) -> Result<TestOutcome, TestError> {
        let block = LINEAR_COMPLEXITY_BLOCK;
        let num_blocks = bits.len() / block;
        if num_blocks == 0 {
            return Err(TestError::new("no complete block"));
        }
        let m = block as f64;
        // (-1)^M and (-1)^(M+1)
        let (sign_m, sign_m1) = if block % 2 == 0 { (1.0, -1.0) } else { (-1.0, 1.0) };
        let mu = m / 2.0 + (9.0 + sign_m1) / 36.0 - (m / 3.0 + 2.0 / 9.0) / 2.0_f64.powf(m);

        let mut observed = [0u64; 7];
        for chunk in bits.chunks_exact(block) {
            let l = berlekamp_massey(chunk) as f64;
            let t = sign_m * (l - mu) + 2.0 / 9.0;
            let bin = if t <= -2.5 {
                0
            } else if t <= -1.5 {
                1
            } else if t <= -0.5 {
                2
            } else if t <= 0.5 {
                3
            } else if t <= 1.5 {
                4
            } else if t <= 2.5 {
                5
            } else {
                6
            };
            observed[bin] += 1;
        }

        let n_f = num_blocks as f64;
        let chi2: f64 = observed
            .iter()
            .zip(LINEAR_COMPLEXITY_PROBS.iter())
            .map(|(&o, &pi)| (o as f64 - n_f * pi).powi(2) / (n_f * pi))
            .sum();
        let p = chi2_sf(6.0, chi2)?;
        Ok(TestOutcome::from_p(
            p,
            format!("N={num_blocks}, counts={observed:?}"),
        ))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 6. SERIAL TESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// psi-squared statistic for the serial test.
fn psi_sq(bits: &[u8], m: usize) -> f64 {
    if m == 0 {
        return 0.0;
    }
    let n = bits.len() as f64;
    let sum_sq: f64 = pattern_counts(bits, m)
        .iter()
        .map(|&c| (c as f64) * (c as f64))
        .sum();
    sum_sq * (1u64 << m) as f64 / n - n
}

/// Test 11: Serial -- uniformity of all overlapping m-bit patterns.
///
/// By default `m = clamp(floor(log2 n) - 3, 2, 16)`.
#[derive(Default)]
pub struct Serial {
    pattern_len: Option<usize>,
}

impl Serial {
    pub fn with_pattern_len(m: usize) -> Self {
        Self {
            pattern_len: Some(m),
        }
    }
}

impl StatisticalTest for Serial {
    fn name(&self) -> &'static str {
        "Serial"
    }

    fn min_bits(&self) -> usize {
        100
    }

    fn run(&self, bits: &[u8]) -> Result<TestOutcome, TestError> {
        let n = require(bits, 1)?;
        let m = self
            .pattern_len
            .unwrap_or_else(|| floor_log2(n).saturating_sub(3).clamp(2, 16));
        if m < 2 {
            return Err(TestError::new("pattern length must be at least 2"));
        }
        let psi_m = psi_sq(bits, m);
        let psi_m1 = psi_sq(bits, m - 1);
        let psi_m2 = psi_sq(bits, m - 2);
        let del1 = psi_m - psi_m1;
        let del2 = psi_m - 2.0 * psi_m1 + psi_m2;
        let p1 = chi2_sf((1u64 << (m - 1)) as f64, del1)?;
        let p2 = chi2_sf((1u64 << (m - 2)) as f64, del2)?;
        Ok(TestOutcome::from_p(
            p1.min(p2),
            format!("m={m}, p1={p1:.6}, p2={p2:.6}"),
        ))
    }
}

/// Test 12: Approximate entropy -- frequency of m vs m+1 bit patterns.
///
/// By default `m = clamp(floor(log2 n) - 6, 2, 10)`.
#[derive(Default)]
pub struct ApproximateEntropy {
    pattern_len: Option<usize>,
}

impl ApproximateEntropy {
    pub fn with_pattern_len(m: usize) -> Self {
        Self {
            pattern_len: Some(m),
        }
    }
}

impl StatisticalTest for ApproximateEntropy {
    fn name(&self) -> &'static str {
        "Approximate Entropy"
    }

    fn min_bits(&self) -> usize {
        256
    }

    fn run(&self, bits: &[u8]) -> Result<TestOutcome, TestError> {
        let n = require(bits, 1)?;
        let m = self
            .pattern_len
            .unwrap_or_else(|| floor_log2(n).saturating_sub(6).clamp(2, 10));

        let phi = |block_len: usize| -> f64 {
            if block_len == 0 {
                return 0.0;
            }
            pattern_counts(bits, block_len)
                .iter()
                .filter(|&&c| c > 0)
                .map(|&c| {
                    let p = c as f64 / n as f64;
                    p * p.ln()
                })
                .sum()
        };

        let apen = phi(m) - phi(m + 1);
        let chi2 = 2.0 * n as f64 * (std::f64::consts::LN_2 - apen);
        let p = chi2_sf((1u64 << m) as f64, chi2)?;
        Ok(TestOutcome::from_p(p, format!("ApEn={apen:.6}, m={m}")))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 7. RANDOM WALK TESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// One direction of the cumulative sums test.
fn cusum_p(bits: impl Iterator<Item = u8>, n: usize) -> (f64, i64) {
    let mut s: i64 = 0;
    let mut z: i64 = 0;
    for bit in bits {
        s += if bit == 1 { 1 } else { -1 };
        z = z.max(s.abs());
    }
    let norm = Normal::standard();
    let n_i = n as i64;
    let sqrt_n = (n as f64).sqrt();
    let zf = z as f64;
    // Integer division truncates toward zero, as the reference bounds expect.
    let mut sum1 = 0.0;
    for k in ((-n_i / z + 1) / 4)..=((n_i / z - 1) / 4) {
        let kf = k as f64;
        sum1 += norm.cdf((4.0 * kf + 1.0) * zf / sqrt_n) - norm.cdf((4.0 * kf - 1.0) * zf / sqrt_n);
    }
    let mut sum2 = 0.0;
    for k in ((-n_i / z - 3) / 4)..=((n_i / z - 1) / 4) {
        let kf = k as f64;
        sum2 += norm.cdf((4.0 * kf + 3.0) * zf / sqrt_n) - norm.cdf((4.0 * kf + 1.0) * zf / sqrt_n);
    }
    ((1.0 - sum1 + sum2).clamp(0.0, 1.0), z)
}

/// Test 13: Cumulative sums -- maximal excursion of the ±1 random walk, forward
/// and backward.
pub struct CumulativeSums;

impl StatisticalTest for CumulativeSums {
    fn name(&self) -> &'static str {
        "Cumulative Sums"
    }

    fn min_bits(&self) -> usize {
        100
    }

    fn run(&self, bits: &[u8]) -> Result<TestOutcome, TestError> {
        let n = require(bits, 1)?;
        let (p_fwd, z_fwd) = cusum_p(bits.iter().copied(), n);
        let (p_bwd, z_bwd) = cusum_p(bits.iter().rev().copied(), n);
        Ok(TestOutcome::from_p(
            p_fwd.min(p_bwd),
            format!("forward p={p_fwd:.6} (z={z_fwd}), backward p={p_bwd:.6} (z={z_bwd})"),
        ))
    }
}

/// Random excursion tests need at least this many zero-crossing cycles.
const MIN_CYCLES: usize = 500;

/// Number of cycles of the ±1 walk: one per return to zero, plus a final
/// cycle when the walk does not end at zero.
///
/// Extending the stream never removes a return to zero, so this count never
/// shrinks under prefix extension.
pub fn excursion_cycles(bits: &[u8]) -> usize {
    let mut s: i64 = 0;
    let mut zeros = 0usize;
    for &bit in bits {
        s += if bit == 1 { 1 } else { -1 };
        if s == 0 {
            zeros += 1;
        }
    }
    if s != 0 { zeros + 1 } else { zeros }
}

fn excursion_eligible(bits: &[u8], min_bits: usize) -> bool {
    bits.len() >= min_bits && excursion_cycles(bits) >= MIN_CYCLES
}

/// Probabilities that a cycle visits state `x` exactly k times (k = 0..=4) or
/// at least 5 times.
fn excursion_probs(x: i64) -> [f64; 6] {
    let a = x.unsigned_abs() as f64;
    let q = 1.0 - 1.0 / (2.0 * a);
    let mut probs = [0.0; 6];
    probs[0] = q;
    for (k, p) in probs.iter_mut().enumerate().take(5).skip(1) {
        *p = 1.0 / (4.0 * a * a) * q.powi(k as i32 - 1);
    }
    probs[5] = 1.0 / (2.0 * a) * q.powi(4);
    probs
}

/// Test 14: Random excursions -- visits to states ±1..±4 per walk cycle.
pub struct RandomExcursion;

const EXCURSION_STATES: [i64; 8] = [-4, -3, -2, -1, 1, 2, 3, 4];

impl StatisticalTest for RandomExcursion {
    fn name(&self) -> &'static str {
        "Random Excursion"
    }

    fn min_bits(&self) -> usize {
        1_000_000
    }

    fn is_eligible(&self, bits: &[u8]) -> bool {
        excursion_eligible(bits, self.min_bits())
    }

    fn run(&self, bits: &[u8]) -> Result<TestOutcome, TestError> {
        // visits[cycle-local][state index], flushed at each return to zero.
        let mut cycle_visits = [0usize; 8];
        let mut table = [[0u64; 6]; 8];
        let mut cycles = 0usize;
        let mut s: i64 = 0;

        let mut flush = |visits: &mut [usize; 8]| {
            for (state, &count) in visits.iter().enumerate() {
                table[state][count.min(5)] += 1;
            }
            *visits = [0; 8];
        };

        for &bit in bits {
            s += if bit == 1 { 1 } else { -1 };
            if s == 0 {
                flush(&mut cycle_visits);
                cycles += 1;
            } else if let Some(idx) = EXCURSION_STATES.iter().position(|&x| x == s) {
                cycle_visits[idx] += 1;
            }
        }
        if s != 0 {
            flush(&mut cycle_visits);
            cycles += 1;
        }
        if cycles == 0 {
            return Err(TestError::new("walk has no cycles"));
        }

        let j = cycles as f64;
        let mut p_values = Vec::with_capacity(8);
        for (idx, &x) in EXCURSION_STATES.iter().enumerate() {
            let probs = excursion_probs(x);
            let chi2: f64 = table[idx]
                .iter()
                .zip(probs.iter())
                .map(|(&v, &pi)| (v as f64 - j * pi).powi(2) / (j * pi))
                .sum();
            p_values.push(chi2_sf(5.0, chi2)?);
        }
        let p = p_values.iter().copied().fold(1.0, f64::min);
        Ok(TestOutcome::from_p(p, format!("J={cycles}, min over 8 states")))
    }
}

/// Test 15: Random excursions variant -- total visits to states ±1..±9.
pub struct RandomExcursionVariant;

impl StatisticalTest for RandomExcursionVariant {
    fn name(&self) -> &'static str {
        "Random Excursion Variant"
    }

    fn min_bits(&self) -> usize {
        1_000_000
    }

    fn is_eligible(&self, bits: &[u8]) -> bool {
        excursion_eligible(bits, self.min_bits())
    }

    fn run(&self, bits: &[u8]) -> Result<TestOutcome, TestError> {
        let cycles = excursion_cycles(bits);
        if cycles == 0 {
            return Err(TestError::new("walk has no cycles"));
        }
        let mut visits = [0u64; 19];
        let mut s: i64 = 0;
        for &bit in bits {
            s += if bit == 1 { 1 } else { -1 };
            if (-9..=9).contains(&s) {
                visits[(s + 9) as usize] += 1;
            }
        }
        let j = cycles as f64;
        let p = (-9i64..=9)
            .filter(|&x| x != 0)
            .map(|x| {
                let xi = visits[(x + 9) as usize] as f64;
                erfc((xi - j).abs() / (2.0 * j * (4.0 * x.unsigned_abs() as f64 - 2.0)).sqrt())
            })
            .fold(1.0, f64::min);
        Ok(TestOutcome::from_p(p, format!("J={cycles}, min over 18 states")))
    }
}
