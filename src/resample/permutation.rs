//! Permutation test for the difference of group means.
//!
//! # Algorithm
//!
//! 1. Pool both samples and fix the observed statistic `mean(a) - mean(b)`.
//! 2. Reassign the pooled values to two groups of the original sizes, either
//!    by enumerating every distinct partition (when there are no more of
//!    them than the requested resample count) or by seeded Monte-Carlo
//!    shuffling.
//! 3. The p-value is the share of reassignments at least as extreme as the
//!    observed statistic in the direction(s) of the alternative.
//!
//! On the Monte-Carlo path the observed arrangement counts as one of the
//! `R + 1` possible outcomes, so the p-value is never exactly zero. On the
//! exact path the observed partition is one of the enumerated ones and the
//! same guarantee holds.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::{Alternative, SampleVector};
use crate::descriptive;
use crate::resample::SimpleRng;

pub const MIN_PERMUTATIONS: usize = 200;
pub const MAX_PERMUTATIONS: usize = 200_000;

const DEFAULT_PERMUTATIONS: usize = 5000;
const DEFAULT_SEED: u64 = 42;

/// Configuration for the permutation test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermutationConfig {
    /// Requested number of resamples, clamped to the supported range at use.
    pub permutations: usize,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for PermutationConfig {
    fn default() -> Self {
        Self {
            permutations: DEFAULT_PERMUTATIONS,
            seed: DEFAULT_SEED,
        }
    }
}

impl PermutationConfig {
    /// Set the resample count.
    pub fn with_permutations(mut self, permutations: usize) -> Self {
        self.permutations = permutations;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn clamped_permutations(&self) -> usize {
        self.permutations.clamp(MIN_PERMUTATIONS, MAX_PERMUTATIONS)
    }
}

/// Result of a permutation test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermutationTest {
    /// Observed statistic, `mean(a) - mean(b)`.
    pub statistic: f64,
    /// Permutation p-value.
    pub p_value: f64,
    /// Number of reassignments in the reference distribution.
    pub permutations_used: usize,
    /// Whether every distinct partition was enumerated.
    pub exact: bool,
}

/// Run a permutation test on two independent samples.
pub fn permutation_test(
    a: &SampleVector,
    b: &SampleVector,
    alternative: Alternative,
    config: &PermutationConfig,
) -> PermutationTest {
    let n1 = a.len();
    let pooled: Vec<f64> = a
        .values()
        .iter()
        .chain(b.values().iter())
        .copied()
        .collect();
    let observed = a.mean() - b.mean();
    let requested = config.clamped_permutations();

    let exact_total = binomial(pooled.len() as u64, n1 as u64)
        .filter(|&total| total <= requested as u64);

    match exact_total {
        Some(total) => {
            let extreme = count_exact_extreme(&pooled, n1, observed, alternative);
            PermutationTest {
                statistic: observed,
                p_value: extreme as f64 / total as f64,
                permutations_used: total as usize,
                exact: true,
            }
        }
        None => {
            let extreme: u64 = (0..requested)
                .into_par_iter()
                .map(|i| {
                    let mut rng = SimpleRng::new(config.seed.wrapping_add(i as u64));
                    let mut shuffled = pooled.clone();
                    rng.shuffle(&mut shuffled);
                    let statistic = descriptive::mean(&shuffled[..n1])
                        - descriptive::mean(&shuffled[n1..]);
                    u64::from(is_extreme(statistic, observed, alternative))
                })
                .sum();
            PermutationTest {
                statistic: observed,
                p_value: (extreme + 1) as f64 / (requested + 1) as f64,
                permutations_used: requested,
                exact: false,
            }
        }
    }
}

/// Walk every size-`n1` subset of the pooled values in lexicographic order
/// and count the extreme ones. Group means are recovered from the subset sum
/// and the pooled total.
fn count_exact_extreme(
    pooled: &[f64],
    n1: usize,
    observed: f64,
    alternative: Alternative,
) -> u64 {
    let n = pooled.len();
    let n2 = n - n1;
    let total_sum: f64 = pooled.iter().sum();

    let mut indices: Vec<usize> = (0..n1).collect();
    let mut extreme = 0u64;
    loop {
        let sum_a: f64 = indices.iter().map(|&i| pooled[i]).sum();
        let statistic = sum_a / n1 as f64 - (total_sum - sum_a) / n2 as f64;
        if is_extreme(statistic, observed, alternative) {
            extreme += 1;
        }
        if !next_combination(&mut indices, n) {
            return extreme;
        }
    }
}

/// Advance `indices` to the next lexicographic combination of `0..n`.
/// Returns false once the last combination has been visited.
fn next_combination(indices: &mut [usize], n: usize) -> bool {
    let k = indices.len();
    let mut i = k;
    while i > 0 {
        i -= 1;
        if indices[i] != i + n - k {
            indices[i] += 1;
            for j in i + 1..k {
                indices[j] = indices[j - 1] + 1;
            }
            return true;
        }
    }
    false
}

fn is_extreme(statistic: f64, observed: f64, alternative: Alternative) -> bool {
    // Tolerance keeps ties stable under floating-point noise.
    let tol = 1e-12 * observed.abs().max(1.0);
    match alternative {
        Alternative::TwoSided => statistic.abs() >= observed.abs() - tol,
        Alternative::Greater => statistic >= observed - tol,
        Alternative::Less => statistic <= observed + tol,
    }
}

/// Exact binomial coefficient, `None` on u64 overflow. Overflow simply means
/// "more partitions than any supported resample count".
fn binomial(n: u64, k: u64) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut result = 1u64;
    for i in 0..k {
        result = result.checked_mul(n - i)?;
        result /= i + 1;
    }
    Some(result)
}
