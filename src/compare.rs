//! Consolidated two-group comparison report.
//!
//! One request runs the full inference battery for two independent samples:
//! observed mean difference and Cohen's d, a percentile bootstrap interval,
//! the permutation test, both parametric reference tests, and an analytical
//! power estimate at the observed effect size. Everything downstream of
//! input validation is deterministic for a fixed seed.

use serde::{Deserialize, Serialize};

use crate::data::{Alternative, SampleVector};
use crate::effect::{cohens_d, mean_difference};
use crate::error::Result;
use crate::parametric::{student_t_test, welch_t_test, TTest};
use crate::power::two_sample::{power_two_sample, ALPHA_MAX, ALPHA_MIN};
use crate::resample::bootstrap::bootstrap_ci_mean_diff;
use crate::resample::permutation::{
    permutation_test, PermutationConfig, MAX_PERMUTATIONS, MIN_PERMUTATIONS,
};
use crate::resample::{BootstrapInterval, PermutationTest};

const DEFAULT_PERMUTATIONS: usize = 5000;
const DEFAULT_ALPHA: f64 = 0.05;
const DEFAULT_SEED: u64 = 42;
// The bootstrap reuses the permutation count, capped at 10000 resamples.
const MAX_BOOTSTRAP_RESAMPLES: usize = 10_000;

/// A two-group comparison request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonRequest {
    pub group_a: Vec<f64>,
    pub group_b: Vec<f64>,
    pub alternative: Alternative,
    /// Resample count, clamped to the supported range at use.
    pub permutations: usize,
    /// Significance level, clamped to the supported range at use.
    pub alpha: f64,
    pub seed: u64,
}

impl Default for ComparisonRequest {
    fn default() -> Self {
        Self {
            group_a: Vec::new(),
            group_b: Vec::new(),
            alternative: Alternative::TwoSided,
            permutations: DEFAULT_PERMUTATIONS,
            alpha: DEFAULT_ALPHA,
            seed: DEFAULT_SEED,
        }
    }
}

impl ComparisonRequest {
    pub fn new(group_a: Vec<f64>, group_b: Vec<f64>) -> Self {
        Self {
            group_a,
            group_b,
            ..Default::default()
        }
    }

    pub fn with_alternative(mut self, alternative: Alternative) -> Self {
        self.alternative = alternative;
        self
    }

    pub fn with_permutations(mut self, permutations: usize) -> Self {
        self.permutations = permutations;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Analytical power estimate attached to a comparison report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerEstimate {
    pub method: String,
    pub value: f64,
}

/// Full report for one two-group comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupComparison {
    pub n_group_a: usize,
    pub n_group_b: usize,
    pub alternative: Alternative,
    /// Significance level actually used after clamping.
    pub alpha: f64,
    pub mean_diff: f64,
    pub effect_size_cohen_d: f64,
    pub bootstrap_ci_mean_diff: BootstrapInterval,
    pub permutation_test: PermutationTest,
    pub welch_t: TTest,
    pub student_t: TTest,
    pub power_estimate: PowerEstimate,
}

/// Validate a comparison request and run the full battery.
pub fn compare_groups(request: &ComparisonRequest) -> Result<GroupComparison> {
    let a = SampleVector::from_values("group_a", &request.group_a)?;
    let b = SampleVector::from_values("group_b", &request.group_b)?;

    let alpha = request.alpha.clamp(ALPHA_MIN, ALPHA_MAX);
    let permutations = request.permutations.clamp(MIN_PERMUTATIONS, MAX_PERMUTATIONS);

    let config = PermutationConfig::default()
        .with_permutations(permutations)
        .with_seed(request.seed);
    let permutation = permutation_test(&a, &b, request.alternative, &config);

    let mean_diff = mean_difference(&a, &b);
    let effect_size_cohen_d = cohens_d(&a, &b);
    let bootstrap = bootstrap_ci_mean_diff(
        &a,
        &b,
        1.0 - alpha,
        permutations.min(MAX_BOOTSTRAP_RESAMPLES),
        request.seed,
    )?;
    let welch = welch_t_test(&a, &b, request.alternative);
    let student = student_t_test(&a, &b, request.alternative);
    let power =
        power_two_sample(a.len(), b.len(), effect_size_cohen_d, alpha, request.alternative)?;

    Ok(GroupComparison {
        n_group_a: a.len(),
        n_group_b: b.len(),
        alternative: request.alternative,
        alpha,
        mean_diff,
        effect_size_cohen_d,
        bootstrap_ci_mean_diff: bootstrap,
        permutation_test: permutation,
        welch_t: welch,
        student_t: student,
        power_estimate: PowerEstimate {
            method: "noncentral-t approximation".to_string(),
            value: power.power,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatError;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_short_group() {
        let request = ComparisonRequest::new(vec![1.0], vec![2.0, 3.0]);
        assert!(matches!(
            compare_groups(&request),
            Err(StatError::EmptyData(_))
        ));
    }

    #[test]
    fn test_rejects_group_emptied_by_filtering() {
        let request =
            ComparisonRequest::new(vec![1.0, f64::NAN, f64::INFINITY], vec![2.0, 3.0]);
        assert!(matches!(
            compare_groups(&request),
            Err(StatError::EmptyData(_))
        ));
    }

    #[test]
    fn test_alpha_and_permutations_clamped() {
        let request = ComparisonRequest::new(
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![2.0, 3.0, 4.0, 5.0, 6.0],
        )
        .with_alpha(0.5)
        .with_permutations(1);
        let report = compare_groups(&request).unwrap();
        assert_relative_eq!(report.alpha, 0.25);
        assert_eq!(report.permutation_test.permutations_used, MIN_PERMUTATIONS);
    }

    #[test]
    fn test_identical_groups_show_no_effect() {
        let values = vec![2.0, 4.0, 6.0, 8.0, 10.0, 12.0];
        let request = ComparisonRequest::new(values.clone(), values);
        let report = compare_groups(&request).unwrap();
        assert_relative_eq!(report.mean_diff, 0.0);
        assert_relative_eq!(report.effect_size_cohen_d, 0.0);
        assert_relative_eq!(report.permutation_test.p_value, 1.0);
        assert!(report.bootstrap_ci_mean_diff.contains(0.0));
    }
}
