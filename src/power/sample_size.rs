//! Sample-size search for repeated-measures designs.
//!
//! Power is monotonically non-decreasing in the subject count when every
//! other parameter is held fixed, so the smallest sufficient n is found by
//! binary search over [2, 1000]. The search stops early once achieved power
//! is within 0.01 of the target; if the tolerance is never met inside the
//! iteration limit the current upper bound is returned rather than an error.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatError};
use crate::power::noncentral_f_power;
use crate::power::rm_anova::{ALPHA_MAX, ALPHA_MIN};

pub const MIN_SUBJECTS: usize = 2;
pub const MAX_SUBJECTS: usize = 1000;

const MAX_ITERATIONS: usize = 100;
const POWER_TOLERANCE: f64 = 0.01;

/// Outcome of the sample-size search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SampleSizeResult {
    /// Smallest subject count found.
    pub n: usize,
    /// Power actually achieved at `n`.
    pub achieved_power: f64,
}

/// Find the smallest subject count reaching `target_power` for a
/// repeated-measures design with `num_timepoints` conditions and effect size
/// `effect_size_f` (Cohen's f).
///
/// `target_power` is clamped to [0.50, 0.99] and `alpha` to the supported
/// repeated-measures range before the search.
pub fn required_sample_size(
    effect_size_f: f64,
    num_timepoints: usize,
    target_power: f64,
    alpha: f64,
) -> Result<SampleSizeResult> {
    if effect_size_f <= 0.0 || !effect_size_f.is_finite() {
        return Err(StatError::InvalidParameter(format!(
            "effect size must be positive, got {}",
            effect_size_f
        )));
    }
    if num_timepoints < 2 {
        return Err(StatError::InvalidParameter(
            "number of timepoints (k) must be at least 2".into(),
        ));
    }
    let target_power = target_power.clamp(0.50, 0.99);
    let alpha = alpha.clamp(ALPHA_MIN, ALPHA_MAX);
    let df_between = num_timepoints - 1;

    let mut n_min = MIN_SUBJECTS;
    let mut n_max = MAX_SUBJECTS;
    for _ in 0..MAX_ITERATIONS {
        let n = (n_min + n_max) / 2;
        match power_at(n, effect_size_f, df_between, alpha) {
            Ok(power) => {
                if (power - target_power).abs() < POWER_TOLERANCE {
                    return Ok(SampleSizeResult {
                        n,
                        achieved_power: power,
                    });
                }
                if power < target_power {
                    n_min = n + 1;
                } else {
                    n_max = n - 1;
                }
            }
            // A failed evaluation behaves like insufficient power.
            Err(_) => n_min = n + 1,
        }
    }

    let n = n_max.max(MIN_SUBJECTS);
    let achieved_power = power_at(n, effect_size_f, df_between, alpha).unwrap_or(target_power);
    Ok(SampleSizeResult { n, achieved_power })
}

fn power_at(n: usize, effect_size_f: f64, df_between: usize, alpha: f64) -> Result<f64> {
    let df_error = n.saturating_sub(1) * df_between;
    let lambda = n as f64 * effect_size_f * effect_size_f * df_between as f64;
    noncentral_f_power(df_between, df_error, lambda, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_medium_effect_three_timepoints() {
        let result = required_sample_size(0.25, 3, 0.80, 0.05).unwrap();
        assert_eq!(result.n, 78);
        assert_relative_eq!(result.achieved_power, 0.796787, epsilon = 1e-4);
        assert!((result.achieved_power - 0.80).abs() <= 0.02);
    }

    #[test]
    fn test_large_effect_three_timepoints() {
        let result = required_sample_size(0.40, 3, 0.80, 0.05).unwrap();
        assert_eq!(result.n, 32);
        assert_relative_eq!(result.achieved_power, 0.805104, epsilon = 1e-4);
    }

    #[test]
    fn test_small_effect_two_timepoints() {
        let result = required_sample_size(0.10, 2, 0.80, 0.05).unwrap();
        assert_eq!(result.n, 782);
        assert_relative_eq!(result.achieved_power, 0.797585, epsilon = 1e-4);
    }

    #[test]
    fn test_fallback_when_tolerance_never_met() {
        // Large effect: power jumps across the 0.01 window between n=8 and
        // n=9, so the search exhausts its budget and returns its bound.
        let f = (8.0f64 / 11.0).sqrt();
        let result = required_sample_size(f, 3, 0.80, 0.05).unwrap();
        assert_eq!(result.n, 8);
        assert_relative_eq!(result.achieved_power, 0.785986, epsilon = 1e-4);
    }

    #[test]
    fn test_higher_target_needs_more_subjects() {
        let at_80 = required_sample_size(0.25, 3, 0.80, 0.05).unwrap();
        let at_90 = required_sample_size(0.25, 3, 0.90, 0.05).unwrap();
        assert_eq!(at_90.n, 102);
        assert!(at_90.n >= at_80.n);
    }

    #[test]
    fn test_result_stays_in_bounds() {
        for &(f, k) in &[(0.05, 2usize), (5.0, 2), (0.25, 6), (3.0, 10)] {
            let result = required_sample_size(f, k, 0.80, 0.05).unwrap();
            assert!(
                (MIN_SUBJECTS..=MAX_SUBJECTS).contains(&result.n),
                "n = {} out of bounds for f = {}, k = {}",
                result.n,
                f,
                k
            );
        }
    }

    #[test]
    fn test_target_power_clamped() {
        let clamped = required_sample_size(0.25, 3, 0.999, 0.05).unwrap();
        let explicit = required_sample_size(0.25, 3, 0.99, 0.05).unwrap();
        assert_eq!(clamped.n, explicit.n);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(required_sample_size(0.0, 3, 0.80, 0.05).is_err());
        assert!(required_sample_size(-0.5, 3, 0.80, 0.05).is_err());
        assert!(required_sample_size(f64::NAN, 3, 0.80, 0.05).is_err());
        assert!(required_sample_size(0.25, 1, 0.80, 0.05).is_err());
    }

    #[test]
    fn test_power_monotone_in_n() {
        // The search assumes this; check it explicitly on a realistic grid.
        let f = 0.25f64;
        let df_between = 2;
        let mut last = 0.0;
        for n in (10..200).step_by(10) {
            let power = power_at(n, f, df_between, 0.05).unwrap();
            assert!(
                power >= last - 1e-9,
                "power not monotone at n = {}: {} < {}",
                n,
                power,
                last
            );
            last = power;
        }
    }
}
