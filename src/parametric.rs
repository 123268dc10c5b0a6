//! Reference parametric two-sample t tests.
//!
//! Closed-form Welch and Student statistics reported alongside the
//! resampling results so callers can cross-check the permutation p-value
//! against its parametric counterparts. A degenerate standard error
//! (constant samples) yields the neutral `statistic 0.0, p_value 1.0`
//! instead of NaN.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::data::{Alternative, SampleVector};

/// A two-sample t test summary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TTest {
    pub statistic: f64,
    pub p_value: f64,
    /// Degrees of freedom (fractional for Welch).
    pub df: f64,
}

/// Welch's unequal-variance t test.
pub fn welch_t_test(a: &SampleVector, b: &SampleVector, alternative: Alternative) -> TTest {
    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let v1 = a.sample_variance();
    let v2 = b.sample_variance();
    let se_sq = v1 / n1 + v2 / n2;
    if se_sq <= 0.0 || !se_sq.is_finite() {
        return TTest {
            statistic: 0.0,
            p_value: 1.0,
            df: (n1 + n2 - 2.0).max(1.0),
        };
    }
    // Welch-Satterthwaite degrees of freedom.
    let df = se_sq * se_sq
        / ((v1 / n1).powi(2) / (n1 - 1.0) + (v2 / n2).powi(2) / (n2 - 1.0));
    let statistic = (a.mean() - b.mean()) / se_sq.sqrt();
    TTest {
        statistic,
        p_value: t_tail_probability(statistic, df, alternative),
        df,
    }
}

/// Student's pooled-variance t test.
pub fn student_t_test(a: &SampleVector, b: &SampleVector, alternative: Alternative) -> TTest {
    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let df = (n1 + n2 - 2.0).max(1.0);
    let pooled =
        ((n1 - 1.0) * a.sample_variance() + (n2 - 1.0) * b.sample_variance()) / df;
    let se_sq = pooled * (1.0 / n1 + 1.0 / n2);
    if se_sq <= 0.0 || !se_sq.is_finite() {
        return TTest {
            statistic: 0.0,
            p_value: 1.0,
            df,
        };
    }
    let statistic = (a.mean() - b.mean()) / se_sq.sqrt();
    TTest {
        statistic,
        p_value: t_tail_probability(statistic, df, alternative),
        df,
    }
}

fn t_tail_probability(statistic: f64, df: f64, alternative: Alternative) -> f64 {
    let dist = match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => dist,
        Err(_) => return 1.0,
    };
    let p = match alternative {
        Alternative::TwoSided => 2.0 * (1.0 - dist.cdf(statistic.abs())),
        Alternative::Greater => 1.0 - dist.cdf(statistic),
        Alternative::Less => dist.cdf(statistic),
    };
    p.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample(name: &str, values: &[f64]) -> SampleVector {
        SampleVector::from_values(name, values).unwrap()
    }

    #[test]
    fn test_welch_reference() {
        let a = sample("a", &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let b = sample("b", &[2.0, 3.0, 4.0, 5.0, 6.0]);
        let result = welch_t_test(&a, &b, Alternative::TwoSided);
        assert_relative_eq!(result.statistic, -1.0, epsilon = 1e-12);
        assert_relative_eq!(result.df, 8.0, epsilon = 1e-9);
        assert_relative_eq!(result.p_value, 0.346594, epsilon = 1e-5);
    }

    #[test]
    fn test_student_matches_welch_for_equal_variances() {
        let a = sample("a", &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let b = sample("b", &[2.0, 3.0, 4.0, 5.0, 6.0]);
        let student = student_t_test(&a, &b, Alternative::TwoSided);
        let welch = welch_t_test(&a, &b, Alternative::TwoSided);
        assert_relative_eq!(student.statistic, welch.statistic, epsilon = 1e-12);
        assert_relative_eq!(student.p_value, welch.p_value, epsilon = 1e-9);
        assert_relative_eq!(student.df, 8.0);
    }

    #[test]
    fn test_one_sided_tails() {
        let a = sample("a", &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let b = sample("b", &[2.0, 3.0, 4.0, 5.0, 6.0]);
        let less = welch_t_test(&a, &b, Alternative::Less);
        assert_relative_eq!(less.p_value, 0.173297, epsilon = 1e-5);
        let greater = welch_t_test(&a, &b, Alternative::Greater);
        assert_relative_eq!(greater.p_value, 1.0 - 0.173297, epsilon = 1e-5);
    }

    #[test]
    fn test_degenerate_variance_is_neutral() {
        let a = sample("a", &[2.0, 2.0, 2.0]);
        let b = sample("b", &[2.0, 2.0]);
        let welch = welch_t_test(&a, &b, Alternative::TwoSided);
        assert_eq!(welch.statistic, 0.0);
        assert_eq!(welch.p_value, 1.0);
        let student = student_t_test(&a, &b, Alternative::TwoSided);
        assert_eq!(student.statistic, 0.0);
        assert_eq!(student.p_value, 1.0);
    }

    #[test]
    fn test_strong_difference_is_significant() {
        let a = sample("a", &[1.0, 1.1, 0.9, 1.2, 0.8, 1.0, 1.1, 0.9]);
        let b = sample("b", &[3.0, 3.1, 2.9, 3.2, 2.8, 3.0, 3.1, 2.9]);
        let result = welch_t_test(&a, &b, Alternative::TwoSided);
        assert!(result.p_value < 0.001);
        assert!(result.statistic < 0.0);
    }
}
