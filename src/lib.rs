//! Statistical power, sample size, and resampling inference.
//!
//! This library estimates statistical power and required sample sizes for
//! repeated-measures and independent two-group designs, and runs
//! resampling-based inference (permutation tests, percentile bootstrap
//! intervals) on raw sample vectors.
//!
//! # Overview
//!
//! The library is organized into composable modules:
//!
//! - **data**: Validated input types (SampleVector, Alternative, EffectSize)
//! - **distribution**: Central and noncentral F/t evaluation
//! - **effect**: Effect size conversions (Cohen's f, Cohen's d, eta squared)
//! - **power**: Power evaluation and the sample-size search
//! - **resample**: Permutation test and bootstrap interval engines
//! - **parametric**: Welch and Student reference t tests
//! - **compare**: The consolidated two-group comparison report
//!
//! Every operation is a pure function of its inputs: resampling draws from a
//! seeded generator, so identical requests produce identical results.
//!
//! # Example
//!
//! ```
//! use statpower::prelude::*;
//!
//! let request = ComparisonRequest::new(
//!     vec![4.1, 3.8, 5.0, 4.4, 4.7],
//!     vec![5.2, 5.6, 4.9, 5.8, 5.4],
//! );
//! let report = compare_groups(&request).unwrap();
//! assert!(report.mean_diff < 0.0);
//! assert!(report.permutation_test.p_value > 0.0);
//! assert!(report.bootstrap_ci_mean_diff.low <= report.bootstrap_ci_mean_diff.high);
//! ```

pub mod compare;
pub mod data;
pub mod descriptive;
pub mod distribution;
pub mod effect;
pub mod error;
pub mod parametric;
pub mod power;
pub mod resample;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::compare::{compare_groups, ComparisonRequest, GroupComparison, PowerEstimate};
    pub use crate::data::{Alternative, EffectSize, SampleVector};
    pub use crate::effect::{
        cohens_d, cohens_f_from_f_statistic, cohens_f_from_partial_eta_squared,
        mean_difference, partial_eta_squared_from_cohens_f,
    };
    pub use crate::error::{Result, StatError};
    pub use crate::parametric::{student_t_test, welch_t_test, TTest};
    pub use crate::power::{
        analyze_rm_anova, observed_power_rm_anova, power_two_sample, required_sample_size,
        ObservedPower, PowerInterpretation, PowerMode, PowerResult, RequiredSampleSize,
        RmAnovaAnalysis, RmAnovaRequest, SampleSizeResult,
    };
    pub use crate::resample::{
        bootstrap_ci_mean_diff, permutation_test, BootstrapInterval, PermutationConfig,
        PermutationTest,
    };
}
