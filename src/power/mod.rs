//! Power evaluation for the supported designs.
//!
//! Two branches exist: repeated-measures ANOVA against the noncentral F
//! distribution, and the independent two-sample t test against the
//! noncentral t distribution. Both are pure functions of their inputs.

pub mod rm_anova;
pub mod sample_size;
pub mod two_sample;

pub use rm_anova::{
    analyze_rm_anova, observed_power_rm_anova, ObservedPower, PowerMode, RequiredSampleSize,
    RmAnovaAnalysis, RmAnovaRequest,
};
pub use sample_size::{required_sample_size, SampleSizeResult};
pub use two_sample::power_two_sample;

use serde::{Deserialize, Serialize};

use crate::distribution::{f_quantile, noncentral_f_cdf};
use crate::error::Result;

/// Qualitative reading of a power figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerInterpretation {
    Excellent,
    Good,
    Moderate,
    Low,
    VeryLow,
}

impl PowerInterpretation {
    pub fn from_power(power: f64) -> Self {
        if power >= 0.90 {
            PowerInterpretation::Excellent
        } else if power >= 0.80 {
            PowerInterpretation::Good
        } else if power >= 0.60 {
            PowerInterpretation::Moderate
        } else if power >= 0.40 {
            PowerInterpretation::Low
        } else {
            PowerInterpretation::VeryLow
        }
    }

    /// One-sentence reading of the band, suitable for reports.
    pub fn describe(&self) -> &'static str {
        match self {
            PowerInterpretation::Excellent => {
                "Excellent power - very likely to detect true effects"
            }
            PowerInterpretation::Good => "Good power - adequate for most research purposes",
            PowerInterpretation::Moderate => "Moderate power - may miss some true effects",
            PowerInterpretation::Low => "Low power - likely to miss true effects",
            PowerInterpretation::VeryLow => {
                "Very low power - insufficient to detect effects reliably"
            }
        }
    }
}

/// A power figure in [0, 1] with its qualitative interpretation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PowerResult {
    pub power: f64,
    pub interpretation: PowerInterpretation,
}

impl PowerResult {
    pub fn from_power(power: f64) -> Self {
        let power = power.clamp(0.0, 1.0);
        Self {
            power,
            interpretation: PowerInterpretation::from_power(power),
        }
    }
}

/// Rejection probability of the F test at level `alpha` under the noncentral
/// alternative with noncentrality `lambda`.
pub(crate) fn noncentral_f_power(
    df_between: usize,
    df_error: usize,
    lambda: f64,
    alpha: f64,
) -> Result<f64> {
    let df1 = df_between as f64;
    let df2 = df_error as f64;
    let f_crit = f_quantile(1.0 - alpha, df1, df2)?;
    let power = 1.0 - noncentral_f_cdf(f_crit, df1, df2, lambda)?;
    Ok(power.clamp(0.0, 1.0))
}
