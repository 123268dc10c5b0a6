//! Observed power and request analysis for repeated-measures ANOVA.
//!
//! # Algorithm
//!
//! Observed power compares the critical F value at the requested alpha with
//! the noncentral F distribution whose noncentrality is taken from the
//! observed statistic, `lambda = F * df_between`:
//!
//! 1. `f_crit = F_quantile(1 - alpha, df_between, df_error)`
//! 2. `power = 1 - ncF_cdf(f_crit, df_between, df_error, lambda)`
//!
//! A request can also run in "required" mode, where an effect size and the
//! number of timepoints drive the sample-size search instead.

use serde::{Deserialize, Serialize};

use crate::effect::{cohens_f_from_f_statistic, cohens_f_from_partial_eta_squared};
use crate::error::{Result, StatError};
use crate::power::sample_size::required_sample_size;
use crate::power::{noncentral_f_power, PowerInterpretation};

/// Supported alpha range for the repeated-measures branch.
pub const ALPHA_MIN: f64 = 0.001;
pub const ALPHA_MAX: f64 = 0.25;

const DEFAULT_ALPHA: f64 = 0.05;
const DEFAULT_TARGET_POWER: f64 = 0.80;
const DEFAULT_TIMEPOINTS: usize = 3;

/// What a repeated-measures power request should compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerMode {
    #[default]
    Observed,
    Required,
}

impl PowerMode {
    /// Parse a textual mode. Unknown modes are a caller error, unlike the
    /// alternative-hypothesis fallback.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "observed" => Ok(PowerMode::Observed),
            "required" => Ok(PowerMode::Required),
            other => Err(StatError::InvalidParameter(format!(
                "invalid mode: '{}'. Use 'observed' or 'required'",
                other
            ))),
        }
    }
}

/// A repeated-measures ANOVA power request.
///
/// Unset optional fields fall back to the documented defaults during
/// analysis (`alpha` 0.05, `target_power` 0.80, `k` 3 in required mode).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RmAnovaRequest {
    pub mode: PowerMode,
    pub f_statistic: Option<f64>,
    pub df_between: Option<usize>,
    pub df_error: Option<usize>,
    /// Number of subjects, used to recover an effect size from F.
    pub n: Option<usize>,
    /// Number of timepoints.
    pub k: Option<usize>,
    pub effect_size_f: Option<f64>,
    pub partial_eta_squared: Option<f64>,
    pub target_power: Option<f64>,
    pub alpha: Option<f64>,
}

/// Observed-mode analysis output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservedPower {
    pub observed_power: f64,
    pub interpretation: PowerInterpretation,
    pub effect_size_cohen_f: f64,
    pub f_statistic: f64,
    pub df_between: usize,
    pub df_error: usize,
    /// Subjects needed for 80% power, when an effect size and k resolve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_for_80pct: Option<usize>,
    /// Subjects needed for 90% power, when an effect size and k resolve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_for_90pct: Option<usize>,
}

/// Required-mode analysis output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredSampleSize {
    pub required_sample_size: usize,
    pub achieved_power: f64,
    pub effect_size_cohen_f: f64,
    pub target_power: f64,
    pub num_timepoints: usize,
}

/// Result of analyzing an [`RmAnovaRequest`], tagged by mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RmAnovaAnalysis {
    Observed(ObservedPower),
    Required(RequiredSampleSize),
}

/// Observed power for a repeated-measures ANOVA.
///
/// Non-positive inputs yield 0.0; on the analysis path request validation
/// rejects them before this point. Numerical failure in the distribution
/// evaluation also degrades to 0.0.
pub fn observed_power_rm_anova(
    f_statistic: f64,
    df_between: usize,
    df_error: usize,
    alpha: f64,
) -> f64 {
    if f_statistic <= 0.0 || !f_statistic.is_finite() || df_between == 0 || df_error == 0 {
        return 0.0;
    }
    let alpha = alpha.clamp(ALPHA_MIN, ALPHA_MAX);
    let lambda = f_statistic * df_between as f64;
    noncentral_f_power(df_between, df_error, lambda, alpha).unwrap_or(0.0)
}

/// Analyze a repeated-measures power request in either mode.
pub fn analyze_rm_anova(request: &RmAnovaRequest) -> Result<RmAnovaAnalysis> {
    let alpha = request.alpha.unwrap_or(DEFAULT_ALPHA).clamp(ALPHA_MIN, ALPHA_MAX);

    // An explicit Cohen's f wins over a partial eta squared.
    let mut effect_size_f = match (request.effect_size_f, request.partial_eta_squared) {
        (Some(f), _) => Some(f),
        (None, Some(eta_sq)) => Some(cohens_f_from_partial_eta_squared(eta_sq)),
        (None, None) => None,
    };

    match request.mode {
        PowerMode::Observed => {
            let f_statistic = request.f_statistic.unwrap_or(0.0);
            let df_between = request.df_between.unwrap_or(0);
            let df_error = request.df_error.unwrap_or(0);
            if f_statistic <= 0.0 || !f_statistic.is_finite() || df_between == 0 || df_error == 0
            {
                return Err(StatError::InvalidParameter(
                    "invalid F statistic or degrees of freedom".into(),
                ));
            }

            let observed_power =
                observed_power_rm_anova(f_statistic, df_between, df_error, alpha);

            let n = request.n.unwrap_or(0);
            let k = request.k.unwrap_or(0);
            if effect_size_f.is_none() && n > 0 && k > 0 {
                effect_size_f = Some(cohens_f_from_f_statistic(f_statistic, df_between, n));
            }
            let effect_size_f = effect_size_f.unwrap_or(0.0);

            let (required_for_80pct, required_for_90pct) = if effect_size_f > 0.0 && k >= 2 {
                (
                    Some(required_sample_size(effect_size_f, k, 0.80, alpha)?.n),
                    Some(required_sample_size(effect_size_f, k, 0.90, alpha)?.n),
                )
            } else {
                (None, None)
            };

            Ok(RmAnovaAnalysis::Observed(ObservedPower {
                observed_power,
                interpretation: PowerInterpretation::from_power(observed_power),
                effect_size_cohen_f: effect_size_f,
                f_statistic,
                df_between,
                df_error,
                required_for_80pct,
                required_for_90pct,
            }))
        }
        PowerMode::Required => {
            let effect_size_f = effect_size_f.ok_or_else(|| {
                StatError::InvalidParameter(
                    "effect size (Cohen's f or partial eta squared) is required".into(),
                )
            })?;
            if effect_size_f <= 0.0 || !effect_size_f.is_finite() {
                return Err(StatError::InvalidParameter(format!(
                    "effect size must be positive, got {}",
                    effect_size_f
                )));
            }
            let num_timepoints = request.k.unwrap_or(DEFAULT_TIMEPOINTS);
            if num_timepoints < 2 {
                return Err(StatError::InvalidParameter(
                    "number of timepoints (k) must be at least 2".into(),
                ));
            }
            let target_power = request
                .target_power
                .unwrap_or(DEFAULT_TARGET_POWER)
                .clamp(0.50, 0.99);

            let sizing = required_sample_size(effect_size_f, num_timepoints, target_power, alpha)?;

            Ok(RmAnovaAnalysis::Required(RequiredSampleSize {
                required_sample_size: sizing.n,
                achieved_power: sizing.achieved_power,
                effect_size_cohen_f: effect_size_f,
                target_power,
                num_timepoints,
            }))
        }
    }
}
