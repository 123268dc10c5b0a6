//! Core data types shared across the engine.

use serde::{Deserialize, Serialize};

use crate::descriptive;
use crate::effect::cohens_f_from_partial_eta_squared;
use crate::error::{Result, StatError};

/// A validated sample of finite measurements.
///
/// Construction filters out non-finite entries first; whatever survives must
/// hold at least two values, otherwise the sample is rejected. All engine
/// operations take samples through this type so that downstream code never
/// sees NaN or infinite observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleVector {
    values: Vec<f64>,
}

impl SampleVector {
    /// Build a sample from raw values, dropping non-finite entries.
    ///
    /// `name` identifies the group in the error message.
    pub fn from_values(name: &str, raw: &[f64]) -> Result<Self> {
        let values: Vec<f64> = raw.iter().copied().filter(|v| v.is_finite()).collect();
        if values.len() < 2 {
            return Err(StatError::EmptyData(format!(
                "'{}' must contain at least 2 numeric values",
                name
            )));
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn mean(&self) -> f64 {
        descriptive::mean(&self.values)
    }

    /// Sample variance (ddof=1).
    pub fn sample_variance(&self) -> f64 {
        descriptive::sample_variance(&self.values)
    }
}

/// Direction of the alternative hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Alternative {
    #[default]
    #[serde(rename = "two-sided")]
    TwoSided,
    #[serde(rename = "greater")]
    Greater,
    #[serde(rename = "less")]
    Less,
}

impl Alternative {
    /// Parse a textual alternative. Unrecognized strings fall back to
    /// two-sided rather than erroring.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "greater" => Alternative::Greater,
            "less" => Alternative::Less,
            _ => Alternative::TwoSided,
        }
    }
}

/// A standardized effect size in one of the supported measures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "measure", content = "value")]
pub enum EffectSize {
    CohenF(f64),
    CohenD(f64),
    PartialEtaSquared(f64),
}

impl EffectSize {
    /// Express this effect size as Cohen's f where a conversion exists.
    ///
    /// Partial eta squared converts via `sqrt(eta² / (1 - eta²))`; Cohen's d
    /// has no ANOVA-style equivalent here and yields `None`.
    pub fn as_cohen_f(&self) -> Option<f64> {
        match *self {
            EffectSize::CohenF(f) => Some(f),
            EffectSize::PartialEtaSquared(eta_sq) => {
                Some(cohens_f_from_partial_eta_squared(eta_sq))
            }
            EffectSize::CohenD(_) => None,
        }
    }
}
