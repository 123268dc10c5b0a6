//! Error types for the statpower library.

use thiserror::Error;

/// Main error type for the library.
///
/// Only invalid caller input surfaces as an error. Numerical trouble inside
/// the distribution evaluators is represented as [`StatError::Numerical`]
/// internally and mapped to a neutral result (power 0.0) before it reaches
/// the caller, and the sample-size search returns its best bound instead of
/// failing, so every valid request produces a result.
#[derive(Error, Debug)]
pub enum StatError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Numerical error: {0}")]
    Numerical(String),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, StatError>;
