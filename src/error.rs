//! Error types shared by the calculation engines

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalcError {
    /// A physical dimension that must be strictly positive was not
    #[error("invalid dimension: {field} must be positive, got {value}")]
    InvalidDimension { field: &'static str, value: f64 },

    #[error("{field} = {value} is out of range, allowed: [{min}, {max}]")]
    OutOfRangeConfig {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("could not parse '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CalcError>;

/// Reject anything that is not a finite, strictly positive number
pub fn require_positive(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CalcError::InvalidDimension { field, value })
    }
}

/// Reject anything outside the closed range `[min, max]` (NaN included)
pub fn require_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(CalcError::OutOfRangeConfig {
            field,
            value,
            min,
            max,
        })
    }
}

/// Division that yields 0.0 instead of inf/NaN when the denominator is not positive
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
