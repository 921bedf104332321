//! Generator Error Types

use band_aggregation::AggregationError;
use thiserror::Error;

/// Errors while expanding a band description into specs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeneratorError {
    /// A generated band or sideband is malformed
    #[error("Invalid generated band: {0}")]
    Band(#[from] AggregationError),

    /// Sweep step must be a positive finite number
    #[error("Invalid sweep step: {0}")]
    InvalidStep(f64),

    /// Sweep would produce more bands than allowed
    #[error("Sweep {low}..{high} in steps of {step} exceeds {limit} bands")]
    TooManyBands {
        low: f64,
        high: f64,
        step: f64,
        limit: usize,
    },

    /// A numeric parameter is NaN or infinite
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },
}

pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64, GeneratorError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeneratorError::NonFinite { field, value })
    }
}
