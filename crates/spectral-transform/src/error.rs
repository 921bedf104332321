//! Transform Error Types

use thiserror::Error;

/// Errors raised by the spectral transforms
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// Band-pass cutoffs unusable after default resolution
    #[error("Invalid filter band [{lowcut}, {highcut}] Hz for Nyquist frequency {nyquist} Hz")]
    InvalidFilterBand {
        lowcut: f64,
        highcut: f64,
        nyquist: f64,
    },

    /// Sampling frequency must be positive and finite
    #[error("Invalid sampling frequency: {0}")]
    InvalidSamplingFrequency(f64),

    /// Filter order must be at least one
    #[error("Invalid filter order: {0}")]
    InvalidFilterOrder(usize),

    /// Transform needs at least one sample
    #[error("Signal is empty")]
    EmptySignal,

    /// Frequency resolution must be positive and finite
    #[error("Invalid delta frequency: {0}")]
    InvalidDeltaFrequency(f64),

    /// RPM values must be positive and finite
    #[error("Invalid {field}: {value}")]
    InvalidRpm { field: &'static str, value: f64 },
}
