//! Aggregation Error Types

use thiserror::Error;

/// Errors raised while selecting or aggregating frequency bands
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregationError {
    /// No sample fell inside the band of a reducer that needs at least one
    #[error("No samples selected in band [{min_frequency}, {max_frequency}]")]
    EmptySelection {
        min_frequency: f64,
        max_frequency: f64,
    },

    /// Primary band RMS is exactly zero in a power ratio
    #[error("Primary band [{min_frequency}, {max_frequency}] has zero RMS, power ratio is undefined")]
    DivisionByZero {
        min_frequency: f64,
        max_frequency: f64,
    },

    /// Band whose lower edge exceeds its upper edge
    #[error("Malformed band: min {min_frequency} exceeds max {max_frequency}")]
    MalformedBand {
        min_frequency: f64,
        max_frequency: f64,
    },

    /// Amplitude and frequency sequences are not paired index-for-index
    #[error("Length mismatch: {amplitudes} amplitude values vs {frequencies} frequency values")]
    LengthMismatch { amplitudes: usize, frequencies: usize },

    /// Sideband primitive invoked without a sideband set
    #[error("Primitive {0} requires side_bands")]
    MissingSideBands(&'static str),

    /// Neither the caller nor the init params supplied a frequency axis
    #[error("Primitive {0} requires a frequency axis")]
    MissingFrequencyAxis(&'static str),
}
