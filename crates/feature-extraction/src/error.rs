//! Extraction Error Types

use band_aggregation::AggregationError;
use spec_generator::GeneratorError;
use spectral_transform::TransformError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors during feature extraction
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Input or output file could not be accessed
    #[error("I/O error ({}): {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Record file or output serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Timestamp string in none of the accepted formats
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Context field required by a spectrum source is absent or not numeric
    #[error("Context field '{field}' missing or not numeric for turbine {turbine_id}")]
    MissingContextField { field: String, turbine_id: String },

    /// Two aggregations share one name
    #[error("Duplicate aggregation name: {0}")]
    DuplicateAggregation(String),
}
