//! Aggregation Spec

use band_aggregation::{AggregateValue, AggregationError, InitParams, Primitive};
use serde::{Deserialize, Serialize};

/// Named, immutable binding of a primitive to its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationSpec {
    /// Unique within one generated batch
    pub name: String,
    /// Aggregation function to instantiate
    pub primitive: Primitive,
    /// Keyword parameters for the primitive
    pub init_params: InitParams,
}

impl AggregationSpec {
    /// Create a spec
    pub fn new(name: impl Into<String>, primitive: Primitive, init_params: InitParams) -> Self {
        Self {
            name: name.into(),
            primitive,
            init_params,
        }
    }

    /// Apply the bound primitive to one spectrum
    pub fn evaluate(
        &self,
        amplitude_values: &[f64],
        frequency_values: Option<&[f64]>,
    ) -> Result<AggregateValue, AggregationError> {
        self.primitive
            .apply(&self.init_params, amplitude_values, frequency_values)
    }
}
