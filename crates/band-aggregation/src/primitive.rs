//! Aggregation Primitive Dispatch

use crate::aggregate::{
    band_max, band_mean, band_min, band_rms, band_sideband_pr, band_sideband_rms, band_sum,
    relay_frequency_values,
};
use crate::band::FrequencyBand;
use crate::error::AggregationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Identifier of an aggregation function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    BandMean,
    BandMax,
    BandMin,
    BandSum,
    BandRms,
    BandSidebandRms,
    BandSidebandPr,
    RelayFrequencyValues,
}

impl Primitive {
    /// Stable snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::BandMean => "band_mean",
            Primitive::BandMax => "band_max",
            Primitive::BandMin => "band_min",
            Primitive::BandSum => "band_sum",
            Primitive::BandRms => "band_rms",
            Primitive::BandSidebandRms => "band_sideband_rms",
            Primitive::BandSidebandPr => "band_sideband_pr",
            Primitive::RelayFrequencyValues => "relay_frequency_values",
        }
    }

    /// Whether the primitive reads `side_bands`
    pub fn uses_side_bands(&self) -> bool {
        matches!(self, Primitive::BandSidebandRms | Primitive::BandSidebandPr)
    }

    /// Apply the primitive to one spectrum.
    ///
    /// `params.frequency_values`, when present, takes precedence over the
    /// `frequency_values` argument.
    pub fn apply(
        &self,
        params: &InitParams,
        amplitude_values: &[f64],
        frequency_values: Option<&[f64]>,
    ) -> Result<AggregateValue, AggregationError> {
        let frequency_values = params
            .frequency_values
            .as_deref()
            .or(frequency_values)
            .ok_or(AggregationError::MissingFrequencyAxis(self.as_str()))?;

        let (lo, hi) = (params.min_frequency, params.max_frequency);
        debug!("Applying {} over [{}, {}]", self.as_str(), lo, hi);

        let scalar = match self {
            Primitive::BandMean => band_mean(amplitude_values, frequency_values, lo, hi)?,
            Primitive::BandMax => band_max(amplitude_values, frequency_values, lo, hi)?,
            Primitive::BandMin => band_min(amplitude_values, frequency_values, lo, hi)?,
            Primitive::BandSum => band_sum(amplitude_values, frequency_values, lo, hi)?,
            Primitive::BandRms => band_rms(amplitude_values, frequency_values, lo, hi)?,
            Primitive::BandSidebandRms => {
                let side_bands = params.side_bands(*self)?;
                band_sideband_rms(amplitude_values, frequency_values, lo, hi, side_bands)?
            }
            Primitive::BandSidebandPr => {
                let side_bands = params.side_bands(*self)?;
                band_sideband_pr(amplitude_values, frequency_values, lo, hi, side_bands)?
            }
            Primitive::RelayFrequencyValues => {
                return Ok(AggregateValue::Series(relay_frequency_values(
                    amplitude_values,
                    frequency_values,
                )));
            }
        };

        Ok(AggregateValue::Scalar(scalar))
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword parameters a primitive is instantiated with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitParams {
    /// Band lower edge (inclusive)
    pub min_frequency: f64,
    /// Band upper edge (inclusive)
    pub max_frequency: f64,
    /// Sideband set for the sideband primitives
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_bands: Option<Vec<FrequencyBand>>,
    /// Fixed frequency axis embedded in the spec
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_values: Option<Vec<f64>>,
}

impl InitParams {
    /// Plain band parameters
    pub fn band(min_frequency: f64, max_frequency: f64) -> Self {
        Self {
            min_frequency,
            max_frequency,
            ..Default::default()
        }
    }

    /// Attach a sideband set
    pub fn with_side_bands(mut self, side_bands: Vec<FrequencyBand>) -> Self {
        self.side_bands = Some(side_bands);
        self
    }

    /// Embed a fixed frequency axis
    pub fn with_frequency_values(mut self, frequency_values: Option<&[f64]>) -> Self {
        self.frequency_values = frequency_values.map(<[f64]>::to_vec);
        self
    }

    fn side_bands(&self, primitive: Primitive) -> Result<&[FrequencyBand], AggregationError> {
        self.side_bands
            .as_deref()
            .ok_or(AggregationError::MissingSideBands(primitive.as_str()))
    }
}

/// Output of a primitive: one number, or a whole series for the relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AggregateValue {
    Scalar(f64),
    Series(Vec<f64>),
}

impl AggregateValue {
    /// Scalar value, if this is one
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            AggregateValue::Scalar(v) => Some(*v),
            AggregateValue::Series(_) => None,
        }
    }
}

impl From<f64> for AggregateValue {
    fn from(value: f64) -> Self {
        AggregateValue::Scalar(value)
    }
}

impl From<Vec<f64>> for AggregateValue {
    fn from(values: Vec<f64>) -> Self {
        AggregateValue::Series(values)
    }
}
