//! Frequency Band Selection

use crate::error::AggregationError;
use serde::{Deserialize, Serialize};

/// Inclusive frequency interval `[min_frequency, max_frequency]`
///
/// Serialized as a `(min, max)` pair so sideband sets read like
/// `[(400, 500), (10, 30)]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct FrequencyBand {
    min_frequency: f64,
    max_frequency: f64,
}

impl FrequencyBand {
    /// Create a band, rejecting `min_frequency > max_frequency`
    pub fn new(min_frequency: f64, max_frequency: f64) -> Result<Self, AggregationError> {
        if min_frequency > max_frequency {
            return Err(AggregationError::MalformedBand {
                min_frequency,
                max_frequency,
            });
        }
        Ok(Self {
            min_frequency,
            max_frequency,
        })
    }

    /// Lower edge (inclusive)
    pub fn min_frequency(&self) -> f64 {
        self.min_frequency
    }

    /// Upper edge (inclusive)
    pub fn max_frequency(&self) -> f64 {
        self.max_frequency
    }

    /// Whether `frequency` lies inside the band, both edges included
    pub fn contains(&self, frequency: f64) -> bool {
        in_range(frequency, self.min_frequency, self.max_frequency)
    }

    /// Indices of `frequency_values` inside the band
    pub fn select(&self, frequency_values: &[f64]) -> Vec<usize> {
        select_band(frequency_values, self.min_frequency, self.max_frequency)
    }
}

impl TryFrom<(f64, f64)> for FrequencyBand {
    type Error = AggregationError;

    fn try_from((min_frequency, max_frequency): (f64, f64)) -> Result<Self, Self::Error> {
        Self::new(min_frequency, max_frequency)
    }
}

impl From<FrequencyBand> for (f64, f64) {
    fn from(band: FrequencyBand) -> Self {
        (band.min_frequency, band.max_frequency)
    }
}

#[inline]
fn in_range(frequency: f64, min_frequency: f64, max_frequency: f64) -> bool {
    frequency >= min_frequency && frequency <= max_frequency
}

/// Select the indices whose frequency lies in `[min_frequency, max_frequency]`.
///
/// Selection is by value, not position: the axis need not be sorted and the
/// indices come back in their order of appearance. An inverted range selects
/// nothing.
pub fn select_band(frequency_values: &[f64], min_frequency: f64, max_frequency: f64) -> Vec<usize> {
    frequency_values
        .iter()
        .enumerate()
        .filter(|(_, &f)| in_range(f, min_frequency, max_frequency))
        .map(|(i, _)| i)
        .collect()
}

/// Concatenate the selections of every sideband.
///
/// Overlapping sidebands contribute the same index more than once; the
/// result is a multiset.
pub fn select_side_bands(frequency_values: &[f64], side_bands: &[FrequencyBand]) -> Vec<usize> {
    side_bands
        .iter()
        .flat_map(|band| band.select(frequency_values))
        .collect()
}
