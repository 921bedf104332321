//! Harmonic Marker Points
//!
//! Harmonic and sideband frequencies for annotating spectrum plots.

use crate::error::{ensure_finite, GeneratorError};
use crate::generators::{sideband_offsets, HARMONIC_DIGITS, SIDEBAND_DIGITS};
use band_aggregation::RoundingMode;
use serde::{Deserialize, Serialize};

/// One harmonic marker with its sideband markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonicPoint {
    /// `{name}_{k}`
    pub name: String,
    /// Harmonic frequency, one decimal place
    pub frequency: f64,
    /// Sideband frequencies, two decimal places
    pub side_bands: Vec<f64>,
}

/// Markers for the first `number` harmonics of `first`.
///
/// A `sideband` spacing of zero produces no sideband markers.
pub fn harmonic_points(
    first: f64,
    number: usize,
    sideband: f64,
    sideband_number: usize,
    name: &str,
    rounding: RoundingMode,
) -> Result<Vec<HarmonicPoint>, GeneratorError> {
    let first = ensure_finite("first", first)?;
    let spacing = ensure_finite("sideband", sideband)?;
    let offsets = sideband_offsets(spacing, sideband_number);

    Ok((1..=number)
        .map(|k| {
            let frequency = first * k as f64;
            HarmonicPoint {
                name: format!("{}_{}", name, k),
                frequency: rounding.round_decimal(frequency, HARMONIC_DIGITS),
                side_bands: offsets
                    .iter()
                    .map(|offset| rounding.round_decimal(offset + frequency, SIDEBAND_DIGITS))
                    .collect(),
            }
        })
        .collect())
}
