//! Band Aggregators
//!
//! Reducers over the amplitudes whose frequency falls inside a band.
//! Empty selections follow one policy: mean and RMS give `NaN`, sum gives
//! `0.0`, min and max fail with [`AggregationError::EmptySelection`].
//! A `NaN` amplitude inside the band makes every reducer return `NaN`.

use crate::band::{select_band, select_side_bands, FrequencyBand};
use crate::error::AggregationError;

fn check_lengths(amplitude_values: &[f64], frequency_values: &[f64]) -> Result<(), AggregationError> {
    if amplitude_values.len() != frequency_values.len() {
        return Err(AggregationError::LengthMismatch {
            amplitudes: amplitude_values.len(),
            frequencies: frequency_values.len(),
        });
    }
    Ok(())
}

fn gather(amplitude_values: &[f64], indices: &[usize]) -> Vec<f64> {
    indices.iter().map(|&i| amplitude_values[i]).collect()
}

fn selected(
    amplitude_values: &[f64],
    frequency_values: &[f64],
    min_frequency: f64,
    max_frequency: f64,
) -> Result<Vec<f64>, AggregationError> {
    check_lengths(amplitude_values, frequency_values)?;
    let indices = select_band(frequency_values, min_frequency, max_frequency);
    Ok(gather(amplitude_values, &indices))
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Extreme value under `pick`, `NaN` as soon as one value is `NaN`
fn extreme(
    values: Vec<f64>,
    pick: fn(f64, f64) -> f64,
    min_frequency: f64,
    max_frequency: f64,
) -> Result<f64, AggregationError> {
    values
        .into_iter()
        .reduce(|acc, v| if acc.is_nan() || v.is_nan() { f64::NAN } else { pick(acc, v) })
        .ok_or(AggregationError::EmptySelection {
            min_frequency,
            max_frequency,
        })
}

fn rms(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    (values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64).sqrt()
}

/// Mean amplitude inside `[min_frequency, max_frequency]`
pub fn band_mean(
    amplitude_values: &[f64],
    frequency_values: &[f64],
    min_frequency: f64,
    max_frequency: f64,
) -> Result<f64, AggregationError> {
    let values = selected(amplitude_values, frequency_values, min_frequency, max_frequency)?;
    Ok(mean(&values))
}

/// Maximum amplitude inside `[min_frequency, max_frequency]`
pub fn band_max(
    amplitude_values: &[f64],
    frequency_values: &[f64],
    min_frequency: f64,
    max_frequency: f64,
) -> Result<f64, AggregationError> {
    let values = selected(amplitude_values, frequency_values, min_frequency, max_frequency)?;
    extreme(values, f64::max, min_frequency, max_frequency)
}

/// Minimum amplitude inside `[min_frequency, max_frequency]`
pub fn band_min(
    amplitude_values: &[f64],
    frequency_values: &[f64],
    min_frequency: f64,
    max_frequency: f64,
) -> Result<f64, AggregationError> {
    let values = selected(amplitude_values, frequency_values, min_frequency, max_frequency)?;
    extreme(values, f64::min, min_frequency, max_frequency)
}

/// Sum of amplitudes inside `[min_frequency, max_frequency]`, `0.0` when empty
pub fn band_sum(
    amplitude_values: &[f64],
    frequency_values: &[f64],
    min_frequency: f64,
    max_frequency: f64,
) -> Result<f64, AggregationError> {
    let values = selected(amplitude_values, frequency_values, min_frequency, max_frequency)?;
    Ok(values.iter().sum())
}

/// Root mean square: `sqrt(mean(selected^2))`
pub fn band_rms(
    amplitude_values: &[f64],
    frequency_values: &[f64],
    min_frequency: f64,
    max_frequency: f64,
) -> Result<f64, AggregationError> {
    let values = selected(amplitude_values, frequency_values, min_frequency, max_frequency)?;
    Ok(rms(&values))
}

/// RMS over the primary band together with all of its sidebands.
///
/// Indices are concatenated, not merged: a sample inside two ranges is
/// counted twice.
pub fn band_sideband_rms(
    amplitude_values: &[f64],
    frequency_values: &[f64],
    min_frequency: f64,
    max_frequency: f64,
    side_bands: &[FrequencyBand],
) -> Result<f64, AggregationError> {
    check_lengths(amplitude_values, frequency_values)?;
    let mut indices = select_band(frequency_values, min_frequency, max_frequency);
    indices.extend(select_side_bands(frequency_values, side_bands));
    Ok(rms(&gather(amplitude_values, &indices)))
}

/// Sideband power ratio: RMS of the sideband union over RMS of the primary band.
///
/// Fails with [`AggregationError::DivisionByZero`] when the primary RMS is
/// exactly zero. A `NaN` on either side (empty selection) propagates.
pub fn band_sideband_pr(
    amplitude_values: &[f64],
    frequency_values: &[f64],
    min_frequency: f64,
    max_frequency: f64,
    side_bands: &[FrequencyBand],
) -> Result<f64, AggregationError> {
    check_lengths(amplitude_values, frequency_values)?;

    let band_indices = select_band(frequency_values, min_frequency, max_frequency);
    let band_rms = rms(&gather(amplitude_values, &band_indices));
    if band_rms == 0.0 {
        return Err(AggregationError::DivisionByZero {
            min_frequency,
            max_frequency,
        });
    }

    let side_band_indices = select_side_bands(frequency_values, side_bands);
    let side_band_rms = rms(&gather(amplitude_values, &side_band_indices));

    Ok(side_band_rms / band_rms)
}

/// Pass the frequency axis through unchanged
pub fn relay_frequency_values(_amplitude_values: &[f64], frequency_values: &[f64]) -> Vec<f64> {
    frequency_values.to_vec()
}
