//! Order Tracking
//!
//! Rescales a uniform frequency axis from the measured shaft speed to the
//! nominal shaft speed so spectra taken at different speeds line up, then
//! snaps each corrected frequency back onto the grid.

use crate::error::TransformError;
use band_aggregation::RoundingMode;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Acquisition hardware, decides where the frequency axis starts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardwareVariant {
    /// Axis starts at one resolution step: `dF, 2dF, ...`
    #[default]
    Standard,
    /// Axis starts at zero: `0, dF, 2dF, ...`
    Tcm,
}

impl HardwareVariant {
    /// Frequency of the `index`-th bin, always an integer multiple of `delta_frequency`
    fn bin_frequency(self, index: usize, delta_frequency: f64) -> f64 {
        match self {
            Self::Standard => (index + 1) as f64 * delta_frequency,
            Self::Tcm => index as f64 * delta_frequency,
        }
    }

    /// Uncorrected axis of `len` bins spaced `delta_frequency` apart
    pub fn frequency_axis(self, len: usize, delta_frequency: f64) -> Vec<f64> {
        (0..len)
            .map(|i| self.bin_frequency(i, delta_frequency))
            .collect()
    }
}

/// Speed context for one spectrum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderTracking {
    /// Frequency resolution in Hz
    pub delta_frequency: f64,
    /// Measured shaft speed
    pub rpm: f64,
    /// Reference shaft speed
    pub nominal_rpm: f64,
    #[serde(default)]
    pub hardware_variant: HardwareVariant,
    /// Tie-breaking when snapping to the grid
    #[serde(default)]
    pub rounding: RoundingMode,
}

impl OrderTracking {
    /// Create a context with the standard axis and half-to-even snapping
    pub fn new(delta_frequency: f64, rpm: f64, nominal_rpm: f64) -> Self {
        Self {
            delta_frequency,
            rpm,
            nominal_rpm,
            hardware_variant: HardwareVariant::default(),
            rounding: RoundingMode::default(),
        }
    }

    /// Select the hardware variant, and with it the axis origin
    pub fn with_hardware_variant(mut self, hardware_variant: HardwareVariant) -> Self {
        self.hardware_variant = hardware_variant;
        self
    }

    /// Select how ties are broken when snapping to the grid
    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    fn validate(&self) -> Result<(), TransformError> {
        if !(self.delta_frequency.is_finite() && self.delta_frequency > 0.0) {
            return Err(TransformError::InvalidDeltaFrequency(self.delta_frequency));
        }
        for (field, value) in [("rpm", self.rpm), ("nominal_rpm", self.nominal_rpm)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(TransformError::InvalidRpm { field, value });
            }
        }
        Ok(())
    }

    /// Corrected frequency axis with one entry per amplitude value.
    ///
    /// Only the length of `amplitude_values` is used.
    pub fn shift_frequency(&self, amplitude_values: &[f64]) -> Result<Vec<f64>, TransformError> {
        self.validate()?;
        debug!(
            "Order tracking {} bins: rpm={} nominal={} dF={} ({:?})",
            amplitude_values.len(),
            self.rpm,
            self.nominal_rpm,
            self.delta_frequency,
            self.hardware_variant
        );

        let df = self.delta_frequency;
        Ok((0..amplitude_values.len())
            .map(|i| {
                let frequency = self.hardware_variant.bin_frequency(i, df);
                let scaled = frequency * self.nominal_rpm / self.rpm;
                self.rounding.round(scaled / df) * df
            })
            .collect())
    }
}

/// Order-track a uniform spectrum, see [`OrderTracking::shift_frequency`]
pub fn shift_frequency(
    amplitude_values: &[f64],
    delta_frequency: f64,
    rpm: f64,
    nominal_rpm: f64,
    hardware_variant: Option<HardwareVariant>,
) -> Result<Vec<f64>, TransformError> {
    OrderTracking::new(delta_frequency, rpm, nominal_rpm)
        .with_hardware_variant(hardware_variant.unwrap_or_default())
        .shift_frequency(amplitude_values)
}
