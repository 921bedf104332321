//! Band Aggregation
//!
//! Selects samples of a spectrum by frequency value and reduces them to a
//! single scalar: band mean/min/max/sum/RMS, sideband RMS and sideband
//! power ratio. Also hosts the [`RoundingMode`] shared by the spec
//! generators and the order-tracking corrector.

mod aggregate;
mod band;
mod error;
mod primitive;
mod rounding;

pub use aggregate::{
    band_max, band_mean, band_min, band_rms, band_sideband_pr, band_sideband_rms, band_sum,
    relay_frequency_values,
};
pub use band::{select_band, select_side_bands, FrequencyBand};
pub use error::AggregationError;
pub use primitive::{AggregateValue, InitParams, Primitive};
pub use rounding::RoundingMode;
