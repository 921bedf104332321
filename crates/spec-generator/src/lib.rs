//! Aggregation Spec Generation
//!
//! Builds named band aggregation specs from compact harmonic/sideband
//! descriptions. Specs are typed records; evaluating one dispatches to the
//! band aggregators in [`band_aggregation`].

mod error;
mod generators;
mod points;
mod spec;

pub use error::GeneratorError;
pub use generators::{
    BandSweep, GeneratorConfig, HarmonicSidebands, Harmonics, SpecGenerator, HARMONIC_DIGITS,
    MAX_SWEEP_BANDS, SIDEBAND_DIGITS,
};
pub use points::{harmonic_points, HarmonicPoint};
pub use spec::AggregationSpec;
