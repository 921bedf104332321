//! Spectral Transforms
//!
//! Frequency-axis correction by order tracking and envelope spectrum
//! demodulation. Both feed band aggregation with an amplitude/frequency
//! pair of equal length.

mod envelope;
mod error;
mod filter;
mod hilbert;
mod order_track;

pub use envelope::{envelope_spectrum, EnvelopeAnalyzer, EnvelopeSpectrum, DEFAULT_FILTER_ORDER};
pub use error::TransformError;
pub use filter::IirFilter;
pub use hilbert::analytic_signal;
pub use order_track::{shift_frequency, HardwareVariant, OrderTracking};
