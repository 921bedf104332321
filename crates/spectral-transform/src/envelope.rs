//! Envelope Spectrum
//!
//! Demodulation for bearing and gear diagnosis: band-pass the raw signal
//! around the resonance, take the magnitude of its analytic signal and
//! report the one-sided spectrum of that envelope.

use crate::error::TransformError;
use crate::filter::IirFilter;
use crate::hilbert::analytic_signal;
use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Butterworth prototype order used when none is configured
pub const DEFAULT_FILTER_ORDER: usize = 5;

/// One-sided magnitude spectrum of the envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeSpectrum {
    /// Magnitude per bin, `N / 2` entries
    pub amplitude_values: Vec<f64>,
    /// Frequency per bin from 0 to Nyquist inclusive
    pub frequency_values: Vec<f64>,
}

/// Envelope analyzer for one sampling frequency and filter band
pub struct EnvelopeAnalyzer {
    /// FFT planner reused across signals
    planner: FftPlanner<f64>,
    /// Sampling frequency (Hz)
    sampling_frequency: f64,
    /// Requested lower cutoff (Hz)
    lowcut: Option<f64>,
    /// Requested upper cutoff (Hz)
    highcut: Option<f64>,
    /// Butterworth prototype order, the band-pass has twice as many poles
    order: usize,
}

impl EnvelopeAnalyzer {
    /// Create an analyzer with default cutoffs and order
    pub fn new(sampling_frequency: f64) -> Result<Self, TransformError> {
        if !(sampling_frequency.is_finite() && sampling_frequency > 0.0) {
            return Err(TransformError::InvalidSamplingFrequency(sampling_frequency));
        }
        Ok(Self {
            planner: FftPlanner::new(),
            sampling_frequency,
            lowcut: None,
            highcut: None,
            order: DEFAULT_FILTER_ORDER,
        })
    }

    /// Set the cutoffs; `None` keeps the sampling-frequency based default
    pub fn with_band(mut self, lowcut: Option<f64>, highcut: Option<f64>) -> Self {
        self.lowcut = lowcut;
        self.highcut = highcut;
        self
    }

    /// Set the Butterworth prototype order
    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    /// Effective pass band in Hz.
    ///
    /// A missing lower cutoff, or one above Nyquist, becomes `fs / 4`. A
    /// missing upper cutoff, or one at or above Nyquist, becomes `3 fs / 8`.
    pub fn pass_band(&self) -> Result<(f64, f64), TransformError> {
        let fs = self.sampling_frequency;
        let nyquist = fs / 2.0;

        let lowcut = match self.lowcut {
            Some(low) if low <= nyquist => low,
            _ => fs / 4.0,
        };
        let highcut = match self.highcut {
            Some(high) if high < nyquist => high,
            _ => fs * 3.0 / 8.0,
        };

        if !(lowcut > 0.0 && lowcut < highcut && highcut < nyquist) {
            return Err(TransformError::InvalidFilterBand {
                lowcut,
                highcut,
                nyquist,
            });
        }
        Ok((lowcut, highcut))
    }

    /// Envelope spectrum of one signal
    pub fn analyze(&mut self, signal: &[f64]) -> Result<EnvelopeSpectrum, TransformError> {
        if signal.is_empty() {
            return Err(TransformError::EmptySignal);
        }

        let (lowcut, highcut) = self.pass_band()?;
        let nyquist = self.sampling_frequency / 2.0;
        debug!(
            "Envelope spectrum of {} samples, band [{}, {}] Hz, order {}",
            signal.len(),
            lowcut,
            highcut,
            self.order
        );

        let filter = IirFilter::butter_bandpass(self.order, lowcut / nyquist, highcut / nyquist)?;
        let filtered = filter.filter(signal);

        let envelope: Vec<f64> = analytic_signal(&mut self.planner, &filtered)
            .iter()
            .map(|c| c.norm())
            .collect();
        let mean = envelope.iter().sum::<f64>() / envelope.len() as f64;

        let len = envelope.len();
        let mut buffer: Vec<Complex<f64>> = envelope
            .iter()
            .map(|&e| Complex::new(e - mean, 0.0))
            .collect();
        self.planner.plan_fft_forward(len).process(&mut buffer);

        let half = len / 2;
        let scale = 2.0 / len as f64;
        Ok(EnvelopeSpectrum {
            amplitude_values: buffer[..half].iter().map(|c| scale * c.norm()).collect(),
            frequency_values: linspace(0.0, nyquist, half),
        })
    }
}

/// Envelope spectrum with an ad-hoc analyzer
pub fn envelope_spectrum(
    amplitude_values: &[f64],
    sampling_frequency: f64,
    lowcut: Option<f64>,
    highcut: Option<f64>,
    order: usize,
) -> Result<EnvelopeSpectrum, TransformError> {
    EnvelopeAnalyzer::new(sampling_frequency)?
        .with_band(lowcut, highcut)
        .with_order(order)
        .analyze(amplitude_values)
}

/// `num` evenly spaced points from `start` to `stop` inclusive
pub(crate) fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut points: Vec<f64> = (0..num).map(|i| i as f64 * step + start).collect();
            points[num - 1] = stop;
            points
        }
    }
}
