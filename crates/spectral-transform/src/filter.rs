//! Butterworth Band-Pass Filter
//!
//! Digital band-pass design through the analog low-pass prototype,
//! low-pass to band-pass transform and bilinear transform, followed by a
//! causal direct-form II transposed filter.

use crate::error::TransformError;
use rustfft::num_complex::Complex;
use std::f64::consts::PI;

/// Sampling rate of the normalized design domain (Nyquist = 1)
const DESIGN_FS: f64 = 2.0;

/// Transfer function coefficients, `a[0]` normalized to one
#[derive(Debug, Clone, PartialEq)]
pub struct IirFilter {
    /// Numerator coefficients
    pub b: Vec<f64>,
    /// Denominator coefficients
    pub a: Vec<f64>,
}

impl IirFilter {
    /// Design a Butterworth band-pass of the given prototype order.
    ///
    /// `low` and `high` are cutoffs as fractions of the Nyquist frequency.
    /// The resulting filter has order `2 * order`.
    pub fn butter_bandpass(order: usize, low: f64, high: f64) -> Result<Self, TransformError> {
        if order == 0 {
            return Err(TransformError::InvalidFilterOrder(order));
        }
        if !(low > 0.0 && low < high && high < 1.0) {
            return Err(TransformError::InvalidFilterBand {
                lowcut: low,
                highcut: high,
                nyquist: 1.0,
            });
        }

        let prototype = analog_prototype(order);

        let warped_low = prewarp(low);
        let warped_high = prewarp(high);
        let bandwidth = warped_high - warped_low;
        let center = (warped_low * warped_high).sqrt();

        let (zeros, poles, gain) = lowpass_to_bandpass(&prototype, center, bandwidth);
        let (zeros, poles, gain) = bilinear(&zeros, &poles, gain);

        let b = poly(&zeros).into_iter().map(|c| c * gain).collect();
        let a = poly(&poles);
        Ok(Self::new(b, a))
    }

    /// Build from raw coefficients, normalizing by `a[0]`
    pub fn new(mut b: Vec<f64>, mut a: Vec<f64>) -> Self {
        if let Some(&a0) = a.first() {
            if a0 != 1.0 && a0 != 0.0 {
                b.iter_mut().for_each(|c| *c /= a0);
                a.iter_mut().for_each(|c| *c /= a0);
            }
        }
        Self { b, a }
    }

    /// Filter a signal from zero initial state
    pub fn filter(&self, signal: &[f64]) -> Vec<f64> {
        let taps = self.b.len().max(self.a.len());
        let coeff = |v: &[f64], i: usize| v.get(i).copied().unwrap_or(0.0);
        let mut state = vec![0.0; taps.saturating_sub(1)];

        signal
            .iter()
            .map(|&x| {
                let y = coeff(&self.b, 0) * x + state.first().copied().unwrap_or(0.0);
                for i in 0..state.len() {
                    let next = state.get(i + 1).copied().unwrap_or(0.0);
                    state[i] = next + coeff(&self.b, i + 1) * x - coeff(&self.a, i + 1) * y;
                }
                y
            })
            .collect()
    }
}

/// Poles of the unit-cutoff analog Butterworth low-pass
fn analog_prototype(order: usize) -> Vec<Complex<f64>> {
    let n = order as f64;
    (0..order)
        .map(|i| {
            let m = 2.0 * i as f64 - n + 1.0;
            -Complex::from_polar(1.0, PI * m / (2.0 * n))
        })
        .collect()
}

fn prewarp(normalized: f64) -> f64 {
    2.0 * DESIGN_FS * (PI * normalized / DESIGN_FS).tan()
}

/// Transform prototype poles into band-pass zeros, poles and gain.
///
/// Each prototype pole yields two poles; all "+" roots precede all "-"
/// roots. The prototype has no zeros so `order` zeros land at the origin.
fn lowpass_to_bandpass(
    poles: &[Complex<f64>],
    center: f64,
    bandwidth: f64,
) -> (Vec<Complex<f64>>, Vec<Complex<f64>>, f64) {
    let scaled: Vec<Complex<f64>> = poles.iter().map(|&p| p * (bandwidth / 2.0)).collect();
    let offsets: Vec<Complex<f64>> = scaled
        .iter()
        .map(|&p| (p * p - center * center).sqrt())
        .collect();

    let bandpass_poles = scaled
        .iter()
        .zip(&offsets)
        .map(|(&p, &d)| p + d)
        .chain(scaled.iter().zip(&offsets).map(|(&p, &d)| p - d))
        .collect();
    let zeros = vec![Complex::new(0.0, 0.0); poles.len()];
    let gain = bandwidth.powi(poles.len() as i32);
    (zeros, bandpass_poles, gain)
}

/// Map analog zeros/poles to the z-plane
fn bilinear(
    zeros: &[Complex<f64>],
    poles: &[Complex<f64>],
    gain: f64,
) -> (Vec<Complex<f64>>, Vec<Complex<f64>>, f64) {
    let fs2 = Complex::new(2.0 * DESIGN_FS, 0.0);
    let map = |&s: &Complex<f64>| (fs2 + s) / (fs2 - s);

    let degree = poles.len() - zeros.len();
    let digital_zeros = zeros
        .iter()
        .map(map)
        .chain(std::iter::repeat(Complex::new(-1.0, 0.0)).take(degree))
        .collect();
    let digital_poles = poles.iter().map(map).collect();

    let num: Complex<f64> = zeros.iter().map(|&z| fs2 - z).product();
    let den: Complex<f64> = poles.iter().map(|&p| fs2 - p).product();
    (digital_zeros, digital_poles, gain * (num / den).re)
}

/// Monic polynomial with the given roots, highest power first
fn poly(roots: &[Complex<f64>]) -> Vec<f64> {
    let mut coefficients = vec![Complex::new(1.0, 0.0)];
    for root in roots {
        let mut next = coefficients.clone();
        next.push(Complex::new(0.0, 0.0));
        for (i, c) in coefficients.iter().enumerate() {
            next[i + 1] -= c * *root;
        }
        coefficients = next;
    }
    coefficients.into_iter().map(|c| c.re).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!((a - e).abs() < tol, "index {}: {} != {}", i, a, e);
        }
    }

    #[test]
    fn test_prototype_poles() {
        let poles = analog_prototype(2);
        let expected = Complex::new(-(0.5f64).sqrt(), (0.5f64).sqrt());
        assert!((poles[0] - expected).norm() < 1e-12);
        assert!((poles[1] - expected.conj()).norm() < 1e-12);
        assert!(poles.iter().all(|p| (p.norm() - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_poly() {
        let roots = [Complex::new(1.0, 0.0), Complex::new(-2.0, 0.0)];
        assert_eq!(poly(&roots), vec![1.0, 1.0, -2.0]);
    }

    #[test]
    fn test_first_order_bandpass_coefficients() {
        // Band centred on fs/4 with the edges at fs/8 and 3fs/8.
        let filter = IirFilter::butter_bandpass(1, 0.25, 0.75).unwrap();
        assert_close(&filter.b, &[0.5, 0.0, -0.5], 1e-12);
        assert_close(&filter.a, &[1.0, 0.0, 0.0], 1e-12);
    }

    #[test]
    fn test_bandpass_shape() {
        let filter = IirFilter::butter_bandpass(3, 0.5, 0.75).unwrap();
        assert_eq!(filter.b.len(), 7);
        assert_eq!(filter.a.len(), 7);
        assert_eq!(filter.a[0], 1.0);
        // Zeros at z = 1 and z = -1 block DC and Nyquist.
        let at_dc: f64 = filter.b.iter().sum();
        let at_nyquist: f64 = filter
            .b
            .iter()
            .enumerate()
            .map(|(i, c)| if i % 2 == 0 { *c } else { -c })
            .sum();
        assert!(at_dc.abs() < 1e-12);
        assert!(at_nyquist.abs() < 1e-12);
    }

    #[test]
    fn test_invalid_design() {
        assert_eq!(
            IirFilter::butter_bandpass(0, 0.2, 0.4),
            Err(TransformError::InvalidFilterOrder(0))
        );
        assert!(IirFilter::butter_bandpass(2, 0.4, 0.2).is_err());
        assert!(IirFilter::butter_bandpass(2, 0.0, 0.2).is_err());
        assert!(IirFilter::butter_bandpass(2, 0.2, 1.0).is_err());
    }

    #[test]
    fn test_filter_impulse_response() {
        let filter = IirFilter::new(vec![1.0], vec![1.0, -0.5]);
        let y = filter.filter(&[1.0, 0.0, 0.0, 0.0]);
        assert_close(&y, &[1.0, 0.5, 0.25, 0.125], 1e-15);
    }

    #[test]
    fn test_filter_fir() {
        let filter = IirFilter::new(vec![0.5, 0.5], vec![1.0]);
        let y = filter.filter(&[2.0, 4.0, 6.0]);
        assert_close(&y, &[1.0, 3.0, 5.0], 1e-15);
    }

    #[test]
    fn test_filter_normalizes_leading_coefficient() {
        let filter = IirFilter::new(vec![2.0], vec![2.0, -1.0]);
        assert_eq!(filter.b, vec![1.0]);
        assert_eq!(filter.a, vec![1.0, -0.5]);
    }
}
