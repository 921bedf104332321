//! Analytic Signal
//!
//! FFT based Hilbert transform: zero the negative frequencies, double the
//! positive ones and transform back.

use rustfft::{num_complex::Complex, FftPlanner};

/// Spectral weight of bin `index` for a length `len` analytic signal
fn analytic_weight(index: usize, len: usize) -> f64 {
    if index == 0 || (len % 2 == 0 && index == len / 2) {
        1.0
    } else if index < (len + 1) / 2 {
        2.0
    } else {
        0.0
    }
}

/// Analytic signal of a real input. The real part reproduces the input,
/// the imaginary part is its Hilbert transform.
pub fn analytic_signal(planner: &mut FftPlanner<f64>, signal: &[f64]) -> Vec<Complex<f64>> {
    let len = signal.len();
    if len == 0 {
        return Vec::new();
    }

    let mut buffer: Vec<Complex<f64>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    planner.plan_fft_forward(len).process(&mut buffer);

    for (index, bin) in buffer.iter_mut().enumerate() {
        *bin *= analytic_weight(index, len);
    }

    planner.plan_fft_inverse(len).process(&mut buffer);

    // rustfft does not normalize the inverse transform
    let scale = 1.0 / len as f64;
    buffer.iter_mut().for_each(|c| *c *= scale);
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_weights_even() {
        let weights: Vec<f64> = (0..6).map(|i| analytic_weight(i, 6)).collect();
        assert_eq!(weights, vec![1.0, 2.0, 2.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_weights_odd() {
        let weights: Vec<f64> = (0..5).map(|i| analytic_weight(i, 5)).collect();
        assert_eq!(weights, vec![1.0, 2.0, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_real_part_preserved() {
        let mut planner = FftPlanner::new();
        let signal = vec![0.3, -1.2, 4.0, 2.5, 0.0, -0.7, 1.1];
        let analytic = analytic_signal(&mut planner, &signal);
        for (a, x) in analytic.iter().zip(&signal) {
            assert!((a.re - x).abs() < 1e-12);
        }
    }

    #[test]
    fn test_cosine_envelope() {
        // A whole number of cosine periods has a flat unit envelope.
        let mut planner = FftPlanner::new();
        let len = 64;
        let signal: Vec<f64> = (0..len)
            .map(|i| (2.0 * PI * 4.0 * i as f64 / len as f64).cos())
            .collect();
        let analytic = analytic_signal(&mut planner, &signal);
        for (i, c) in analytic.iter().enumerate() {
            let expected_im = (2.0 * PI * 4.0 * i as f64 / len as f64).sin();
            assert!((c.im - expected_im).abs() < 1e-12);
            assert!((c.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_empty_signal() {
        let mut planner = FftPlanner::new();
        assert!(analytic_signal(&mut planner, &[]).is_empty());
    }
}
