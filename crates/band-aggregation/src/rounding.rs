//! Rounding Rules
//!
//! Band edges and frequency-bin snapping are rounded with an explicit rule
//! instead of whatever the platform happens to do.

use serde::{Deserialize, Serialize};

/// Largest decimal digit count handled exactly; `10^17 < 2^57` keeps the
/// scaled mantissa inside `u128`.
const MAX_DIGITS: u32 = 17;

/// Tie-breaking rule for rounding to the nearest integer or decimal place
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Ties go to the even neighbour (banker's rounding)
    #[default]
    HalfEven,
    /// Ties go away from zero
    HalfAwayFromZero,
}

impl RoundingMode {
    /// Round to the nearest integer
    pub fn round(self, value: f64) -> f64 {
        match self {
            RoundingMode::HalfEven => value.round_ties_even(),
            RoundingMode::HalfAwayFromZero => value.round(),
        }
    }

    /// Round to `digits` decimal places.
    ///
    /// The decision is made on the exact binary value, so `0.35` (stored as
    /// `0.34999...`) rounds to `0.3` under both rules while the exact tie
    /// `0.25` rounds to `0.2` or `0.3` depending on the rule. The result is
    /// the double nearest to the rounded decimal.
    pub fn round_decimal(self, value: f64, digits: u32) -> f64 {
        if !value.is_finite() || digits > MAX_DIGITS {
            return value;
        }

        let (mantissa, exponent) = decompose(value.abs());
        if exponent >= 0 {
            // already an integer
            return value;
        }

        let scale = 10u128.pow(digits);
        let scaled = mantissa as u128 * scale;
        let shift = exponent.unsigned_abs();

        let units = if shift >= 128 {
            0
        } else {
            let quotient = scaled >> shift;
            let remainder = scaled - (quotient << shift);
            let half = 1u128 << (shift - 1);
            let round_up = remainder > half
                || (remainder == half
                    && match self {
                        RoundingMode::HalfEven => quotient % 2 == 1,
                        RoundingMode::HalfAwayFromZero => true,
                    });
            if round_up {
                quotient + 1
            } else {
                quotient
            }
        };

        (units as f64 / scale as f64).copysign(value)
    }
}

/// Split a finite non-negative double into `mantissa * 2^exponent`
fn decompose(value: f64) -> (u64, i32) {
    let bits = value.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    }
}
