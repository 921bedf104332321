//! Frequency-Spec Generators
//!
//! Expand a compact band/harmonic/sideband description into an ordered list
//! of named [`AggregationSpec`]s. Output order follows the sweep or harmonic
//! index and determines the column order of the extracted features.

use crate::error::{ensure_finite, GeneratorError};
use crate::spec::AggregationSpec;
use band_aggregation::{FrequencyBand, InitParams, Primitive, RoundingMode};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Decimal places kept on plain harmonic band edges
pub const HARMONIC_DIGITS: u32 = 1;

/// Decimal places kept on harmonic-with-sideband band edges
pub const SIDEBAND_DIGITS: u32 = 2;

/// Upper bound on the number of bands one sweep may produce
pub const MAX_SWEEP_BANDS: usize = 1_000_000;

/// Anything that expands into a batch of specs
pub trait SpecGenerator {
    /// Produce the specs in emission order
    fn generate(&self) -> Result<Vec<AggregationSpec>, GeneratorError>;
}

fn default_band_name() -> String {
    "band".to_string()
}

fn default_harmonic_name() -> String {
    "harm".to_string()
}

fn default_band_rms() -> Primitive {
    Primitive::BandRms
}

fn default_sideband_rms() -> Primitive {
    Primitive::BandSidebandRms
}

/// Consecutive bands `[i, i + step]` for `i` in `low, low + step, ...` below `high`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandSweep {
    /// First band lower edge
    pub low: f64,
    /// Exclusive bound on band lower edges
    pub high: f64,
    /// Band width and stride
    pub step: f64,
    /// Spec name prefix
    #[serde(default = "default_band_name")]
    pub name: String,
    /// Primitive bound to every band
    #[serde(default = "default_band_rms")]
    pub primitive: Primitive,
    /// Fixed axis embedded in every spec
    #[serde(default)]
    pub frequency_values: Option<Vec<f64>>,
}

impl BandSweep {
    /// Sweep from `low` towards `high` in `step` wide bands
    pub fn new(low: f64, high: f64, step: f64) -> Self {
        Self {
            low,
            high,
            step,
            name: default_band_name(),
            primitive: default_band_rms(),
            frequency_values: None,
        }
    }

    /// Set the name prefix
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the primitive
    pub fn with_primitive(mut self, primitive: Primitive) -> Self {
        self.primitive = primitive;
        self
    }

    /// Embed a fixed frequency axis
    pub fn with_frequency_values(mut self, frequency_values: Vec<f64>) -> Self {
        self.frequency_values = Some(frequency_values);
        self
    }
}

impl SpecGenerator for BandSweep {
    fn generate(&self) -> Result<Vec<AggregationSpec>, GeneratorError> {
        let low = ensure_finite("low", self.low)?;
        let high = ensure_finite("high", self.high)?;
        if !(self.step > 0.0 && self.step.is_finite()) {
            return Err(GeneratorError::InvalidStep(self.step));
        }

        // half-open stepping: lower edges stay strictly below `high`
        let steps = ((high - low) / self.step).ceil().max(0.0);
        if steps > MAX_SWEEP_BANDS as f64 {
            return Err(GeneratorError::TooManyBands {
                low,
                high,
                step: self.step,
                limit: MAX_SWEEP_BANDS,
            });
        }
        let count = steps as usize;

        let specs: Vec<AggregationSpec> = (0..count)
            .map(|i| {
                let band_low = low + i as f64 * self.step;
                let band_high = band_low + self.step;
                AggregationSpec::new(
                    format!("{}_{}_{}", self.name, band_low, band_high),
                    self.primitive,
                    InitParams::band(band_low, band_high)
                        .with_frequency_values(self.frequency_values.as_deref()),
                )
            })
            .collect();

        debug!("Generated {} band specs for {}", specs.len(), self.name);
        Ok(specs)
    }
}

/// One band of `±width` around each of the first `number` harmonics
///
/// `number > 0` is a precondition; zero yields no specs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Harmonics {
    /// First harmonic frequency
    pub first: f64,
    /// Number of harmonics
    pub number: usize,
    /// Half-width of each band
    pub width: f64,
    /// Spec name prefix
    #[serde(default = "default_harmonic_name")]
    pub name: String,
    /// Primitive bound to every band
    #[serde(default = "default_band_rms")]
    pub primitive: Primitive,
    /// Fixed axis embedded in every spec
    #[serde(default)]
    pub frequency_values: Option<Vec<f64>>,
    /// Tie rule for band edges and names
    #[serde(default)]
    pub rounding: RoundingMode,
}

impl Harmonics {
    /// Harmonic bands at `k * first ± width`, `k = 1..=number`
    pub fn new(first: f64, number: usize, width: f64) -> Self {
        Self {
            first,
            number,
            width,
            name: default_harmonic_name(),
            primitive: default_band_rms(),
            frequency_values: None,
            rounding: RoundingMode::default(),
        }
    }

    /// Set the name prefix
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the primitive
    pub fn with_primitive(mut self, primitive: Primitive) -> Self {
        self.primitive = primitive;
        self
    }

    /// Embed a fixed frequency axis
    pub fn with_frequency_values(mut self, frequency_values: Vec<f64>) -> Self {
        self.frequency_values = Some(frequency_values);
        self
    }

    /// Set the rounding rule
    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }
}

impl SpecGenerator for Harmonics {
    fn generate(&self) -> Result<Vec<AggregationSpec>, GeneratorError> {
        let first = ensure_finite("first", self.first)?;
        let width = ensure_finite("width", self.width)?;

        let mut specs = Vec::with_capacity(self.number);
        for k in 1..=self.number {
            let frequency = first * k as f64;
            let band = FrequencyBand::new(
                self.rounding.round_decimal(frequency - width, HARMONIC_DIGITS),
                self.rounding.round_decimal(frequency + width, HARMONIC_DIGITS),
            )?;

            specs.push(AggregationSpec::new(
                format!("{}{}_{}Hz", self.name, k, self.rounding.round_decimal(frequency, 0)),
                self.primitive,
                InitParams::band(band.min_frequency(), band.max_frequency())
                    .with_frequency_values(self.frequency_values.as_deref()),
            ));
        }

        debug!("Generated {} harmonic specs for {}", specs.len(), self.name);
        Ok(specs)
    }
}

/// Harmonic bands each carrying `2 * sideband_number` sidebands spaced
/// `sideband` apart on either side of the harmonic
///
/// `number > 0` is a precondition; zero yields no specs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonicSidebands {
    /// First harmonic frequency
    pub first: f64,
    /// Number of harmonics
    pub number: usize,
    /// Half-width of the harmonic and sideband bands
    pub width: f64,
    /// Sideband spacing from the harmonic
    pub sideband: f64,
    /// Sidebands on each side of the harmonic
    pub sideband_number: usize,
    /// Spec name prefix
    #[serde(default = "default_harmonic_name")]
    pub name: String,
    /// `band_sideband_rms` or `band_sideband_pr`
    #[serde(default = "default_sideband_rms")]
    pub primitive: Primitive,
    /// Fixed axis embedded in every spec
    #[serde(default)]
    pub frequency_values: Option<Vec<f64>>,
    /// Tie rule for band edges and names
    #[serde(default)]
    pub rounding: RoundingMode,
}

impl HarmonicSidebands {
    fn with(
        first: f64,
        number: usize,
        width: f64,
        sideband: f64,
        sideband_number: usize,
        primitive: Primitive,
    ) -> Self {
        Self {
            first,
            number,
            width,
            sideband,
            sideband_number,
            name: default_harmonic_name(),
            primitive,
            frequency_values: None,
            rounding: RoundingMode::default(),
        }
    }

    /// Harmonics with sidebands bound to `band_sideband_rms`
    pub fn rms(first: f64, number: usize, width: f64, sideband: f64, sideband_number: usize) -> Self {
        Self::with(first, number, width, sideband, sideband_number, Primitive::BandSidebandRms)
    }

    /// Harmonics with sidebands bound to `band_sideband_pr`
    pub fn power_ratio(
        first: f64,
        number: usize,
        width: f64,
        sideband: f64,
        sideband_number: usize,
    ) -> Self {
        Self::with(first, number, width, sideband, sideband_number, Primitive::BandSidebandPr)
    }

    /// Set the name prefix
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Embed a fixed frequency axis
    pub fn with_frequency_values(mut self, frequency_values: Vec<f64>) -> Self {
        self.frequency_values = Some(frequency_values);
        self
    }

    /// Set the rounding rule
    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }
}

/// Offsets `-count*spacing, ..., -spacing, spacing, ..., count*spacing`
pub(crate) fn sideband_offsets(spacing: f64, count: usize) -> Vec<f64> {
    let count = count as i64;
    (-count..=count)
        .map(|j| j as f64 * spacing)
        .filter(|offset| *offset != 0.0)
        .collect()
}

impl SpecGenerator for HarmonicSidebands {
    fn generate(&self) -> Result<Vec<AggregationSpec>, GeneratorError> {
        let first = ensure_finite("first", self.first)?;
        let width = ensure_finite("width", self.width)?;
        let spacing = ensure_finite("sideband", self.sideband)?;
        let offsets = sideband_offsets(spacing, self.sideband_number);
        let round = |value: f64| self.rounding.round_decimal(value, SIDEBAND_DIGITS);

        let mut specs = Vec::with_capacity(self.number);
        for k in 1..=self.number {
            let frequency = first * k as f64;
            let band = FrequencyBand::new(round(frequency - width), round(frequency + width))?;

            let side_bands = offsets
                .iter()
                .map(|offset| {
                    FrequencyBand::new(
                        round(offset + frequency - width),
                        round(offset + frequency + width),
                    )
                })
                .collect::<Result<Vec<_>, _>>()?;

            specs.push(AggregationSpec::new(
                format!("{}{}_{}Hz_sb", self.name, k, self.rounding.round_decimal(frequency, 0)),
                self.primitive,
                InitParams::band(band.min_frequency(), band.max_frequency())
                    .with_frequency_values(self.frequency_values.as_deref())
                    .with_side_bands(side_bands),
            ));
        }

        debug!(
            "Generated {} harmonic sideband specs for {} ({} sidebands each)",
            specs.len(),
            self.name,
            offsets.len()
        );
        Ok(specs)
    }
}

/// Generator selected by a `kind` tag, as written in configuration files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratorConfig {
    BandSweep(BandSweep),
    Harmonics(Harmonics),
    HarmonicSidebands(HarmonicSidebands),
}

impl SpecGenerator for GeneratorConfig {
    fn generate(&self) -> Result<Vec<AggregationSpec>, GeneratorError> {
        match self {
            GeneratorConfig::BandSweep(g) => g.generate(),
            GeneratorConfig::Harmonics(g) => g.generate(),
            GeneratorConfig::HarmonicSidebands(g) => g.generate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harmonics_names_and_bounds() {
        let specs = Harmonics::new(25.0, 3, 2.0).generate().unwrap();

        let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["harm1_25Hz", "harm2_50Hz", "harm3_75Hz"]);

        for (k, spec) in specs.iter().enumerate() {
            let center = 25.0 * (k + 1) as f64;
            assert_eq!(spec.primitive, Primitive::BandRms);
            assert_eq!(spec.init_params.min_frequency, center - 2.0);
            assert_eq!(spec.init_params.max_frequency, center + 2.0);
            assert!(spec.init_params.side_bands.is_none());
        }
    }

    #[test]
    fn test_harmonics_zero_number() {
        assert!(Harmonics::new(25.0, 0, 2.0).generate().unwrap().is_empty());
    }

    #[test]
    fn test_harmonics_round_one_digit() {
        let specs = Harmonics::new(10.0, 1, 0.06).generate().unwrap();
        assert_eq!(specs[0].init_params.min_frequency, 9.9);
        assert_eq!(specs[0].init_params.max_frequency, 10.1);
        assert_eq!(specs[0].name, "harm1_10Hz");
    }

    #[test]
    fn test_harmonics_rounding_mode() {
        let even = Harmonics::new(0.25, 1, 0.0).generate().unwrap();
        assert_eq!(even[0].init_params.min_frequency, 0.2);

        let away = Harmonics::new(0.25, 1, 0.0)
            .with_rounding(RoundingMode::HalfAwayFromZero)
            .generate()
            .unwrap();
        assert_eq!(away[0].init_params.min_frequency, 0.3);

        // 2.5 Hz names as 2 or 3 depending on the rule
        let even = Harmonics::new(2.5, 1, 0.0).generate().unwrap();
        assert_eq!(even[0].name, "harm1_2Hz");
        let away = Harmonics::new(2.5, 1, 0.0)
            .with_rounding(RoundingMode::HalfAwayFromZero)
            .generate()
            .unwrap();
        assert_eq!(away[0].name, "harm1_3Hz");
    }

    #[test]
    fn test_harmonics_negative_width_rejected() {
        let err = Harmonics::new(25.0, 2, -1.0).generate().unwrap_err();
        assert!(matches!(err, GeneratorError::Band(_)));
    }

    #[test]
    fn test_band_sweep() {
        let specs = BandSweep::new(0.0, 90.0, 25.0).with_name("low").generate().unwrap();
        let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["low_0_25", "low_25_50", "low_50_75", "low_75_100"]);
        assert_eq!(specs[3].init_params.min_frequency, 75.0);
        assert_eq!(specs[3].init_params.max_frequency, 100.0);
    }

    #[test]
    fn test_band_sweep_exact_boundary() {
        let specs = BandSweep::new(0.0, 100.0, 25.0).generate().unwrap();
        assert_eq!(specs.len(), 4);
        assert_eq!(specs[0].name, "band_0_25");
        assert_eq!(specs[0].primitive, Primitive::BandRms);
    }

    #[test]
    fn test_band_sweep_fractional_names() {
        let specs = BandSweep::new(0.5, 2.0, 0.5).generate().unwrap();
        let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["band_0.5_1", "band_1_1.5", "band_1.5_2"]);
    }

    #[test]
    fn test_band_sweep_invalid_step() {
        assert_eq!(
            BandSweep::new(0.0, 100.0, 0.0).generate(),
            Err(GeneratorError::InvalidStep(0.0))
        );
        assert!(BandSweep::new(0.0, 100.0, -5.0).generate().is_err());
        assert!(BandSweep::new(100.0, 0.0, 5.0).generate().unwrap().is_empty());
        assert!(matches!(
            BandSweep::new(f64::NAN, 100.0, 5.0).generate(),
            Err(GeneratorError::NonFinite { field: "low", .. })
        ));
    }

    #[test]
    fn test_band_sweep_band_limit() {
        assert_eq!(
            BandSweep::new(0.0, 2000.0, 1e-300).generate(),
            Err(GeneratorError::TooManyBands {
                low: 0.0,
                high: 2000.0,
                step: 1e-300,
                limit: MAX_SWEEP_BANDS,
            })
        );
        assert_eq!(BandSweep::new(0.0, 1.0, 1e-3).generate().unwrap().len(), 1000);
    }

    #[test]
    fn test_frequency_values_embedded() {
        let axis = vec![10.0, 20.0, 30.0];
        let specs = BandSweep::new(0.0, 20.0, 10.0)
            .with_frequency_values(axis.clone())
            .generate()
            .unwrap();
        assert!(specs
            .iter()
            .all(|s| s.init_params.frequency_values.as_ref() == Some(&axis)));
    }

    #[test]
    fn test_sideband_offsets() {
        assert_eq!(sideband_offsets(5.0, 2), vec![-10.0, -5.0, 5.0, 10.0]);
        assert!(sideband_offsets(5.0, 0).is_empty());
        assert!(sideband_offsets(0.0, 3).is_empty());
    }

    #[test]
    fn test_harmonic_sidebands() {
        let specs = HarmonicSidebands::rms(25.0, 2, 1.0, 5.0, 2).generate().unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].name, "harm1_25Hz_sb");
        assert_eq!(specs[1].name, "harm2_50Hz_sb");
        assert_eq!(specs[0].primitive, Primitive::BandSidebandRms);

        let side_bands: Vec<(f64, f64)> = specs[1]
            .init_params
            .side_bands
            .clone()
            .unwrap()
            .into_iter()
            .map(Into::into)
            .collect();
        assert_eq!(
            side_bands,
            vec![(39.0, 41.0), (44.0, 46.0), (54.0, 56.0), (59.0, 61.0)]
        );
        assert_eq!(specs[1].init_params.min_frequency, 49.0);
        assert_eq!(specs[1].init_params.max_frequency, 51.0);
    }

    #[test]
    fn test_harmonic_sidebands_two_digit_rounding() {
        let specs = HarmonicSidebands::power_ratio(10.0, 1, 0.125, 1.0, 1)
            .generate()
            .unwrap();
        assert_eq!(specs[0].primitive, Primitive::BandSidebandPr);
        // 9.875 and 10.125 are exact ties at two digits
        assert_eq!(specs[0].init_params.min_frequency, 9.88);
        assert_eq!(specs[0].init_params.max_frequency, 10.12);

        let away = HarmonicSidebands::power_ratio(10.0, 1, 0.125, 1.0, 1)
            .with_rounding(RoundingMode::HalfAwayFromZero)
            .generate()
            .unwrap();
        assert_eq!(away[0].init_params.max_frequency, 10.13);
    }

    #[test]
    fn test_harmonic_sidebands_evaluate() {
        let amplitude: Vec<f64> = (0..50).map(|i| -10.0 + 0.5 * i as f64).collect();
        let frequency: Vec<f64> = (0..50).map(|i| 10.0 + 10.0 * i as f64).collect();
        let specs = HarmonicSidebands::power_ratio(100.0, 2, 5.0, 50.0, 1)
            .with_frequency_values(frequency)
            .generate()
            .unwrap();

        // harmonic 100 Hz -> amplitude -5.5, sidebands 50 Hz and 150 Hz -> -8.0 and -3.0
        let ratio = specs[0].evaluate(&amplitude, None).unwrap().as_scalar().unwrap();
        let expected = ((64.0 + 9.0) / 2.0f64).sqrt() / 5.5;
        assert!((ratio - expected).abs() < 1e-12);
    }

    #[test]
    fn test_generator_config_from_json() {
        let config: GeneratorConfig = serde_json::from_str(
            r#"{"kind": "harmonic_sidebands", "first": 25, "number": 3, "width": 2,
                "sideband": 5, "sideband_number": 1, "primitive": "band_sideband_pr"}"#,
        )
        .unwrap();
        let specs = config.generate().unwrap();
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[2].name, "harm3_75Hz_sb");
        assert_eq!(specs[2].primitive, Primitive::BandSidebandPr);

        let config: GeneratorConfig =
            serde_json::from_str(r#"{"kind": "harmonics", "first": 25, "number": 1, "width": 2}"#)
                .unwrap();
        assert_eq!(config.generate().unwrap()[0].name, "harm1_25Hz");
    }
}
