//! Record Aggregations
//!
//! An aggregation reduces the value vector of one record to one or more
//! named feature values. Plain statistics work on the raw values; spectral
//! aggregations resolve the record's spectrum once and evaluate every band
//! spec of the group over it.

use crate::error::ExtractionError;
use crate::record::CmsRecord;
use band_aggregation::{AggregateValue, RoundingMode};
use serde::{Deserialize, Serialize};
use spec_generator::AggregationSpec;
use spectral_transform::{EnvelopeAnalyzer, HardwareVariant, OrderTracking, DEFAULT_FILTER_ORDER};
use std::borrow::Cow;

/// Outcome of one feature on one record
pub type FeatureValue = Result<AggregateValue, ExtractionError>;

/// Reduction of one record to named feature values
pub trait Aggregation: Send + Sync {
    /// Feature names, one per value returned by [`Aggregation::aggregate`]
    fn names(&self) -> Vec<&str>;

    /// Feature values of one record in [`Aggregation::names`] order.
    ///
    /// An outer error makes the record unusable for every feature.
    fn aggregate(&self, record: &CmsRecord) -> Result<Vec<FeatureValue>, ExtractionError>;
}

/// Every feature name, in output order
pub fn feature_names(aggregations: &[Box<dyn Aggregation>]) -> Vec<&str> {
    aggregations.iter().flat_map(|a| a.names()).collect()
}

/// Statistics over the raw value vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    Mean,
    /// Population standard deviation
    Std,
    Rms,
    /// Values passed through unchanged
    Raw,
}

impl Statistic {
    pub fn as_str(self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Std => "std",
            Statistic::Rms => "rms",
            Statistic::Raw => "raw",
        }
    }

    /// Compute over `values`; empty input gives `NaN` for the scalar statistics
    pub fn compute(self, values: &[f64]) -> AggregateValue {
        let n = values.len() as f64;
        let mean = || values.iter().sum::<f64>() / n;
        match self {
            Statistic::Mean => mean().into(),
            Statistic::Std => {
                let m = mean();
                (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n)
                    .sqrt()
                    .into()
            }
            Statistic::Rms => (values.iter().map(|v| v * v).sum::<f64>() / n).sqrt().into(),
            Statistic::Raw => values.to_vec().into(),
        }
    }
}

/// Statistic under a feature name
#[derive(Debug, Clone, PartialEq)]
pub struct NamedStatistic {
    pub name: String,
    pub statistic: Statistic,
}

impl NamedStatistic {
    /// Compute `statistic` under the feature name `name`
    pub fn new(name: impl Into<String>, statistic: Statistic) -> Self {
        Self {
            name: name.into(),
            statistic,
        }
    }
}

impl From<Statistic> for NamedStatistic {
    fn from(statistic: Statistic) -> Self {
        Self::new(statistic.as_str(), statistic)
    }
}

impl Aggregation for NamedStatistic {
    fn names(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn aggregate(&self, record: &CmsRecord) -> Result<Vec<FeatureValue>, ExtractionError> {
        Ok(vec![Ok(self.statistic.compute(&record.values))])
    }
}

fn default_rpm_field() -> String {
    "rpm".to_string()
}

fn default_filter_order() -> usize {
    DEFAULT_FILTER_ORDER
}

/// How the amplitude/frequency pair of a record is obtained
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpectrumSource {
    /// Values are amplitudes; the axis comes from the spec itself
    #[default]
    Embedded,
    /// Values are amplitudes over one fixed axis
    Fixed { frequency_values: Vec<f64> },
    /// Values are amplitudes over a uniform axis
    Uniform {
        delta_frequency: f64,
        #[serde(default)]
        hardware_variant: HardwareVariant,
    },
    /// Uniform axis corrected to the nominal speed, RPM read from the record context
    OrderTracked {
        delta_frequency: f64,
        nominal_rpm: f64,
        #[serde(default = "default_rpm_field")]
        rpm_field: String,
        #[serde(default)]
        hardware_variant: HardwareVariant,
        #[serde(default)]
        rounding: RoundingMode,
    },
    /// Values are a time series; aggregate over its envelope spectrum
    Envelope {
        sampling_frequency: f64,
        #[serde(default)]
        lowcut: Option<f64>,
        #[serde(default)]
        highcut: Option<f64>,
        #[serde(default = "default_filter_order")]
        order: usize,
    },
}

/// Amplitudes with their frequency axis, if one is known
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum<'a> {
    pub amplitude_values: Cow<'a, [f64]>,
    pub frequency_values: Option<Cow<'a, [f64]>>,
}

impl SpectrumSource {
    /// Spectrum of one record
    pub fn resolve<'a>(&'a self, record: &'a CmsRecord) -> Result<Spectrum<'a>, ExtractionError> {
        let values = record.values.as_slice();
        let spectrum = match self {
            SpectrumSource::Embedded => Spectrum {
                amplitude_values: Cow::Borrowed(values),
                frequency_values: None,
            },
            SpectrumSource::Fixed { frequency_values } => Spectrum {
                amplitude_values: Cow::Borrowed(values),
                frequency_values: Some(Cow::Borrowed(frequency_values.as_slice())),
            },
            SpectrumSource::Uniform {
                delta_frequency,
                hardware_variant,
            } => Spectrum {
                amplitude_values: Cow::Borrowed(values),
                frequency_values: Some(Cow::Owned(
                    hardware_variant.frequency_axis(values.len(), *delta_frequency),
                )),
            },
            SpectrumSource::OrderTracked {
                delta_frequency,
                nominal_rpm,
                rpm_field,
                hardware_variant,
                rounding,
            } => {
                let rpm = record.context_number(rpm_field).ok_or_else(|| {
                    ExtractionError::MissingContextField {
                        field: rpm_field.clone(),
                        turbine_id: record.turbine_id.clone(),
                    }
                })?;
                let axis = OrderTracking::new(*delta_frequency, rpm, *nominal_rpm)
                    .with_hardware_variant(*hardware_variant)
                    .with_rounding(*rounding)
                    .shift_frequency(values)?;
                Spectrum {
                    amplitude_values: Cow::Borrowed(values),
                    frequency_values: Some(Cow::Owned(axis)),
                }
            }
            SpectrumSource::Envelope {
                sampling_frequency,
                lowcut,
                highcut,
                order,
            } => {
                let envelope = EnvelopeAnalyzer::new(*sampling_frequency)?
                    .with_band(*lowcut, *highcut)
                    .with_order(*order)
                    .analyze(values)?;
                Spectrum {
                    amplitude_values: Cow::Owned(envelope.amplitude_values),
                    frequency_values: Some(Cow::Owned(envelope.frequency_values)),
                }
            }
        };
        Ok(spectrum)
    }
}

/// Band specs sharing one spectrum source
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralAggregation {
    pub source: SpectrumSource,
    pub specs: Vec<AggregationSpec>,
}

impl SpectralAggregation {
    /// Evaluate `specs` over the spectrum `source` resolves for each record
    pub fn new(source: SpectrumSource, specs: Vec<AggregationSpec>) -> Self {
        Self { source, specs }
    }
}

impl Aggregation for SpectralAggregation {
    fn names(&self) -> Vec<&str> {
        self.specs.iter().map(|spec| spec.name.as_str()).collect()
    }

    fn aggregate(&self, record: &CmsRecord) -> Result<Vec<FeatureValue>, ExtractionError> {
        let spectrum = self.source.resolve(record)?;
        let frequency_values = spectrum.frequency_values.as_deref();
        Ok(self
            .specs
            .iter()
            .map(|spec| {
                spec.evaluate(&spectrum.amplitude_values, frequency_values)
                    .map_err(ExtractionError::from)
            })
            .collect())
    }
}
