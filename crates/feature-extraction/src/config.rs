//! Extraction configuration

use crate::aggregation::{
    feature_names, Aggregation, NamedStatistic, SpectralAggregation, SpectrumSource, Statistic,
};
use crate::error::ExtractionError;
use crate::extract::ContextFields;
use crate::filter::RecordFilter;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use spec_generator::{AggregationSpec, GeneratorConfig, SpecGenerator};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Prefix of environment variables overriding file settings
pub const ENV_PREFIX: &str = "CMS";

/// One entry of the aggregation list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AggregationConfig {
    /// Plain statistic, named after the statistic unless renamed
    Statistic {
        statistic: Statistic,
        #[serde(default)]
        name: Option<String>,
    },
    /// Every spec a generator expands to
    Generated {
        generator: GeneratorConfig,
        #[serde(default)]
        source: SpectrumSource,
    },
    /// A single hand-written spec
    Spec {
        spec: AggregationSpec,
        #[serde(default)]
        source: SpectrumSource,
    },
}

impl AggregationConfig {
    /// Instantiate the aggregation this entry describes.
    ///
    /// Generated specs share one source, so each record's spectrum is
    /// resolved once for all of them.
    pub fn build(&self) -> Result<Box<dyn Aggregation>, ExtractionError> {
        let aggregation: Box<dyn Aggregation> = match self {
            AggregationConfig::Statistic { statistic, name } => {
                let name = name.clone().unwrap_or_else(|| statistic.as_str().to_string());
                Box::new(NamedStatistic::new(name, *statistic))
            }
            AggregationConfig::Generated { generator, source } => {
                let specs = generator.generate()?;
                debug!("Generator expanded to {} specs", specs.len());
                Box::new(SpectralAggregation::new(source.clone(), specs))
            }
            AggregationConfig::Spec { spec, source } => Box::new(SpectralAggregation::new(
                source.clone(),
                vec![spec.clone()],
            )),
        };
        Ok(aggregation)
    }
}

/// Feature extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// JSON array of records
    pub input: PathBuf,

    /// Output JSON file, stdout when absent
    #[serde(default)]
    pub output: Option<PathBuf>,

    #[serde(default)]
    pub filter: RecordFilter,

    #[serde(default)]
    pub context_fields: ContextFields,

    /// 0 warnings, 1 info, 2 and above debug
    #[serde(default)]
    pub verbosity: u8,

    pub aggregations: Vec<AggregationConfig>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("records.json"),
            output: None,
            filter: RecordFilter::default(),
            context_fields: ContextFields::default(),
            verbosity: 0,
            aggregations: [Statistic::Mean, Statistic::Std, Statistic::Rms]
                .into_iter()
                .map(|statistic| AggregationConfig::Statistic {
                    statistic,
                    name: None,
                })
                .collect(),
        }
    }
}

impl ExtractionConfig {
    /// Load from a TOML file, then apply `CMS_*` environment overrides.
    ///
    /// Nested keys use a double underscore, e.g. `CMS_FILTER__START_TIME`.
    pub fn load(path: &Path) -> Result<Self, ExtractionError> {
        let settings = Config::builder()
            .add_source(File::from(path))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Build every configured aggregation; feature names must be unique
    pub fn build_aggregations(&self) -> Result<Vec<Box<dyn Aggregation>>, ExtractionError> {
        let mut seen = HashSet::new();
        let mut aggregations = Vec::new();
        for entry in &self.aggregations {
            let aggregation = entry.build()?;
            for name in aggregation.names() {
                if !seen.insert(name.to_string()) {
                    return Err(ExtractionError::DuplicateAggregation(name.to_string()));
                }
            }
            aggregations.push(aggregation);
        }
        Ok(aggregations)
    }

    /// Log the run parameters
    pub fn log_summary(&self, aggregations: &[Box<dyn Aggregation>]) {
        info!("Extracting CMS Features:");
        info!("    Input: {}", self.input.display());
        match &self.output {
            Some(output) => info!("    Output: {}", output.display()),
            None => info!("    Output: <stdout>"),
        }
        info!("    Aggregations: {:?}", feature_names(aggregations));
        if !self.filter.signals.is_empty() {
            info!("    Signals: {:?}", self.filter.signals);
        }
        if !self.filter.turbines.is_empty() {
            info!("    Turbines: {:?}", self.filter.turbines);
        }
        if let Some(start) = self.filter.start_time {
            info!("    Start Time: {}", start);
        }
        if let Some(end) = self.filter.end_time {
            info!("    End Time: {}", end);
        }
    }
}
