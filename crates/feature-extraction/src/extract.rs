//! Feature Extraction Runner
//!
//! Applies aggregations to filtered records and assembles one feature row
//! per record and feature name.

use crate::aggregation::{feature_names, Aggregation, FeatureValue};
use crate::error::ExtractionError;
use crate::filter::RecordFilter;
use crate::record::CmsRecord;
use band_aggregation::AggregateValue;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

/// Which context fields are copied into feature rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ContextFieldsRepr", into = "ContextFieldsRepr")]
pub enum ContextFields {
    #[default]
    All,
    Omit,
    /// Listed fields only; absent ones become `null`
    Only(Vec<String>),
}

/// Configuration shape: `true`, `false` or a list of field names
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ContextFieldsRepr {
    Flag(bool),
    Fields(Vec<String>),
}

impl From<ContextFieldsRepr> for ContextFields {
    fn from(repr: ContextFieldsRepr) -> Self {
        match repr {
            ContextFieldsRepr::Flag(true) => ContextFields::All,
            ContextFieldsRepr::Flag(false) => ContextFields::Omit,
            ContextFieldsRepr::Fields(fields) => ContextFields::Only(fields),
        }
    }
}

impl From<ContextFields> for ContextFieldsRepr {
    fn from(fields: ContextFields) -> Self {
        match fields {
            ContextFields::All => ContextFieldsRepr::Flag(true),
            ContextFields::Omit => ContextFieldsRepr::Flag(false),
            ContextFields::Only(fields) => ContextFieldsRepr::Fields(fields),
        }
    }
}

impl ContextFields {
    fn project(&self, context: &Map<String, Value>) -> Map<String, Value> {
        match self {
            ContextFields::All => context.clone(),
            ContextFields::Omit => Map::new(),
            ContextFields::Only(fields) => fields
                .iter()
                .map(|f| (f.clone(), context.get(f).cloned().unwrap_or(Value::Null)))
                .collect(),
        }
    }
}

/// One extracted feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub turbine_id: String,
    /// Source signal id joined with the aggregation name
    pub signal_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: AggregateValue,
    #[serde(flatten)]
    pub context: Map<String, Value>,
}

/// `{signal_id}_{name}` with leading and trailing underscores removed
pub fn feature_signal_id(signal_id: Option<&str>, name: &str) -> String {
    format!("{}_{}", signal_id.unwrap_or(""), name)
        .trim_matches('_')
        .to_string()
}

fn describe(record: &CmsRecord) -> String {
    format!(
        "{} {} at {}",
        record.turbine_id,
        record.signal_id.as_deref().unwrap_or("<unnamed>"),
        record.timestamp
    )
}

/// Apply one aggregation to every record.
///
/// Each record is aggregated once; its values are then spread over the
/// feature names. Rows are grouped by feature name, each group in record
/// order. Failed features and unusable records are logged and left out.
pub fn aggregate_values(
    records: &[&CmsRecord],
    aggregation: &dyn Aggregation,
    context_fields: &ContextFields,
) -> Vec<FeatureRow> {
    let names = aggregation.names();
    info!("Applying aggregation {} ({} features)", names.join(", "), names.len());

    let outcomes: Vec<Result<Vec<FeatureValue>, ExtractionError>> = records
        .par_iter()
        .map(|record| aggregation.aggregate(record))
        .collect();

    let mut per_record: Vec<Option<std::vec::IntoIter<FeatureValue>>> = records
        .iter()
        .zip(outcomes)
        .map(|(record, outcome)| match outcome {
            Ok(values) => Some(values.into_iter()),
            Err(e) => {
                warn!("Skipping {} for all {} features: {}", describe(record), names.len(), e);
                None
            }
        })
        .collect();

    let mut rows = Vec::new();
    for name in &names {
        for (record, values) in records.iter().zip(per_record.iter_mut()) {
            let Some(values) = values else { continue };
            match values.next() {
                Some(Ok(value)) => rows.push(FeatureRow {
                    turbine_id: record.turbine_id.clone(),
                    signal_id: feature_signal_id(record.signal_id.as_deref(), name),
                    timestamp: record.timestamp,
                    value,
                    context: context_fields.project(&record.context),
                }),
                Some(Err(e)) => warn!("Skipping {} for {}: {}", describe(record), name, e),
                None => warn!("No value for {} on {}", name, describe(record)),
            }
        }
    }
    rows
}

/// Filter the records, then apply every aggregation in order.
///
/// Rows are grouped by feature name, each group in record order.
pub fn extract_cms_features(
    records: &[CmsRecord],
    aggregations: &[Box<dyn Aggregation>],
    filter: &RecordFilter,
    context_fields: &ContextFields,
) -> Vec<FeatureRow> {
    let selected = filter.apply(records);

    let rows: Vec<FeatureRow> = aggregations
        .iter()
        .flat_map(|aggregation| aggregate_values(&selected, aggregation.as_ref(), context_fields))
        .collect();

    info!(
        "Extracted {} rows from {} records with {} features",
        rows.len(),
        selected.len(),
        feature_names(aggregations).len()
    );
    rows
}
