//! CMS Record Model
//!
//! One record is one acquisition of one signal on one turbine: a value
//! vector (spectrum or time series) plus the operating context that was
//! logged with it.

use crate::error::ExtractionError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::info;

/// Formats accepted for timestamps without an offset, read as UTC
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A single CMS acquisition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmsRecord {
    pub turbine_id: String,
    /// Missing for unnamed channels
    #[serde(default)]
    pub signal_id: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(alias = "value")]
    pub values: Vec<f64>,
    /// Every other field of the input object
    #[serde(flatten)]
    pub context: Map<String, Value>,
}

impl CmsRecord {
    /// Numeric context value, also accepting numbers stored as strings
    pub fn context_number(&self, field: &str) -> Option<f64> {
        match self.context.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Parse an RFC 3339 timestamp, a naive date-time or a bare date.
///
/// Values without an offset are taken as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ExtractionError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| ExtractionError::InvalidTimestamp(value.to_string()))
}

pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => parse_timestamp(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Load records from a file holding a JSON array of record objects
pub fn load_records(path: &Path) -> Result<Vec<CmsRecord>, ExtractionError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ExtractionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<CmsRecord> = serde_json::from_str(&contents)?;
    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}
