//! Record Filtering

use crate::record::{deserialize_optional_timestamp, CmsRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Time range and id filters applied before aggregation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordFilter {
    /// Minimum timestamp, inclusive
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub start_time: Option<DateTime<Utc>>,
    /// Maximum timestamp, exclusive
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub end_time: Option<DateTime<Utc>>,
    /// Signal id substrings, case-insensitive, any may match
    #[serde(default)]
    pub signals: Vec<String>,
    /// Turbine id substrings, case-insensitive, any may match
    #[serde(default)]
    pub turbines: Vec<String>,
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    needles
        .iter()
        .any(|needle| haystack.contains(&needle.to_lowercase()))
}

impl RecordFilter {
    /// Keep records with `start_time <= timestamp < end_time`; `None` leaves a side open
    pub fn with_time_range(
        mut self,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    /// Keep records whose signal id contains any of `signals`
    pub fn with_signals(mut self, signals: Vec<String>) -> Self {
        self.signals = signals;
        self
    }

    /// Keep records whose turbine id contains any of `turbines`
    pub fn with_turbines(mut self, turbines: Vec<String>) -> Self {
        self.turbines = turbines;
        self
    }

    /// Whether one record passes every configured filter.
    ///
    /// Records without a signal id never pass a signal filter.
    pub fn matches(&self, record: &CmsRecord) -> bool {
        if self.start_time.is_some_and(|start| record.timestamp < start) {
            return false;
        }
        if self.end_time.is_some_and(|end| record.timestamp >= end) {
            return false;
        }
        if !self.signals.is_empty() {
            match &record.signal_id {
                Some(signal_id) if contains_any(signal_id, &self.signals) => {}
                _ => return false,
            }
        }
        if !self.turbines.is_empty() && !contains_any(&record.turbine_id, &self.turbines) {
            return false;
        }
        true
    }

    /// Records passing the filter, in input order
    pub fn apply<'a>(&self, records: &'a [CmsRecord]) -> Vec<&'a CmsRecord> {
        if let Some(start) = self.start_time {
            info!("Filtering by start time {}", start);
        }
        if let Some(end) = self.end_time {
            info!("Filtering by end time {}", end);
        }
        if !self.signals.is_empty() {
            info!("Filtering by signals {:?}", self.signals);
        }
        if !self.turbines.is_empty() {
            info!("Filtering by turbines {:?}", self.turbines);
        }

        let selected: Vec<&CmsRecord> = records.iter().filter(|r| self.matches(r)).collect();
        info!("Selected {} entries after filtering", selected.len());
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::parse_timestamp;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;
    use serde_json::Map;

    fn record(turbine: &str, signal: Option<&str>, timestamp: &str) -> CmsRecord {
        CmsRecord {
            turbine_id: turbine.to_string(),
            signal_id: signal.map(str::to_string),
            timestamp: parse_timestamp(timestamp).unwrap(),
            values: vec![1.0],
            context: Map::new(),
        }
    }

    fn sample() -> Vec<CmsRecord> {
        vec![
            record("T001", Some("GearboxHSS_Acc"), "2020-01-01"),
            record("T001", Some("MainBearing_Acc"), "2020-01-02"),
            record("T002", Some("gearboxlss_acc"), "2020-01-03"),
            record("T002", None, "2020-01-04"),
        ]
    }

    #[test]
    fn test_no_filter_keeps_all() {
        let records = sample();
        assert_eq!(RecordFilter::default().apply(&records).len(), 4);
    }

    #[test]
    fn test_time_range_bounds() {
        let records = sample();
        let filter = RecordFilter::default().with_time_range(
            Some(parse_timestamp("2020-01-02").unwrap()),
            Some(parse_timestamp("2020-01-04").unwrap()),
        );
        let selected = filter.apply(&records);
        let days: Vec<String> = selected
            .iter()
            .map(|r| r.timestamp.format("%d").to_string())
            .collect();
        assert_eq!(days, vec!["02", "03"]);
    }

    #[test]
    fn test_signal_substring_case_insensitive() {
        let records = sample();
        let filter = RecordFilter::default().with_signals(vec!["GEARBOX".to_string()]);
        let selected = filter.apply(&records);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].signal_id.as_deref(), Some("GearboxHSS_Acc"));
        assert_eq!(selected[1].signal_id.as_deref(), Some("gearboxlss_acc"));
    }

    #[test]
    fn test_missing_signal_never_matches() {
        let records = sample();
        let filter = RecordFilter::default().with_signals(vec!["".to_string()]);
        assert_eq!(filter.apply(&records).len(), 3);
    }

    #[test]
    fn test_turbine_any_of() {
        let records = sample();
        let filter = RecordFilter::default()
            .with_turbines(vec!["t002".to_string(), "T999".to_string()])
            .with_signals(vec!["acc".to_string()]);
        let selected = filter.apply(&records);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].turbine_id, "T002");
    }

    #[test]
    fn test_filter_deserialize() {
        let filter: RecordFilter = serde_json::from_str(
            r#"{"start_time": "2020-01-02", "end_time": null, "signals": ["S1"]}"#,
        )
        .unwrap();
        assert_eq!(filter.start_time, Some(parse_timestamp("2020-01-02").unwrap()));
        assert_eq!(filter.end_time, None);
        assert_eq!(filter.signals, vec!["S1"]);
        assert!(filter.turbines.is_empty());
    }

    proptest! {
        #[test]
        fn test_time_range_half_open(
            hours in proptest::collection::vec(0i64..240, 0..40),
            start in 0i64..240,
            len in 0i64..240,
        ) {
            let origin = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
            let records: Vec<CmsRecord> = hours
                .iter()
                .map(|h| CmsRecord {
                    turbine_id: "T1".to_string(),
                    signal_id: None,
                    timestamp: origin + Duration::hours(*h),
                    values: vec![],
                    context: Map::new(),
                })
                .collect();
            let filter = RecordFilter::default().with_time_range(
                Some(origin + Duration::hours(start)),
                Some(origin + Duration::hours(start + len)),
            );

            let selected = filter.apply(&records);
            let expected = hours.iter().filter(|h| **h >= start && **h < start + len).count();
            prop_assert_eq!(selected.len(), expected);
        }
    }
}
