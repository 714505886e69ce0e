//! Backend record shapes and their conversion into [`RawSlot`].
//!
//! The local browser driver reads a date off the search form and the
//! start time off each slot label (`"5:30pm"`). The remote browser
//! service returns one ISO-8601 datetime per slot. Dumps in the generic
//! `RawSlot` shape are accepted too.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use courtwatch_core::slot::{canonical_court, DateValue, DurationValue, RawSlot, TimeValue};

use crate::traits::SlotBatch;

/// Slot scraped by the local driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalDriverRecord {
    #[serde(default, alias = "course")]
    pub court: Option<String>,
    pub date: DateValue,
    /// Start time exactly as shown on the page, e.g. `"5:30pm"`.
    pub time_label: String,
    #[serde(default, alias = "duration_minutes")]
    pub duration: Option<DurationValue>,
}

impl From<LocalDriverRecord> for RawSlot {
    fn from(record: LocalDriverRecord) -> Self {
        RawSlot {
            court: record.court,
            date: Some(record.date),
            start: Some(TimeValue::Text(record.time_label)),
            duration: record.duration,
        }
    }
}

/// Slot returned by the remote browser service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteBrowserRecord {
    #[serde(default, alias = "course")]
    pub court: Option<String>,
    #[serde(alias = "datetime")]
    pub start: NaiveDateTime,
    #[serde(default, alias = "duration")]
    pub duration_minutes: Option<DurationValue>,
}

impl From<RemoteBrowserRecord> for RawSlot {
    fn from(record: RemoteBrowserRecord) -> Self {
        RawSlot {
            court: record.court,
            date: Some(DateValue::Date(record.start.date())),
            start: Some(TimeValue::Time(record.start.time())),
            duration: record.duration_minutes,
        }
    }
}

/// Any record shape a source may emit. Tried most specific first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceRecord {
    Remote(RemoteBrowserRecord),
    Local(LocalDriverRecord),
    Raw(RawSlot),
}

impl From<SourceRecord> for RawSlot {
    fn from(record: SourceRecord) -> Self {
        match record {
            SourceRecord::Remote(r) => r.into(),
            SourceRecord::Local(r) => r.into(),
            SourceRecord::Raw(r) => r,
        }
    }
}

/// Court named by an undecoded element, if it names one.
fn named_court(value: &Value) -> Option<&str> {
    ["court", "course"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Decode each element independently and keep those for one court.
///
/// Elements naming another court are dropped; elements with no court are
/// attributed to `court` (a driver scrapes one court page at a time). An
/// element matching no record shape is logged and counted, never fatal.
pub fn batch_for_court(values: Vec<Value>, court: &str) -> SlotBatch {
    let wanted = canonical_court(court);
    let mut batch = SlotBatch::default();

    for (index, value) in values.into_iter().enumerate() {
        if named_court(&value).is_some_and(|name| canonical_court(name) != wanted) {
            continue;
        }
        match serde_json::from_value::<SourceRecord>(value) {
            Ok(record) => {
                let mut raw = RawSlot::from(record);
                if raw.court.as_deref().map_or(true, |c| c.trim().is_empty()) {
                    raw.court = Some(court.to_string());
                }
                batch.raw.push(raw);
            }
            Err(e) => {
                warn!(court, index, error = %e, "skipping undecodable slot record");
                batch.malformed += 1;
            }
        }
    }

    batch
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use courtwatch_core::normalize;

    use super::*;

    fn decode(json: &str) -> Vec<SourceRecord> {
        serde_json::from_str(json).unwrap()
    }

    fn values(json: &str) -> Vec<Value> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn each_shape_is_recognised() {
        let records = decode(
            r#"[
                {"court": "Riverside", "start": "2026-10-17T18:00:00", "duration_minutes": 60},
                {"course": "Riverside", "date": "2026-10-17", "time_label": "5:30pm", "duration": "90 min"},
                {"court": "Riverside", "date": "10/17/2026", "time": "7:00 AM", "duration": 60}
            ]"#,
        );
        assert!(matches!(records[0], SourceRecord::Remote(_)));
        assert!(matches!(records[1], SourceRecord::Local(_)));
        assert!(matches!(records[2], SourceRecord::Raw(_)));
    }

    #[test]
    fn remote_and_local_normalize_to_same_slot() {
        let records = values(
            r#"[
                {"court": "Riverside", "start": "2026-10-17T17:30:00", "duration_minutes": 60},
                {"court": "riverside", "date": "2026-10-17", "time_label": "5:30pm", "duration": 60}
            ]"#,
        );
        let slots: Vec<_> = batch_for_court(records, "Riverside")
            .raw
            .iter()
            .map(|r| normalize(r).unwrap())
            .collect();
        assert_eq!(slots[0].date, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
        assert_eq!(slots[0].start, NaiveTime::from_hms_opt(17, 30, 0).unwrap());
        assert_eq!(slots[0].identity(), slots[1].identity());
    }

    #[test]
    fn other_courts_dropped_and_missing_court_filled() {
        let records = values(
            r#"[
                {"court": "Hillside", "start": "2026-10-17T18:00:00", "duration_minutes": 60},
                {"court": "Hillside", "duration": 60.5},
                {"date": "2026-10-17", "time_label": "6:00pm", "duration": 60}
            ]"#,
        );
        let batch = batch_for_court(records, "Riverside");
        assert_eq!(batch.raw.len(), 1);
        assert_eq!(batch.malformed, 0);
        assert_eq!(batch.raw[0].court.as_deref(), Some("Riverside"));
    }

    #[test]
    fn malformed_record_is_kept_for_the_matcher_to_reject() {
        // Missing duration: still a record, rejected later as invalid.
        let records = values(r#"[{"court": "Riverside", "start": "2026-10-17T18:00:00"}]"#);
        let batch = batch_for_court(records, "Riverside");
        assert_eq!(batch.raw.len(), 1);
        assert!(normalize(&batch.raw[0]).is_err());
    }

    #[test]
    fn wrongly_typed_elements_are_counted_not_fatal() {
        let records = values(
            r#"[
                {"court": "Riverside", "date": "2026-10-17", "start": "18:00", "duration": 60},
                {"court": "Riverside", "date": "2026-10-17", "start": "19:00", "duration": 60.5},
                {"court": "Riverside", "date": 20261017, "start": "19:00", "duration": 60},
                null
            ]"#,
        );
        let batch = batch_for_court(records, "Riverside");
        assert_eq!(batch.raw.len(), 1);
        assert_eq!(batch.malformed, 3);
        assert!(normalize(&batch.raw[0]).is_ok());
    }
}
