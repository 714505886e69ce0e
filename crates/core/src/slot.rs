//! Slot data model: the raw scraped shape and the normalized form.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

// ── Raw input ─────────────────────────────────────────────────

/// A calendar date as emitted by a scraper.
///
/// Structured forms deserialize first; anything else lands in `Text`
/// and is parsed by [`crate::parse::parse_date`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    Date(NaiveDate),
    Parts { year: i32, month: u32, day: u32 },
    Text(String),
}

/// A start time as emitted by a scraper ("14:00", "2:00 PM", `{hour, minute}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    Time(NaiveTime),
    Parts {
        hour: u32,
        #[serde(default)]
        minute: u32,
    },
    Text(String),
}

/// A duration: plain minutes or a unit string ("90 min", "1h30m").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Minutes(u32),
    Text(String),
}

/// A slot record exactly as a scrape backend adapter produced it.
///
/// Every field is optional here; presence is checked during
/// normalization, where a missing field becomes
/// [`InvalidSlotError::MissingField`](crate::InvalidSlotError::MissingField).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSlot {
    #[serde(alias = "court_name", alias = "course")]
    pub court: Option<String>,
    pub date: Option<DateValue>,
    #[serde(alias = "time", alias = "start_time")]
    pub start: Option<TimeValue>,
    #[serde(alias = "duration_minutes")]
    pub duration: Option<DurationValue>,
}

impl RawSlot {
    /// Convenience constructor for the common all-text case.
    pub fn text(court: &str, date: &str, start: &str, duration_minutes: u32) -> Self {
        Self {
            court: Some(court.to_string()),
            date: Some(DateValue::Text(date.to_string())),
            start: Some(TimeValue::Text(start.to_string())),
            duration: Some(DurationValue::Minutes(duration_minutes)),
        }
    }
}

// ── Normalized form ───────────────────────────────────────────

/// A normalized, bookable court slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    /// Court name for display (trimmed, original casing).
    pub court: String,
    pub date: NaiveDate,
    /// Start time at minute precision.
    pub start: NaiveTime,
    pub duration_minutes: u32,
}

impl Slot {
    pub fn is_weekend(&self) -> bool {
        matches!(self.date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Canonical identity key of this slot. Pure function of the four fields.
    pub fn identity(&self) -> SlotIdentity {
        SlotIdentity(format!(
            "{}:{}T{}:{}",
            canonical_court(&self.court),
            self.date.format("%Y-%m-%d"),
            self.start.format("%H:%M"),
            self.duration_minutes
        ))
    }
}

/// Lowercased court name with whitespace runs and `:` collapsed to `-`.
pub fn canonical_court(court: &str) -> String {
    court
        .split(|c: char| c.is_whitespace() || c == ':')
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Canonical, stable key identifying a slot's content.
///
/// Format: `{court}:{YYYY-MM-DD}T{HH:MM}:{duration}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotIdentity(String);

impl SlotIdentity {
    /// Wrap an already-canonical key (e.g. read back from a store or CLI).
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SlotIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_slot_deserializes_mixed_encodings() {
        let json = r#"[
            {"court": "Court A", "date": "2026-10-16", "start": "18:00", "duration": 60},
            {"court_name": "Court A", "date": {"year": 2026, "month": 10, "day": 16},
             "time": {"hour": 18, "minute": 0}, "duration_minutes": "1h"},
            {"course": "Court A", "date": "10/16/2026", "start_time": "6:00 PM", "duration": "60 min"}
        ]"#;
        let raws: Vec<RawSlot> = serde_json::from_str(json).unwrap();
        assert_eq!(raws.len(), 3);
        assert_eq!(
            raws[0].date,
            Some(DateValue::Date(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()))
        );
        assert_eq!(
            raws[1].date,
            Some(DateValue::Parts { year: 2026, month: 10, day: 16 })
        );
        assert_eq!(raws[2].date, Some(DateValue::Text("10/16/2026".into())));
        assert_eq!(raws[1].start, Some(TimeValue::Parts { hour: 18, minute: 0 }));
        assert_eq!(raws[2].duration, Some(DurationValue::Text("60 min".into())));
    }

    #[test]
    fn missing_fields_deserialize_as_none() {
        let raw: RawSlot = serde_json::from_str(r#"{"court": "Court B"}"#).unwrap();
        assert!(raw.date.is_none());
        assert!(raw.start.is_none());
        assert!(raw.duration.is_none());
    }

    #[test]
    fn identity_format() {
        let slot = Slot {
            court: "  Centre  Court ".trim().to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            start: NaiveTime::from_hms_opt(9, 5, 0).unwrap(),
            duration_minutes: 90,
        };
        assert_eq!(slot.identity().as_str(), "centre-court:2026-10-17T09:05:90");
    }

    #[test]
    fn weekend_detection() {
        let mut slot = Slot {
            court: "A".into(),
            date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(), // Saturday
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            duration_minutes: 60,
        };
        assert!(slot.is_weekend());
        slot.date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(); // Monday
        assert!(!slot.is_weekend());
    }
}
