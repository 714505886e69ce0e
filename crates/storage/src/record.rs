//! Notification record, list filter, and store statistics.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use courtwatch_core::{Slot, SlotIdentity};

/// Durable evidence that a slot identity was already surfaced to the user.
///
/// Slot fields are immutable after creation; only `viewed` ever changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub identity: SlotIdentity,
    pub court: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Minutes.
    pub duration: u32,
    /// RFC 3339 / ISO-8601 on the wire.
    pub notified_at: DateTime<Utc>,
    #[serde(default)]
    pub viewed: bool,
}

impl NotificationRecord {
    pub fn new(identity: SlotIdentity, slot: &Slot, notified_at: DateTime<Utc>) -> Self {
        Self {
            identity,
            court: slot.court.clone(),
            date: slot.date,
            time: slot.start,
            duration: slot.duration_minutes,
            notified_at,
            viewed: false,
        }
    }
}

/// Optional constraints for [`NotificationStore::list`](crate::NotificationStore::list).
/// An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub viewed: Option<bool>,
    /// Only records notified strictly before this instant.
    pub notified_before: Option<DateTime<Utc>>,
    /// Only records notified at or after this instant.
    pub notified_since: Option<DateTime<Utc>>,
}

impl RecordFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn unviewed() -> Self {
        Self {
            viewed: Some(false),
            ..Self::default()
        }
    }

    pub fn viewed() -> Self {
        Self {
            viewed: Some(true),
            ..Self::default()
        }
    }

    /// Records whose age at `now` exceeds `days`.
    pub fn older_than_days(mut self, days: u32, now: DateTime<Utc>) -> Self {
        self.notified_before = Some(now - Duration::days(i64::from(days)));
        self
    }

    pub fn matches(&self, record: &NotificationRecord) -> bool {
        if let Some(viewed) = self.viewed {
            if record.viewed != viewed {
                return false;
            }
        }
        if let Some(before) = self.notified_before {
            if record.notified_at >= before {
                return false;
            }
        }
        if let Some(since) = self.notified_since {
            if record.notified_at < since {
                return false;
            }
        }
        true
    }
}

/// Store-wide counts for the status report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub backend: String,
    pub total: usize,
    pub viewed: usize,
    pub unviewed: usize,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
}

impl StoreStats {
    /// Summarize records (assumed sorted by `notified_at` ascending).
    pub fn from_records(backend: &str, records: &[NotificationRecord]) -> Self {
        let viewed = records.iter().filter(|r| r.viewed).count();
        Self {
            backend: backend.to_string(),
            total: records.len(),
            viewed,
            unviewed: records.len() - viewed,
            oldest: records.iter().map(|r| r.notified_at).min(),
            newest: records.iter().map(|r| r.notified_at).max(),
        }
    }
}
