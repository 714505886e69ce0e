//! Preference rule schema.
//!
//! A rules file is a YAML map from court name to [`PreferenceRule`]:
//!
//! ```yaml
//! riverside:
//!   url: https://example.com/booking/riverside
//!   days_in_advance: 7
//!   opening_time: "07:00"
//!   min_booking_time:
//!     weekday: "17:00"
//!     weekend: "09:00"
//!   min_duration: 60
//! ```

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Per-court filter applied to scraped slots. Read-only to the matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRule {
    /// Court name. Filled from the map key when loaded from a rules file.
    #[serde(default)]
    pub court: String,
    /// Booking page for this court, handed to the slot source.
    #[serde(default)]
    pub url: Option<String>,
    /// Slots may be at most this many days after today.
    #[serde(default = "default_days_in_advance")]
    pub days_in_advance: u32,
    /// Time of day at which the farthest bookable day opens.
    #[serde(default = "midnight", with = "hhmm")]
    pub opening_time: NaiveTime,
    #[serde(default)]
    pub min_booking_time: BookingTimes,
    /// Minimum slot length in minutes.
    #[serde(default = "default_min_duration")]
    pub min_duration: u32,
}

/// Earliest acceptable start time, by day-of-week class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingTimes {
    #[serde(default = "midnight", with = "hhmm")]
    pub weekday: NaiveTime,
    #[serde(default = "midnight", with = "hhmm")]
    pub weekend: NaiveTime,
}

impl Default for BookingTimes {
    fn default() -> Self {
        Self {
            weekday: midnight(),
            weekend: midnight(),
        }
    }
}

impl BookingTimes {
    pub fn for_weekday(&self, day: Weekday) -> NaiveTime {
        match day {
            Weekday::Sat | Weekday::Sun => self.weekend,
            _ => self.weekday,
        }
    }
}

impl PreferenceRule {
    /// A rule with defaults for everything but the court name.
    pub fn new(court: impl Into<String>) -> Self {
        Self {
            court: court.into(),
            url: None,
            days_in_advance: default_days_in_advance(),
            opening_time: midnight(),
            min_booking_time: BookingTimes::default(),
            min_duration: default_min_duration(),
        }
    }
}

fn default_days_in_advance() -> u32 {
    7
}

fn default_min_duration() -> u32 {
    60
}

fn midnight() -> NaiveTime {
    NaiveTime::MIN
}

/// `"HH:MM"` (de)serialization for [`NaiveTime`].
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|_| {
            serde::de::Error::custom(format!("invalid time {raw:?}, expected HH:MM"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let rule: PreferenceRule = serde_yaml::from_str("url: https://example.com\n").unwrap();
        assert_eq!(rule.days_in_advance, 7);
        assert_eq!(rule.min_duration, 60);
        assert_eq!(rule.opening_time, NaiveTime::MIN);
        assert_eq!(rule.min_booking_time, BookingTimes::default());
        assert_eq!(rule.url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn parses_booking_times() {
        let yaml = r#"
days_in_advance: 3
opening_time: "7:00"
min_booking_time:
  weekday: "17:00"
  weekend: "09:30"
min_duration: 90
"#;
        let rule: PreferenceRule = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rule.opening_time, NaiveTime::from_hms_opt(7, 0, 0).unwrap());
        assert_eq!(
            rule.min_booking_time.for_weekday(Weekday::Tue),
            NaiveTime::from_hms_opt(17, 0, 0).unwrap()
        );
        assert_eq!(
            rule.min_booking_time.for_weekday(Weekday::Sun),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
    }

    #[test]
    fn rejects_malformed_time() {
        let err = serde_yaml::from_str::<PreferenceRule>("opening_time: \"7am\"\n").unwrap_err();
        assert!(err.to_string().contains("expected HH:MM"));
    }

    #[test]
    fn serialized_rule_reloads() {
        let mut rule = PreferenceRule::new("Court A");
        rule.opening_time = NaiveTime::from_hms_opt(7, 5, 0).unwrap();
        let yaml = serde_yaml::to_string(&rule).unwrap();
        assert!(yaml.contains("07:05"), "{yaml}");
        let back: PreferenceRule = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, rule);
    }
}
