//! Text parsers for the date, time, and duration encodings scrapers emit.

use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::error::InvalidSlotError;
use crate::slot::{DateValue, DurationValue, TimeValue};

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%A, %d %B %Y",
    "%a, %d %b %Y",
    "%d %B %Y",
];

/// Tried against the input after trimming, uppercasing and removing spaces.
const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S", "%I:%M%p", "%I:%M:%S%p"];

pub fn parse_date(value: &DateValue) -> Result<NaiveDate, InvalidSlotError> {
    match value {
        DateValue::Date(d) => Ok(*d),
        DateValue::Parts { year, month, day } => NaiveDate::from_ymd_opt(*year, *month, *day)
            .ok_or_else(|| {
                InvalidSlotError::unparseable("date", format!("{year:04}-{month:02}-{day:02}"))
            }),
        DateValue::Text(text) => parse_date_text(text),
    }
}

pub fn parse_date_text(text: &str) -> Result<NaiveDate, InvalidSlotError> {
    let trimmed = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| InvalidSlotError::unparseable("date", text))
}

/// Parse a start time, truncated to minute precision.
pub fn parse_time(value: &TimeValue) -> Result<NaiveTime, InvalidSlotError> {
    let time = match value {
        TimeValue::Time(t) => *t,
        TimeValue::Parts { hour, minute } => NaiveTime::from_hms_opt(*hour, *minute, 0)
            .ok_or_else(|| InvalidSlotError::unparseable("start", format!("{hour}:{minute:02}")))?,
        TimeValue::Text(text) => parse_time_text(text)?,
    };
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0)
        .ok_or_else(|| InvalidSlotError::unparseable("start", time.to_string()))
}

pub fn parse_time_text(text: &str) -> Result<NaiveTime, InvalidSlotError> {
    let compact: String = text
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect::<String>()
        .to_ascii_uppercase();
    // "2PM" has no minutes, which chrono refuses.
    let has_meridiem = compact.ends_with("AM") || compact.ends_with("PM");
    let compact = if has_meridiem && !compact.contains(':') {
        let (hour, meridiem) = compact.split_at(compact.len() - 2);
        format!("{hour}:00{meridiem}")
    } else {
        compact
    };
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(&compact, fmt).ok())
        .ok_or_else(|| InvalidSlotError::unparseable("start", text))
}

pub fn parse_duration(value: &DurationValue) -> Result<u32, InvalidSlotError> {
    let minutes = match value {
        DurationValue::Minutes(m) => Some(*m),
        DurationValue::Text(text) => parse_duration_minutes(text),
    };
    match minutes {
        Some(m) if m > 0 => Ok(m),
        _ => Err(InvalidSlotError::unparseable(
            "duration",
            match value {
                DurationValue::Minutes(m) => m.to_string(),
                DurationValue::Text(t) => t.clone(),
            },
        )),
    }
}

/// Parse a duration string into minutes.
///
/// Accepts bare numbers (minutes), `"90 min"`, `"90 minutes"`, and unit
/// combinations of `h` and `m` such as `"1h30m"` or `"2h"`.
/// Returns `None` if the string is empty or unparseable.
pub fn parse_duration_minutes(s: &str) -> Option<u32> {
    let compact: String = s
        .trim()
        .to_ascii_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if compact.is_empty() {
        return None;
    }

    let compact = ["minutes", "minute", "mins", "min"]
        .iter()
        .find_map(|suffix| compact.strip_suffix(suffix))
        .map(|stripped| format!("{stripped}m"))
        .unwrap_or(compact);
    let compact = ["hours", "hour", "hrs", "hr"]
        .iter()
        .find_map(|suffix| compact.strip_suffix(suffix))
        .map(|stripped| format!("{stripped}h"))
        .unwrap_or(compact);

    let mut total: u32 = 0;
    let mut num_buf = String::new();
    let mut found_unit = false;

    for ch in compact.chars() {
        if ch.is_ascii_digit() {
            num_buf.push(ch);
        } else {
            let n: u32 = num_buf.parse().ok()?;
            num_buf.clear();
            match ch {
                'h' => total = total.checked_add(n.checked_mul(60)?)?,
                'm' => total = total.checked_add(n)?,
                _ => return None,
            }
            found_unit = true;
        }
    }

    if !num_buf.is_empty() {
        if found_unit {
            // "1h30" is ambiguous.
            return None;
        }
        total = num_buf.parse().ok()?;
    }

    Some(total)
}
