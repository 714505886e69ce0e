//! Slot identity normalizer.
//!
//! Turns a [`RawSlot`] into a [`Slot`] and its canonical [`SlotIdentity`].
//! Both functions are pure: the result depends only on the record's
//! content, never on when or where it was observed.

use crate::error::InvalidSlotError;
use crate::parse::{parse_date, parse_duration, parse_time};
use crate::slot::{RawSlot, Slot, SlotIdentity};

/// Normalize a raw record into a [`Slot`].
///
/// # Errors
///
/// Returns [`InvalidSlotError`] if a required field is missing or cannot
/// be parsed.
pub fn normalize(raw: &RawSlot) -> Result<Slot, InvalidSlotError> {
    let court = raw
        .court
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or(InvalidSlotError::MissingField("court"))?;
    let date = raw
        .date
        .as_ref()
        .ok_or(InvalidSlotError::MissingField("date"))?;
    let start = raw
        .start
        .as_ref()
        .ok_or(InvalidSlotError::MissingField("start"))?;
    let duration = raw
        .duration
        .as_ref()
        .ok_or(InvalidSlotError::MissingField("duration"))?;

    Ok(Slot {
        court: court.to_string(),
        date: parse_date(date)?,
        start: parse_time(start)?,
        duration_minutes: parse_duration(duration)?,
    })
}

/// Canonical identity of a raw record.
pub fn identity(raw: &RawSlot) -> Result<SlotIdentity, InvalidSlotError> {
    normalize(raw).map(|slot| slot.identity())
}
