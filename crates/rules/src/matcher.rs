//! Slot matcher: filters raw scraped slots against a [`PreferenceRule`].
//!
//! Four conjunctive predicates, evaluated per slot:
//! 1. date within `[today, today + days_in_advance]`
//! 2. start time at or after the weekday/weekend minimum booking time
//! 3. duration at least `min_duration`
//! 4. the slot's day is already open for booking: the farthest day
//!    (`today + days_in_advance`) only opens at `opening_time`
//!
//! Output preserves input order. Records that fail normalization are
//! logged and counted, never matched.

use chrono::{Datelike, Duration, NaiveDateTime};
use tracing::{debug, warn};

use courtwatch_core::{normalize, RawSlot, Slot};

use crate::schema::PreferenceRule;

/// Why a normalized slot did not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    OutsideWindow,
    BeforeMinBookingTime,
    TooShort,
    NotYetOpen,
}

/// Candidates plus counts of what was dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchReport {
    pub candidates: Vec<Slot>,
    /// Raw records that failed normalization.
    pub invalid: usize,
    /// Normalized slots that failed a predicate.
    pub rejected: usize,
}

/// Evaluate a normalized slot against a rule as of `now` (local wall-clock).
pub fn evaluate(slot: &Slot, rule: &PreferenceRule, now: NaiveDateTime) -> Result<(), Rejection> {
    let today = now.date();
    let last_day = today + Duration::days(i64::from(rule.days_in_advance));

    if slot.date < today || slot.date > last_day {
        return Err(Rejection::OutsideWindow);
    }
    if slot.start < rule.min_booking_time.for_weekday(slot.date.weekday()) {
        return Err(Rejection::BeforeMinBookingTime);
    }
    if slot.duration_minutes < rule.min_duration {
        return Err(Rejection::TooShort);
    }
    if slot.date == last_day && now.time() < rule.opening_time {
        return Err(Rejection::NotYetOpen);
    }
    Ok(())
}

/// Normalize and filter `raw`, returning the candidates with drop counts.
pub fn match_report(raw: &[RawSlot], rule: &PreferenceRule, now: NaiveDateTime) -> MatchReport {
    let mut report = MatchReport::default();

    for record in raw {
        let slot = match normalize(record) {
            Ok(slot) => slot,
            Err(e) => {
                warn!(court = %rule.court, error = %e, "skipping invalid slot record");
                report.invalid += 1;
                continue;
            }
        };

        match evaluate(&slot, rule, now) {
            Ok(()) => report.candidates.push(slot),
            Err(reason) => {
                debug!(
                    court = %slot.court,
                    date = %slot.date,
                    start = %slot.start.format("%H:%M"),
                    ?reason,
                    "slot rejected"
                );
                report.rejected += 1;
            }
        }
    }

    report
}

/// Candidate slots from `raw` that satisfy `rule`, in input order.
pub fn match_slots(raw: &[RawSlot], rule: &PreferenceRule, now: NaiveDateTime) -> Vec<Slot> {
    match_report(raw, rule, now).candidates
}
