//! One watcher cycle: for each rule, fetch → match → dispatch.

use std::fmt;
use std::ops::AddAssign;

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use courtwatch_notify::{DispatchSummary, Dispatcher, Notifier};
use courtwatch_rules::{match_report, PreferenceRule};
use courtwatch_source::{ScrapeError, SlotSource};
use courtwatch_storage::{NotificationStore, StoreError};

/// Why a cycle stopped before visiting every rule.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("scrape failed for {court}: {source}")]
    Scrape {
        court: String,
        #[source]
        source: ScrapeError,
    },

    #[error("notification store failed while processing {court}: {source}")]
    Store {
        court: String,
        #[source]
        source: StoreError,
    },
}

/// Totals over every rule visited in a cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleSummary {
    pub sent: usize,
    pub skipped: usize,
    pub errors: usize,
    /// Raw records that failed normalization.
    pub invalid: usize,
}

impl AddAssign<DispatchSummary> for CycleSummary {
    fn add_assign(&mut self, rhs: DispatchSummary) {
        self.sent += rhs.sent;
        self.skipped += rhs.skipped;
        self.errors += rhs.errors;
    }
}

impl fmt::Display for CycleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sent={} skipped={} errors={} invalid={}",
            self.sent, self.skipped, self.errors, self.invalid
        )
    }
}

/// Run one cycle at wall-clock `now`.
///
/// Rules are visited in the order given (the loader sorts them by court).
/// A scrape or store failure aborts the rest of the cycle; anything
/// already sent stays recorded, so the next cycle resumes cleanly.
pub async fn run_cycle(
    rules: &[PreferenceRule],
    source: &dyn SlotSource,
    store: &dyn NotificationStore,
    dispatcher: &Dispatcher,
    sender: &dyn Notifier,
    now: NaiveDateTime,
) -> Result<CycleSummary, CycleError> {
    let mut summary = CycleSummary::default();

    for rule in rules {
        let batch = source.fetch(rule).await.map_err(|source| CycleError::Scrape {
            court: rule.court.clone(),
            source,
        })?;

        let report = match_report(&batch.raw, rule, now);
        let invalid = report.invalid + batch.malformed;
        summary.invalid += invalid;

        let dispatched = dispatcher
            .dispatch(&report.candidates, store, sender)
            .await
            .map_err(|source| CycleError::Store {
                court: rule.court.clone(),
                source,
            })?;

        info!(
            court = %rule.court,
            fetched = batch.raw.len(),
            candidates = report.candidates.len(),
            invalid,
            sent = dispatched.sent,
            skipped = dispatched.skipped,
            errors = dispatched.errors,
            "rule processed"
        );
        summary += dispatched;
    }

    Ok(summary)
}
