//! At-most-once delivery of matched slots.
//!
//! For each candidate the dispatcher checks the store, claims the identity
//! with create-if-absent, and only the caller that created the record
//! sends. A failed send is counted and never retried: the record stays,
//! so the slot will not be announced again.

use std::ops::AddAssign;

use courtwatch_core::Slot;
use courtwatch_storage::{NotificationStore, StoreError};

use crate::templating::MessageFormatter;
use crate::traits::Notifier;

/// Outcome counts for one dispatch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DispatchSummary {
    pub sent: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl AddAssign for DispatchSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.sent += rhs.sent;
        self.skipped += rhs.skipped;
        self.errors += rhs.errors;
    }
}

#[derive(Debug, Default)]
pub struct Dispatcher {
    formatter: MessageFormatter,
}

impl Dispatcher {
    pub fn new(formatter: MessageFormatter) -> Self {
        Self { formatter }
    }

    /// Deliver each not-yet-notified candidate once.
    ///
    /// # Errors
    ///
    /// Any [`StoreError`] aborts the run immediately; candidates after the
    /// failing one are left for the next cycle.
    pub async fn dispatch(
        &self,
        candidates: &[Slot],
        store: &dyn NotificationStore,
        sender: &dyn Notifier,
    ) -> Result<DispatchSummary, StoreError> {
        let mut summary = DispatchSummary::default();

        for slot in candidates {
            let identity = slot.identity();

            if store.exists(&identity).await? {
                tracing::debug!(identity = %identity, "already notified, skipping");
                summary.skipped += 1;
                continue;
            }

            let notification = match self.formatter.format(slot) {
                Ok(n) => n,
                Err(e) => {
                    tracing::warn!(identity = %identity, error = %e, "could not render notification");
                    summary.errors += 1;
                    continue;
                }
            };

            if !store.create(&identity, slot).await? {
                tracing::debug!(identity = %identity, "claimed by another watcher, skipping");
                summary.skipped += 1;
                continue;
            }

            let start = std::time::Instant::now();
            match sender.send(&notification).await {
                Ok(()) => {
                    tracing::info!(
                        identity = %identity,
                        channel = sender.channel_name(),
                        duration_ms = start.elapsed().as_millis() as u64,
                        "slot notification sent"
                    );
                    summary.sent += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        identity = %identity,
                        channel = sender.channel_name(),
                        error = %e,
                        "slot notification failed, not retrying"
                    );
                    summary.errors += 1;
                }
            }
        }

        Ok(summary)
    }
}
