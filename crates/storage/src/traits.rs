//! `NotificationStore` trait definition.

use chrono::{DateTime, Duration, Utc};

use courtwatch_core::{Slot, SlotIdentity};

use crate::error::StoreError;
use crate::record::{NotificationRecord, RecordFilter, StoreStats};

/// Durable, shared record of which slot identities have been notified.
///
/// Implementations must make [`insert_if_absent`](Self::insert_if_absent)
/// atomic across processes: it is the only synchronization between
/// concurrent watcher instances.
#[async_trait::async_trait]
pub trait NotificationStore: Send + Sync {
    /// Whether a record for `identity` has ever been created (viewed or not).
    async fn exists(&self, identity: &SlotIdentity) -> Result<bool, StoreError>;

    /// Atomically insert `record` unless one with the same identity exists.
    ///
    /// Returns `true` if this call created it, `false` if it already existed.
    async fn insert_if_absent(&self, record: NotificationRecord) -> Result<bool, StoreError>;

    /// Create a record for `slot` notified now. Idempotent: `false` on repeat.
    async fn create(&self, identity: &SlotIdentity, slot: &Slot) -> Result<bool, StoreError> {
        self.insert_if_absent(NotificationRecord::new(identity.clone(), slot, Utc::now()))
            .await
    }

    /// Set `viewed = true`. Returns `false` (and creates nothing) if absent.
    async fn mark_viewed(&self, identity: &SlotIdentity) -> Result<bool, StoreError>;

    /// Mark every unviewed record viewed, returning how many changed.
    async fn mark_all_viewed(&self) -> Result<usize, StoreError> {
        let mut changed = 0;
        for record in self.list(&RecordFilter::unviewed()).await? {
            if self.mark_viewed(&record.identity).await? {
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Records matching `filter`, ordered by `notified_at` ascending.
    async fn list(&self, filter: &RecordFilter) -> Result<Vec<NotificationRecord>, StoreError>;

    /// Delete every record notified strictly before `cutoff`.
    ///
    /// Deletes key by key; safe to run alongside `create`/`exists`.
    async fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError>;

    /// Delete records older than `max_age_days`. Returns the number deleted.
    async fn purge_older_than(&self, max_age_days: u32) -> Result<usize, StoreError> {
        self.purge_before(Utc::now() - Duration::days(i64::from(max_age_days)))
            .await
    }

    async fn stats(&self) -> Result<StoreStats, StoreError> {
        let records = self.list(&RecordFilter::all()).await?;
        Ok(StoreStats::from_records(self.backend_name(), &records))
    }

    /// Check the backing medium is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Short backend label (e.g. "memory", "redis").
    fn backend_name(&self) -> &str;
}
