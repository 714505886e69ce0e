//! In-process notification store.
//!
//! Atomic within one process only. Used when no `REDIS_URL` is configured
//! and throughout the test suites.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use courtwatch_core::SlotIdentity;

use crate::error::StoreError;
use crate::record::{NotificationRecord, RecordFilter};
use crate::traits::NotificationStore;

#[derive(Debug)]
pub struct MemoryStore {
    records: RwLock<HashMap<SlotIdentity, NotificationRecord>>,
    available: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the backing medium going away (or coming back).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store marked unavailable".into()))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl NotificationStore for MemoryStore {
    async fn exists(&self, identity: &SlotIdentity) -> Result<bool, StoreError> {
        self.check()?;
        Ok(self.records.read().await.contains_key(identity))
    }

    async fn insert_if_absent(&self, record: NotificationRecord) -> Result<bool, StoreError> {
        self.check()?;
        let mut records = self.records.write().await;
        if records.contains_key(&record.identity) {
            return Ok(false);
        }
        records.insert(record.identity.clone(), record);
        Ok(true)
    }

    async fn mark_viewed(&self, identity: &SlotIdentity) -> Result<bool, StoreError> {
        self.check()?;
        match self.records.write().await.get_mut(identity) {
            Some(record) => {
                record.viewed = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self, filter: &RecordFilter) -> Result<Vec<NotificationRecord>, StoreError> {
        self.check()?;
        let mut out: Vec<_> = self
            .records
            .read()
            .await
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            a.notified_at
                .cmp(&b.notified_at)
                .then_with(|| a.identity.cmp(&b.identity))
        });
        Ok(out)
    }

    async fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError> {
        self.check()?;
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| r.notified_at >= cutoff);
        Ok(before - records.len())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
