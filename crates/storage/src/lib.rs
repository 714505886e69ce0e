//! Durable notification state.
//!
//! This crate provides:
//! - `NotificationStore` trait: exists / create-if-absent / mark-viewed /
//!   list / purge over notification records
//! - `MemoryStore` for single-process runs and tests
//! - `RedisStore` shared across concurrent watcher instances
//! - `StoreHandle`: opens the configured store on first use, retrying later
//!   if the backend is down

pub mod error;
pub mod memory;
pub mod record;
pub mod redis_backend;
pub mod traits;

use std::sync::Arc;
use std::time::Duration;

use courtwatch_core::config::StoreConfig;
use tracing::{info, warn};

pub use error::StoreError;
pub use memory::MemoryStore;
pub use record::{NotificationRecord, RecordFilter, StoreStats};
pub use redis_backend::RedisStore;
pub use traits::NotificationStore;

/// Open the store selected by config: Redis when `REDIS_URL` is set,
/// otherwise an in-memory store (single process, lost on restart).
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn NotificationStore>, StoreError> {
    match config.redis_url.as_deref() {
        Some(url) => {
            let store = RedisStore::connect(
                url,
                &config.key_prefix,
                Some(config.retention_days),
                Duration::from_secs(config.timeout_secs),
            )
            .await?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("REDIS_URL not set: using in-memory notification store (not shared, not durable)");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Lazily opened store for long-running loops.
///
/// A failed open is not cached: the next [`StoreHandle::get`] tries again,
/// so a backend that is down at startup only costs the cycles it was down for.
pub struct StoreHandle {
    config: StoreConfig,
    store: Option<Arc<dyn NotificationStore>>,
}

impl StoreHandle {
    pub fn new(config: StoreConfig) -> Self {
        Self { config, store: None }
    }

    pub async fn get(&mut self) -> Result<Arc<dyn NotificationStore>, StoreError> {
        if let Some(store) = &self.store {
            return Ok(Arc::clone(store));
        }
        let store = open_store(&self.config).await?;
        info!(backend = store.backend_name(), "notification store opened");
        self.store = Some(Arc::clone(&store));
        Ok(store)
    }

    pub fn is_open(&self) -> bool {
        self.store.is_some()
    }
}
