//! Redis-backed notification store, shared by every watcher instance.
//!
//! One string key per identity, `{prefix}:{identity}`, holding the JSON
//! record. Creation uses `SET NX` (with `EX` when a retention TTL is
//! configured), which gives single-writer-wins per identity across
//! processes. Every command runs under a timeout; connection errors and
//! timeouts surface as [`StoreError::Unavailable`]. A dropped connection
//! fails the command in flight and is re-established for the next one.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisResult, Script};
use tracing::{debug, info, warn};

use courtwatch_core::SlotIdentity;

use crate::error::StoreError;
use crate::record::{NotificationRecord, RecordFilter};
use crate::traits::NotificationStore;

const SCAN_BATCH: usize = 200;

/// Deletes the key only if it still holds the value we judged stale, so a
/// record re-created in between is never removed.
const DELETE_IF_UNCHANGED: &str = r#"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    return redis.call('DEL', KEYS[1])
end
return 0
"#;

pub struct RedisStore {
    conn: ConnectionManager,
    prefix: String,
    ttl_secs: Option<u64>,
    timeout: Duration,
}

impl RedisStore {
    /// Connect and verify with `PING`.
    ///
    /// `retention_days` sets a TTL on newly created records; `None` keeps
    /// them until purged.
    pub async fn connect(
        url: &str,
        prefix: &str,
        retention_days: Option<u32>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let conn = tokio::time::timeout(timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| {
                StoreError::Unavailable(format!("connect timed out after {}ms", timeout.as_millis()))
            })??;

        let store = Self {
            conn,
            prefix: prefix.trim_end_matches(':').to_string(),
            ttl_secs: retention_days.map(|d| u64::from(d) * 24 * 60 * 60),
            timeout,
        };
        store.ping().await?;
        info!(prefix = %store.prefix, ttl_secs = ?store.ttl_secs, "connected to redis notification store");
        Ok(store)
    }

    async fn timed<T, F>(&self, op: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Unavailable(format!(
                "{op} timed out after {}ms",
                self.timeout.as_millis()
            ))),
        }
    }

    /// All keys under the prefix, via cursor `SCAN` (never `KEYS`).
    async fn scan_keys(&self) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn.clone();
        let pattern = format!("{}:*", self.prefix);
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();
        loop {
            let mut cmd = redis::cmd("SCAN");
            cmd.arg(cursor).arg("MATCH").arg(&pattern).arg("COUNT").arg(SCAN_BATCH);
            let (next, batch): (u64, Vec<String>) =
                self.timed("SCAN", cmd.query_async(&mut conn)).await?;
            keys.extend(
                batch
                    .into_iter()
                    .filter(|key| identity_from_key(&self.prefix, key).is_some()),
            );
            if next == 0 {
                break;
            }
            cursor = next;
        }
        Ok(keys)
    }

    /// `(key, raw JSON)` for every record; keys that vanished mid-scan are dropped.
    async fn load_raw(&self) -> Result<Vec<(String, String)>, StoreError> {
        let keys = self.scan_keys().await?;
        let mut conn = self.conn.clone();
        let mut out = Vec::with_capacity(keys.len());
        for chunk in keys.chunks(SCAN_BATCH) {
            let mut cmd = redis::cmd("MGET");
            cmd.arg(chunk.to_vec());
            let values: Vec<Option<String>> = self.timed("MGET", cmd.query_async(&mut conn)).await?;
            out.extend(
                chunk
                    .iter()
                    .zip(values)
                    .filter_map(|(key, value)| value.map(|v| (key.clone(), v))),
            );
        }
        Ok(out)
    }
}

/// Store key for an identity.
pub fn record_key(prefix: &str, identity: &SlotIdentity) -> String {
    format!("{}:{}", prefix, identity)
}

/// Inverse of [`record_key`].
pub fn identity_from_key(prefix: &str, key: &str) -> Option<SlotIdentity> {
    key.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix(':'))
        .filter(|rest| !rest.is_empty())
        .map(SlotIdentity::from_raw)
}

pub fn decode_record(key: &str, raw: &str) -> Result<NotificationRecord, StoreError> {
    serde_json::from_str(raw).map_err(|e| StoreError::Corrupt {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait::async_trait]
impl NotificationStore for RedisStore {
    async fn exists(&self, identity: &SlotIdentity) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let key = record_key(&self.prefix, identity);
        self.timed("EXISTS", conn.exists(&key)).await
    }

    async fn insert_if_absent(&self, record: NotificationRecord) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let key = record_key(&self.prefix, &record.identity);
        let value = serde_json::to_string(&record)?;

        let mut cmd = redis::cmd("SET");
        cmd.arg(&key).arg(value).arg("NX");
        if let Some(ttl) = self.ttl_secs {
            cmd.arg("EX").arg(ttl);
        }
        let reply: Option<String> = self.timed("SET NX", cmd.query_async(&mut conn)).await?;
        let created = reply.is_some();
        debug!(key = %key, created, "insert if absent");
        Ok(created)
    }

    async fn mark_viewed(&self, identity: &SlotIdentity) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let key = record_key(&self.prefix, identity);

        let raw: Option<String> = self.timed("GET", conn.get(&key)).await?;
        let Some(raw) = raw else {
            return Ok(false);
        };
        let mut record = decode_record(&key, &raw)?;
        if record.viewed {
            return Ok(true);
        }
        record.viewed = true;

        // XX: never resurrect a key purged meanwhile. KEEPTTL: retention unchanged.
        let mut cmd = redis::cmd("SET");
        cmd.arg(&key)
            .arg(serde_json::to_string(&record)?)
            .arg("XX")
            .arg("KEEPTTL");
        let reply: Option<String> = self.timed("SET XX", cmd.query_async(&mut conn)).await?;
        Ok(reply.is_some())
    }

    async fn list(&self, filter: &RecordFilter) -> Result<Vec<NotificationRecord>, StoreError> {
        let mut records = Vec::new();
        for (key, raw) in self.load_raw().await? {
            match decode_record(&key, &raw) {
                Ok(record) if filter.matches(&record) => records.push(record),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "skipping undecodable record"),
            }
        }
        records.sort_by(|a, b| {
            a.notified_at
                .cmp(&b.notified_at)
                .then_with(|| a.identity.cmp(&b.identity))
        });
        Ok(records)
    }

    async fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError> {
        let script = Script::new(DELETE_IF_UNCHANGED);
        let mut conn = self.conn.clone();
        let mut deleted = 0usize;

        for (key, raw) in self.load_raw().await? {
            let record = match decode_record(&key, &raw) {
                Ok(record) => record,
                Err(e) => {
                    warn!(error = %e, "skipping undecodable record during purge");
                    continue;
                }
            };
            if record.notified_at >= cutoff {
                continue;
            }
            let n: i64 = self
                .timed("purge DEL", script.key(&key).arg(&raw).invoke_async(&mut conn))
                .await?;
            if n > 0 {
                deleted += 1;
            }
        }

        if deleted > 0 {
            info!(deleted, cutoff = %cutoff.to_rfc3339(), "purged old notification records");
        }
        Ok(deleted)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let reply: String = self.timed("PING", redis::cmd("PING").query_async(&mut conn)).await?;
        debug!(reply = %reply, "redis ping");
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "redis"
    }
}
