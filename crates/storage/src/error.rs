use thiserror::Error;

/// Notification store failures. Every variant aborts the current cycle.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backing medium unreachable (connection refused, I/O error, timeout).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Reachable, but the command was refused or its reply made no sense.
    #[error("store rejected command: {0}")]
    Backend(String),

    #[error("corrupt record at {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        if e.is_io_error() || e.is_timeout() || e.is_connection_dropped() || e.is_connection_refusal() {
            StoreError::Unavailable(e.to_string())
        } else {
            StoreError::Backend(e.to_string())
        }
    }
}
