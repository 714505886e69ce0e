//! Delivery channel abstraction.

/// A failed delivery attempt. The dispatcher counts it and moves on.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("message template: {0}")]
    Template(String),

    #[error("notifier config: {0}")]
    Config(String),
}

/// Rendered title and body for one slot.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Notification {
    pub title: String,
    /// Message text: court, date, time, duration.
    pub message: String,
}

/// Something that can put a message in front of the user.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// `Ok` once the channel accepted the message.
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;

    /// Human-readable name for this channel (e.g., "ntfy", "logfile").
    fn channel_name(&self) -> &str;
}
