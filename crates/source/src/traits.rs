use async_trait::async_trait;
use thiserror::Error;

use courtwatch_core::RawSlot;
use courtwatch_rules::PreferenceRule;

/// Records fetched for one court.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotBatch {
    pub raw: Vec<RawSlot>,
    /// Elements that matched no known record shape. Already logged.
    pub malformed: usize,
}

/// A scrape that could not produce a slot list. Aborts the cycle.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode slot records: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("scrape service returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Trait for scrape backends (file dump, remote browser service, ...).
#[async_trait]
pub trait SlotSource: Send + Sync {
    /// Raw slot records currently offered for the rule's court.
    ///
    /// Only an unreadable payload is an error. A single record that fails
    /// to decode is counted in [`SlotBatch::malformed`]; field validation
    /// happens later in the matcher.
    async fn fetch(&self, rule: &PreferenceRule) -> Result<SlotBatch, ScrapeError>;

    /// Short backend label for logs.
    fn kind(&self) -> &str;
}
