//! Scrape backends, seen from the watcher as "produces raw slot records".
//!
//! - `SlotSource` trait: fetch the raw slots for one preference rule
//! - adapters from each backend's record shape into `RawSlot`
//! - `FileSource` (JSON dump on disk) and `HttpSource` (remote browser service)

pub mod adapters;
pub mod file;
pub mod http;
pub mod traits;

pub use adapters::{LocalDriverRecord, RemoteBrowserRecord, SourceRecord};
pub use file::FileSource;
pub use http::HttpSource;
pub use traits::{ScrapeError, SlotBatch, SlotSource};

use std::time::Duration;

use courtwatch_core::config::SourceConfig;

/// Build the source named by `SLOTS_SOURCE`: `file:<path>` or an
/// `http(s)://` endpoint. A bare path is treated as a file.
pub fn from_config(config: &SourceConfig) -> Result<Box<dyn SlotSource>, ScrapeError> {
    let location = config.location.trim();
    if location.starts_with("http://") || location.starts_with("https://") {
        let source = HttpSource::new(location, Duration::from_secs(config.timeout_secs))?;
        return Ok(Box::new(source));
    }
    let path = location.strip_prefix("file:").unwrap_or(location);
    Ok(Box::new(FileSource::new(path)))
}
