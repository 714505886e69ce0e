//! Notification delivery for newly matched court slots.
//!
//! This crate provides:
//! - `Notifier` trait for pluggable delivery channels
//! - ntfy (HTTP push), log-file, and fan-out notifier implementations
//! - Minijinja rendering of the slot message
//! - `Dispatcher`: dedup against the notification store, then deliver

pub mod dispatcher;
pub mod fanout;
pub mod logfile;
pub mod ntfy;
pub mod templating;
pub mod traits;

pub use dispatcher::{DispatchSummary, Dispatcher};
pub use fanout::FanoutNotifier;
pub use logfile::LogFileNotifier;
pub use ntfy::NtfyNotifier;
pub use templating::{MessageFormatter, TemplateRenderer};
pub use traits::{Notification, Notifier, NotifyError};
