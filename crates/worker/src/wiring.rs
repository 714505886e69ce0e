use std::collections::HashMap;
use std::time::Duration;

use courtwatch_core::config::NotifyConfig;
use courtwatch_notify::{FanoutNotifier, LogFileNotifier, MessageFormatter, Notifier, NotifyError, NtfyNotifier};

const NTFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Log file always, plus ntfy unless disabled.
pub fn build_notifier(config: &NotifyConfig) -> Result<FanoutNotifier, NotifyError> {
    let mut channels: Vec<Box<dyn Notifier>> = vec![Box::new(LogFileNotifier::new(&config.log_path))];
    if let Some(url) = config.ntfy_url.as_deref() {
        channels.push(Box::new(NtfyNotifier::new(url, HashMap::new(), NTFY_TIMEOUT)?));
    }
    Ok(FanoutNotifier::new(channels))
}

pub fn build_formatter(config: &NotifyConfig) -> Result<MessageFormatter, NotifyError> {
    MessageFormatter::new(None, config.template.clone())
}
