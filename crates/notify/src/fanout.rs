//! Delivers one notification to several channels.
//!
//! Channels are tried in order and a failing channel does not block the
//! others. The send counts as delivered if at least one channel accepted it.

use crate::traits::{Notification, Notifier, NotifyError};

pub struct FanoutNotifier {
    channels: Vec<Box<dyn Notifier>>,
}

impl FanoutNotifier {
    pub fn new(channels: Vec<Box<dyn Notifier>>) -> Self {
        Self { channels }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

#[async_trait::async_trait]
impl Notifier for FanoutNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut delivered = 0usize;
        let mut last_error = None;

        for channel in &self.channels {
            let started = std::time::Instant::now();
            let outcome = channel.send(notification).await;
            let duration_ms = started.elapsed().as_millis() as u64;

            match outcome {
                Ok(()) => {
                    tracing::debug!(channel = channel.channel_name(), duration_ms, "channel delivered");
                    delivered += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        channel = channel.channel_name(),
                        error = %e,
                        duration_ms,
                        "channel delivery failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        match (delivered, last_error) {
            (0, Some(e)) => Err(e),
            (0, None) => Err(NotifyError::Config("no notification channels configured".into())),
            _ => Ok(()),
        }
    }

    fn channel_name(&self) -> &str {
        "fanout"
    }
}
