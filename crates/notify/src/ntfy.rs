//! ntfy push notifier.
//!
//! Posts the message as a plain-text body to an ntfy topic URL
//! (e.g. `https://ntfy.sh/court-slots`), with the title in the `Title`
//! header. Environment variable references (`${VAR_NAME}`) in the URL
//! and header values are resolved at construction time.

use std::collections::HashMap;
use std::time::Duration;

use crate::traits::{Notification, Notifier, NotifyError};

#[derive(Debug)]
pub struct NtfyNotifier {
    /// Topic URL (env vars already resolved).
    url: String,
    /// Extra headers on every request (e.g. `Authorization`, `Tags`).
    headers: HashMap<String, String>,
    client: reqwest::Client,
}

impl NtfyNotifier {
    /// # Errors
    ///
    /// [`NotifyError::Config`] if an env var reference is unset or unclosed,
    /// [`NotifyError::Http`] if the HTTP client cannot be built.
    pub fn new(
        url: &str,
        headers: HashMap<String, String>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let url = resolve_env_vars(url)?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(NotifyError::Config(format!("ntfy url must be http(s): {url}")));
        }

        let headers = headers
            .into_iter()
            .map(|(name, value)| -> Result<(String, String), NotifyError> {
                Ok((name, resolve_env_vars(&value)?))
            })
            .collect::<Result<HashMap<_, _>, NotifyError>>()?;

        Ok(Self {
            url,
            headers,
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }
}

#[async_trait::async_trait]
impl Notifier for NtfyNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let request = self.headers.iter().fold(
            self.client
                .post(&self.url)
                .header("Title", notification.title.as_str())
                .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
                .body(notification.message.clone()),
            |req, (name, value)| req.header(name.as_str(), value.as_str()),
        );

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(url = %self.url, %status, body = %body, "ntfy returned non-2xx status");
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(url = %self.url, %status, "ntfy notification delivered");
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "ntfy"
    }
}

/// Expand `${NAME}` references from the process environment.
fn resolve_env_vars(input: &str) -> Result<String, NotifyError> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find("${") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let close = after.find('}').ok_or_else(|| {
            NotifyError::Config(format!("unclosed env var reference in: {input}"))
        })?;
        let name = &after[..close];
        let value = std::env::var(name)
            .map_err(|_| NotifyError::Config(format!("env var not found: {name}")))?;
        out.push_str(&value);
        rest = &after[close + 1..];
    }
    out.push_str(rest);

    Ok(out)
}
