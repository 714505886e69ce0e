//! Remote browser service client.
//!
//! `GET {endpoint}?court=<court>[&url=<booking page>]`, answered with a
//! JSON array of slot records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use serde_json::Value;

use courtwatch_rules::PreferenceRule;

use crate::adapters::batch_for_court;
use crate::traits::{ScrapeError, SlotBatch, SlotSource};

pub struct HttpSource {
    client: Client,
    endpoint: String,
}

impl HttpSource {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ScrapeError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl SlotSource for HttpSource {
    async fn fetch(&self, rule: &PreferenceRule) -> Result<SlotBatch, ScrapeError> {
        let mut query = vec![("court", rule.court.as_str())];
        if let Some(url) = rule.url.as_deref() {
            query.push(("url", url));
        }

        let start = std::time::Instant::now();
        let response = self.client.get(&self.endpoint).query(&query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let records: Vec<Value> = serde_json::from_str(&body)?;
        let batch = batch_for_court(records, &rule.court);
        tracing::debug!(
            court = %rule.court,
            count = batch.raw.len(),
            malformed = batch.malformed,
            duration_ms = start.elapsed().as_millis() as u64,
            "remote browser returned slots"
        );
        Ok(batch)
    }

    fn kind(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_service_is_http_error() {
        let source = HttpSource::new("http://127.0.0.1:1/slots", Duration::from_secs(2)).unwrap();
        let err = source.fetch(&PreferenceRule::new("Riverside")).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Http(_)));
    }
}
