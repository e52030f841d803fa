use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};

use crate::ingest::config::FeedConfig;
use crate::ingest::types::TrendProvider;

/// Polls a configured endpoint that returns a JSON array of raw trend
/// records. One instance per feed in `config/ingest.toml`.
pub struct JsonFeedProvider {
    label: String,
    url: String,
    client: reqwest::Client,
}

impl JsonFeedProvider {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_feed(feed: &FeedConfig) -> Self {
        Self::new(feed.label.clone(), feed.url.clone())
    }

    fn parse_body(&self, body: &str) -> Result<Vec<serde_json::Value>> {
        let t0 = std::time::Instant::now();
        let records: Vec<serde_json::Value> = serde_json::from_str(body)
            .with_context(|| format!("parsing feed body from {}", self.label))?;
        histogram!("ingest_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(records)
    }
}

#[async_trait]
impl TrendProvider for JsonFeedProvider {
    async fn fetch_latest(&self) -> Result<Vec<serde_json::Value>> {
        let body = match self.client.get(&self.url).send().await {
            Ok(resp) => resp
                .text()
                .await
                .with_context(|| format!("{} feed .text()", self.label))?,
            Err(e) => {
                tracing::warn!(error = ?e, provider = %self.label, "provider http error");
                counter!("ingest_provider_errors_total").increment(1);
                return Err(e).with_context(|| format!("{} feed get()", self.label));
            }
        };
        self.parse_body(&body)
    }

    fn name(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_body_accepts_array_and_rejects_object() {
        let p = JsonFeedProvider::new("test", "http://localhost/feed.json");
        let ok = p.parse_body(r##"[{"name": "#x"}]"##).unwrap();
        assert_eq!(ok.len(), 1);
        assert!(p.parse_body(r##"{"name": "#x"}"##).is_err());
    }
}
