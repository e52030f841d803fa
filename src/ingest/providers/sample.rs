use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::histogram;

use crate::ingest::types::TrendProvider;

/// Bundled feed of known micro-trends. Serves a fresh checkout (and the test
/// suite) without any network or API keys; real platform feeds replace it via
/// `config/ingest.toml`.
pub struct SampleFeedProvider {
    body: String,
}

impl SampleFeedProvider {
    pub fn new() -> Self {
        Self::from_body(include_str!("../../../sample_trends.json"))
    }

    /// Build from an arbitrary JSON body. Used by tests.
    pub fn from_body(s: &str) -> Self {
        Self {
            body: s.to_string(),
        }
    }
}

impl Default for SampleFeedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TrendProvider for SampleFeedProvider {
    async fn fetch_latest(&self) -> Result<Vec<serde_json::Value>> {
        let t0 = std::time::Instant::now();
        let records: Vec<serde_json::Value> =
            serde_json::from_str(&self.body).context("parsing sample trend feed")?;
        histogram!("ingest_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(records)
    }

    fn name(&self) -> &str {
        "sample"
    }
}
