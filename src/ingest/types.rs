// src/ingest/types.rs
use anyhow::Result;

/// A platform feed. Providers return *raw* JSON records; the typed boundary
/// lives in `ingest::parse_batch`, which fails closed on malformed rows, so
/// nothing loosely-typed ever reaches the engine.
#[async_trait::async_trait]
pub trait TrendProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<serde_json::Value>>;
    fn name(&self) -> &str;
}
