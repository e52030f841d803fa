// src/ingest/scheduler.rs
use std::sync::Arc;

use metrics::{counter, gauge};
use tokio::task::JoinHandle;

use crate::config::HotReloadScoring;
use crate::engine;
use crate::ingest::config::IngestConfig;
use crate::ingest::providers::{http::JsonFeedProvider, sample::SampleFeedProvider};
use crate::ingest::types::TrendProvider;
use crate::store::TrendStore;

/// Build the provider set for a config: one HTTP provider per feed, or the
/// bundled sample feed when none are configured.
pub fn providers_for(cfg: &IngestConfig) -> Vec<Box<dyn TrendProvider>> {
    if cfg.feeds.is_empty() {
        return vec![Box::new(SampleFeedProvider::new())];
    }
    cfg.feeds
        .iter()
        .map(|f| Box::new(JsonFeedProvider::from_feed(f)) as Box<dyn TrendProvider>)
        .collect()
}

/// One refresh cycle: ingest → score → upsert. Shared by the scheduler and
/// the `/refresh` endpoint. Returns (kept, rejected, deduped).
pub async fn refresh_once(
    providers: &[Box<dyn TrendProvider>],
    scoring: &HotReloadScoring,
    store: &TrendStore,
) -> (usize, usize, usize) {
    let (inputs, counts) = crate::ingest::run_once(providers).await;
    let scored = engine::score_all(&inputs, &scoring.current());
    let kept = scored.len();
    store.upsert_all(scored);
    (kept, counts.rejected, counts.deduped)
}

/// Spawn the periodic refresh loop: the original dashboard's re-fetch cycle,
/// minus the browser. Providers come from the ingest config; a failed cycle
/// leaves the previous store contents in place.
pub fn spawn_refresh_scheduler(
    cfg: IngestConfig,
    scoring: Arc<HotReloadScoring>,
    store: Arc<TrendStore>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let providers = providers_for(&cfg);
        let mut ticker =
            tokio::time::interval(std::time::Duration::from_secs(cfg.refresh_secs.max(1)));
        loop {
            ticker.tick().await;

            let (kept, rejected, deduped) = refresh_once(&providers, &scoring, &store).await;

            counter!("refresh_runs_total").increment(1);
            gauge!("trend_store_size").set(store.len() as f64);

            tracing::info!(
                target: "ingest",
                kept,
                rejected,
                deduped,
                store = store.len(),
                "refresh tick"
            );
        }
    })
}
