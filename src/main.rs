//! Trend Scope — Binary Entrypoint
//! Boots the Axum HTTP server: shared state, the periodic refresh scheduler,
//! and the Prometheus endpoint.

use std::sync::Arc;

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trend_scope::api::{self, AppState};
use trend_scope::config::HotReloadScoring;
use trend_scope::ingest::{self, config::IngestConfig, scheduler};
use trend_scope::metrics::Metrics;
use trend_scope::store::TrendStore;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - TREND_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("TREND_DEV_LOG").ok().is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ingest=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments. This enables
    // SCORING_CONFIG_PATH / INGEST_CONFIG_PATH overrides from .env.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let ingest_cfg = ingest::config::load_config_default().unwrap_or_else(|e| {
        tracing::warn!(error = ?e, "falling back to default ingest config");
        IngestConfig::default()
    });

    let metrics = Metrics::init(ingest_cfg.refresh_secs);

    let store = Arc::new(TrendStore::new());
    let scoring = Arc::new(HotReloadScoring::new(None));

    // Background refresh: re-ingest, re-score, upsert on an interval.
    scheduler::spawn_refresh_scheduler(ingest_cfg.clone(), scoring.clone(), store.clone());

    let state = AppState::new(store, scoring, &ingest_cfg);
    let router = api::create_router(state).merge(metrics.router());

    Ok(router.into())
}
