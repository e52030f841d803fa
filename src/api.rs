use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::config::{HotReloadScoring, ScoringConfig};
use crate::engine;
use crate::ingest::{self, config::IngestConfig, scheduler, types::TrendProvider};
use crate::model::TrendScored;
use crate::store::TrendStore;
use crate::view::{view, PlatformFilter, SortKey};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TrendStore>,
    pub scoring: Arc<HotReloadScoring>,
    providers: Arc<Vec<Box<dyn TrendProvider>>>,
}

impl AppState {
    pub fn new(
        store: Arc<TrendStore>,
        scoring: Arc<HotReloadScoring>,
        ingest_cfg: &IngestConfig,
    ) -> Self {
        Self {
            store,
            scoring,
            providers: Arc::new(scheduler::providers_for(ingest_cfg)),
        }
    }

    /// Default wiring: config paths from env/CWD, empty store. The binary
    /// and the HTTP tests build the same state this way.
    pub fn from_env() -> Self {
        let ingest_cfg = ingest::config::load_config_default().unwrap_or_else(|e| {
            tracing::warn!(error = ?e, "falling back to default ingest config");
            IngestConfig::default()
        });
        Self::new(
            Arc::new(TrendStore::new()),
            Arc::new(HotReloadScoring::new(None)),
            &ingest_cfg,
        )
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/score", post(score_batch))
        .route("/refresh", post(refresh))
        .route("/trends", get(trends))
        .route("/debug/scoring", get(debug_scoring))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct ScoreResp {
    scored: Vec<TrendScored>,
    rejected: usize,
    deduped: usize,
}

/// Score an untyped batch: the request body is whatever the upstream feed
/// produced, so it crosses the same fail-closed boundary as ingest before it
/// can touch the engine. Scored records are upserted into the store.
async fn score_batch(
    State(state): State<AppState>,
    Json(raw): Json<Vec<serde_json::Value>>,
) -> Json<ScoreResp> {
    let (inputs, counts) = ingest::parse_batch(&raw);
    let scored = engine::score_all(&inputs, &state.scoring.current());
    state.store.upsert_all(scored.clone());
    Json(ScoreResp {
        scored,
        rejected: counts.rejected,
        deduped: counts.deduped,
    })
}

#[derive(serde::Serialize)]
struct RefreshResp {
    kept: usize,
    rejected: usize,
    deduped: usize,
    store: usize,
}

/// Run one ingest cycle on demand (the dashboard's "Run Scan" button).
async fn refresh(State(state): State<AppState>) -> Json<RefreshResp> {
    let (kept, rejected, deduped) =
        scheduler::refresh_once(&state.providers, &state.scoring, &state.store).await;
    Json(RefreshResp {
        kept,
        rejected,
        deduped,
        store: state.store.len(),
    })
}

#[derive(serde::Deserialize, Default)]
struct TrendsQuery {
    /// "all" (default) or a platform name.
    platform: Option<String>,
    /// Case-insensitive name substring.
    q: Option<String>,
    /// "velocity" or "profitScore" (default).
    sort: Option<SortKey>,
}

async fn trends(
    State(state): State<AppState>,
    Query(query): Query<TrendsQuery>,
) -> Result<Json<Vec<TrendScored>>, (StatusCode, String)> {
    let platform = match query.platform.as_deref() {
        None => PlatformFilter::All,
        Some(raw) => PlatformFilter::parse(raw).ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                format!("unknown platform filter '{raw}'"),
            )
        })?,
    };
    let items = state.store.snapshot();
    Ok(Json(view(
        &items,
        platform,
        query.q.as_deref().unwrap_or(""),
        query.sort.unwrap_or_default(),
    )))
}

async fn debug_scoring(State(state): State<AppState>) -> Json<ScoringConfig> {
    Json(state.scoring.current())
}
