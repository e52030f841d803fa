//! Runtime-tunable scoring policy with hot-reload from config/scoring.json.
//!
//! JSON shape:
//! {
//!   "velocity_weight": 0.2,
//!   "margin_weight": 2.0,
//!   "ladder_multipliers": [1.3, 1.6, 2.0]
//! }
//!
//! On each `current()` call we check the file's modified time and reload if
//! changed. A reload never replaces a valid config with an invalid one.

use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::RwLock,
    time::SystemTime,
};

pub const DEFAULT_SCORING_CONFIG_PATH: &str = "config/scoring.json";
pub const ENV_SCORING_CONFIG_PATH: &str = "SCORING_CONFIG_PATH";

/// Fixed-policy blend weights for the profit score.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub velocity_weight: f64,
    pub margin_weight: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            velocity_weight: 0.2,
            margin_weight: 2.0,
        }
    }
}

/// Price ladder multipliers, lowest rung first.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LadderConfig {
    #[serde(rename = "ladder_multipliers")]
    pub multipliers: [f64; 3],
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            multipliers: [1.3, 1.6, 2.0],
        }
    }
}

/// Everything the engine needs to score a batch. Passed explicitly into the
/// entry points; the engine keeps no ambient state.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    #[serde(flatten)]
    pub weights: ScoreWeights,
    #[serde(flatten)]
    pub ladder: LadderConfig,
}

impl ScoringConfig {
    /// Sanity limits: weights finite and non-negative, multipliers positive
    /// and strictly increasing (the ladder invariant depends on this).
    pub fn is_valid(&self) -> bool {
        let w = &self.weights;
        if !(w.velocity_weight.is_finite() && w.velocity_weight >= 0.0) {
            return false;
        }
        if !(w.margin_weight.is_finite() && w.margin_weight >= 0.0) {
            return false;
        }
        let [a, b, c] = self.ladder.multipliers;
        [a, b, c].iter().all(|m| m.is_finite() && *m > 0.0) && a < b && b < c
    }
}

/// Hot-reload wrapper: reloads when the config file mtime changes.
#[derive(Debug)]
pub struct HotReloadScoring {
    path: PathBuf,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    config: ScoringConfig,
    last_modified: Option<SystemTime>,
}

impl HotReloadScoring {
    /// Create with a path (env override, then "config/scoring.json").
    pub fn new(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(|| {
            std::env::var(ENV_SCORING_CONFIG_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SCORING_CONFIG_PATH))
        });
        let mut state = State {
            config: ScoringConfig::default(),
            last_modified: None,
        };
        // Eager first load so the service starts on file policy, not defaults.
        if let Ok(cfg) = load_config_file(&path) {
            if cfg.is_valid() {
                state.config = cfg;
                state.last_modified = fs::metadata(&path).and_then(|m| m.modified()).ok();
            }
        }
        Self {
            path,
            inner: RwLock::new(state),
        }
    }

    /// Get the latest config, reloading if the file changed.
    pub fn current(&self) -> ScoringConfig {
        // Fast path: check metadata without grabbing the write lock yet.
        let needs_reload = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(mtime) => {
                let guard = self.inner.read().expect("scoring config lock poisoned");
                guard.last_modified != Some(mtime)
            }
            // If the file isn't there, keep whatever we have; no reload.
            Err(_) => false,
        };

        if !needs_reload {
            return self.inner.read().expect("scoring config lock poisoned").config;
        }

        // Slow path: reload with write lock, double-checking for races.
        let mut guard = self.inner.write().expect("scoring config lock poisoned");
        if let Ok(mtime) = fs::metadata(&self.path).and_then(|m| m.modified()) {
            if guard.last_modified != Some(mtime) {
                match load_config_file(&self.path) {
                    Ok(cfg) if cfg.is_valid() => {
                        guard.config = cfg;
                        guard.last_modified = Some(mtime);
                    }
                    Ok(_) => {
                        tracing::warn!(path = %self.path.display(), "rejected invalid scoring config; keeping previous");
                        guard.last_modified = Some(mtime);
                    }
                    Err(e) => {
                        tracing::warn!(error = ?e, path = %self.path.display(), "scoring config reload failed; keeping previous");
                        guard.last_modified = Some(mtime);
                    }
                }
            }
        }
        guard.config
    }
}

/// Load the config directly (no caching). Public for tests/tools.
pub fn load_config_file(path: &Path) -> io::Result<ScoringConfig> {
    let bytes = fs::read(path)?;
    let cfg: ScoringConfig = serde_json::from_slice(&bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(cfg)
}
