//! Profit score composer.
//!
//! Blends the demand signal (`velocity`) and the profitability signal
//! (`margin`) into one sortable 0-100 rank:
//!
//! score = round(velocity * velocity_weight + margin * margin_weight)
//!
//! then clamp to [0, 100]. Weights are policy constants carried in
//! `ScoringConfig`, not derived here.

use crate::config::ScoreWeights;

/// Compose the rank for one trend. `margin` is `None` only in the zero-price
/// degenerate case; its term then contributes 0 and the score is the clamped
/// velocity term alone.
///
/// Monotonic in both inputs before clamping: raising velocity or margin never
/// lowers the score.
pub fn compose_score(velocity: f64, margin: Option<f64>, w: &ScoreWeights) -> u8 {
    let raw = velocity * w.velocity_weight + margin.unwrap_or(0.0) * w.margin_weight;
    raw.round().clamp(0.0, 100.0) as u8
}
