//! # Scoring Engine
//! Pure, testable pipeline that maps `TrendInput` → `TrendScored`:
//! ladder → margin at the lowest rung → composite profit score.
//! No I/O beyond telemetry counters; configuration is passed in explicitly.

use metrics::counter;

use crate::config::ScoringConfig;
use crate::ladder::generate_ladder;
use crate::margin::compute_margin;
use crate::model::{InvalidTrend, TrendInput, TrendScored};
use crate::score::compose_score;

/// Score a single trend. Rejects invalid numeric input before computing
/// anything; never coerces.
pub fn score_trend(input: &TrendInput, cfg: &ScoringConfig) -> Result<TrendScored, InvalidTrend> {
    input.validate()?;

    let price_ladder = generate_ladder(input.cogs, input.fees, input.shipping, &cfg.ladder);
    let margin = compute_margin(price_ladder[0], input.cogs, input.fees, input.shipping);
    let profit_score = compose_score(input.velocity, margin, &cfg.weights);

    Ok(TrendScored {
        name: input.name.clone(),
        platform: input.platform,
        velocity: input.velocity,
        cogs: input.cogs,
        fees: input.fees,
        shipping: input.shipping,
        price_ladder,
        margin,
        profit_score,
        created_at: chrono::Utc::now(),
    })
}

/// Score a batch. Items are independent; order follows the input sequence and
/// no valid input is ever dropped. Invalid inputs are skipped with a warning
/// and a counter, so one bad record cannot fail the batch.
pub fn score_all(inputs: &[TrendInput], cfg: &ScoringConfig) -> Vec<TrendScored> {
    let mut out = Vec::with_capacity(inputs.len());
    for input in inputs {
        match score_trend(input, cfg) {
            Ok(scored) => out.push(scored),
            Err(e) => {
                tracing::warn!(name = %input.name, error = %e, "rejected trend input");
                counter!("engine_rejected_total").increment(1);
            }
        }
    }
    counter!("engine_scored_total").increment(out.len() as u64);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Platform;

    fn mk(name: &str, velocity: f64, cogs: f64, fees: f64, shipping: f64) -> TrendInput {
        TrendInput {
            name: name.to_string(),
            platform: Platform::Tiktok,
            velocity,
            cogs,
            fees,
            shipping,
        }
    }

    #[test]
    fn ledcollars_scenario_end_to_end() {
        let cfg = ScoringConfig::default();
        let s = score_trend(&mk("#LEDcollars", 450.0, 2.5, 0.8, 1.2), &cfg).unwrap();
        assert_eq!(s.price_ladder, [5.85, 7.2, 9.0]);
        let m = s.margin.unwrap();
        assert!((m - 23.076923076923077).abs() < 1e-9, "margin {m}");
        assert_eq!(s.profit_score, 100); // 136.15 clamps
    }

    #[test]
    fn zero_cost_zero_velocity_scenario() {
        let cfg = ScoringConfig::default();
        let s = score_trend(&mk("#freebies", 0.0, 0.0, 0.0, 0.0), &cfg).unwrap();
        assert_eq!(s.price_ladder, [0.0, 0.0, 0.0]);
        assert_eq!(s.margin, None);
        assert_eq!(s.profit_score, 0);
    }

    #[test]
    fn lowest_rung_always_clears_total_cost() {
        // 1.3x over the basis, so margin at rung one is positive for any
        // nonzero cost basis.
        let cfg = ScoringConfig::default();
        let s = score_trend(&mk("#ministand", 390.0, 3.0, 1.0, 1.5), &cfg).unwrap();
        assert!(s.margin.unwrap() > 0.0);
    }

    #[test]
    fn batch_preserves_order_and_count() {
        let cfg = ScoringConfig::default();
        let inputs = vec![
            mk("#a", 10.0, 1.0, 0.1, 0.1),
            mk("#b", 20.0, 2.0, 0.2, 0.2),
            mk("#c", 30.0, 3.0, 0.3, 0.3),
        ];
        let scored = score_all(&inputs, &cfg);
        assert_eq!(scored.len(), 3);
        let names: Vec<_> = scored.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["#a", "#b", "#c"]);
    }

    #[test]
    fn batch_skips_invalid_without_failing() {
        let cfg = ScoringConfig::default();
        let inputs = vec![
            mk("#good", 10.0, 1.0, 0.1, 0.1),
            mk("#bad", -5.0, 1.0, 0.1, 0.1),
            mk("#also-good", 20.0, 2.0, 0.2, 0.2),
        ];
        let scored = score_all(&inputs, &cfg);
        let names: Vec<_> = scored.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["#good", "#also-good"]);
    }

    #[test]
    fn rescoring_replaces_wholesale_not_partially() {
        let cfg = ScoringConfig::default();
        let a = score_trend(&mk("#x", 100.0, 2.0, 0.5, 0.5), &cfg).unwrap();
        let b = score_trend(&mk("#x", 200.0, 2.0, 0.5, 0.5), &cfg).unwrap();
        // Same costs, same ladder; the new record stands on its own.
        assert_eq!(a.price_ladder, b.price_ladder);
        assert!(b.profit_score >= a.profit_score);
    }
}
