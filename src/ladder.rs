//! Price ladder generator.
//!
//! Three candidate sale prices derived from the unit cost basis
//! `base = cogs + fees + shipping`, one per configured multiplier, each
//! independently rounded half-up to the cent. All-zero costs degenerate to
//! `[0, 0, 0]`; that is an accepted edge case, not an error.

use crate::config::LadderConfig;

/// Round to cents, half-up. `f64::round` is half-away-from-zero, which is
/// half-up for the non-negative prices produced here.
pub fn round_to_cent(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Generate the three-rung ladder for one cost basis.
///
/// Output is always non-decreasing; rungs are strictly increasing whenever
/// the basis is large enough that adjacent rungs land on distinct cents
/// (sub-cent bases can collapse after rounding).
pub fn generate_ladder(cogs: f64, fees: f64, shipping: f64, cfg: &LadderConfig) -> [f64; 3] {
    let base = cogs + fees + shipping;
    cfg.multipliers.map(|m| round_to_cent(base * m))
}
