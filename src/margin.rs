//! Margin calculator: percent profit at a given sale price.

/// `((price - cogs - fees - shipping) / price) * 100`.
///
/// Returns `None` when `price == 0` so the zero-cost degenerate ladder never
/// pushes an infinity or NaN into downstream scores. No rounding is applied;
/// presentation layers round for display only.
pub fn compute_margin(price: f64, cogs: f64, fees: f64, shipping: f64) -> Option<f64> {
    if price == 0.0 {
        return None;
    }
    Some(((price - cogs - fees - shipping) / price) * 100.0)
}
