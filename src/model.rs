//! Core record types for the trend scoring pipeline.
//!
//! `TrendInput` is what the ingest boundary hands to the engine after
//! validation; `TrendScored` is the immutable result the store keeps, one per
//! trend name. Field names on the wire match the dashboard's table shape
//! (`priceLadder`, `profitScore`, `createdAt`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marketplaces a trend can be observed on. Closed set; unknown platforms in
/// upstream records are discarded at the ingest boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Tiktok,
    Etsy,
    Gumroad,
}

impl Platform {
    /// Parse the lowercase wire form ("tiktok" | "etsy" | "gumroad").
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tiktok" => Some(Self::Tiktok),
            "etsy" => Some(Self::Etsy),
            "gumroad" => Some(Self::Gumroad),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tiktok => "tiktok",
            Self::Etsy => "etsy",
            Self::Gumroad => "gumroad",
        }
    }
}

/// Raw per-trend observation: a popularity signal plus unit costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendInput {
    /// Identifying label, e.g. "#LEDcollars". Non-empty after normalization.
    pub name: String,
    pub platform: Platform,
    /// Observed demand signal, platform-specific units. Finite, >= 0.
    pub velocity: f64,
    /// Unit costs in dollars. Finite, >= 0.
    pub cogs: f64,
    pub fees: f64,
    pub shipping: f64,
}

/// Why an input was rejected before scoring.
#[derive(Debug, Error, PartialEq)]
pub enum InvalidTrend {
    #[error("empty trend name")]
    EmptyName,
    #[error("{field} is negative: {value}")]
    NegativeValue { field: &'static str, value: f64 },
    #[error("{field} is not finite")]
    NonFinite { field: &'static str },
}

impl TrendInput {
    /// Validate numeric preconditions. Rejection here is local and per-record;
    /// batch callers skip rejected inputs instead of failing the batch.
    pub fn validate(&self) -> Result<(), InvalidTrend> {
        if self.name.trim().is_empty() {
            return Err(InvalidTrend::EmptyName);
        }
        for (field, value) in [
            ("velocity", self.velocity),
            ("cogs", self.cogs),
            ("fees", self.fees),
            ("shipping", self.shipping),
        ] {
            if !value.is_finite() {
                return Err(InvalidTrend::NonFinite { field });
            }
            if value < 0.0 {
                return Err(InvalidTrend::NegativeValue { field, value });
            }
        }
        Ok(())
    }
}

/// A scored trend. Immutable once produced; re-scoring the same name replaces
/// the record wholesale (upsert by `name`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendScored {
    pub name: String,
    pub platform: Platform,
    pub velocity: f64,
    pub cogs: f64,
    pub fees: f64,
    pub shipping: f64,
    /// Exactly three candidate sale prices, lowest first.
    pub price_ladder: [f64; 3],
    /// Percent profit at the lowest rung. `None` only in the zero-cost
    /// degenerate case where the rung itself is 0.
    pub margin: Option<f64>,
    /// Composite 0-100 rank blending velocity and margin.
    pub profit_score: u8,
    /// When the record was computed. Informational only.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(velocity: f64, cogs: f64) -> TrendInput {
        TrendInput {
            name: "#tinyhats".into(),
            platform: Platform::Etsy,
            velocity,
            cogs,
            fees: 0.6,
            shipping: 1.0,
        }
    }

    #[test]
    fn validate_accepts_ordinary_input() {
        assert_eq!(input(310.0, 1.8).validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_negative_and_non_finite() {
        let mut i = input(310.0, -1.8);
        assert!(matches!(
            i.validate(),
            Err(InvalidTrend::NegativeValue { field: "cogs", .. })
        ));
        i.cogs = 1.8;
        i.velocity = f64::NAN;
        assert!(matches!(
            i.validate(),
            Err(InvalidTrend::NonFinite { field: "velocity" })
        ));
        i.velocity = f64::INFINITY;
        assert!(i.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_name() {
        let mut i = input(310.0, 1.8);
        i.name = "   ".into();
        assert_eq!(i.validate(), Err(InvalidTrend::EmptyName));
    }

    #[test]
    fn scored_serializes_with_dashboard_field_names() {
        let s = TrendScored {
            name: "#LEDcollars".into(),
            platform: Platform::Tiktok,
            velocity: 450.0,
            cogs: 2.5,
            fees: 0.8,
            shipping: 1.2,
            price_ladder: [5.85, 7.2, 9.0],
            margin: Some(23.08),
            profit_score: 100,
            created_at: Utc::now(),
        };
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["platform"], serde_json::json!("tiktok"));
        assert!(v.get("priceLadder").is_some(), "missing 'priceLadder'");
        assert!(v.get("profitScore").is_some(), "missing 'profitScore'");
        assert!(v.get("createdAt").is_some(), "missing 'createdAt'");
        assert_eq!(v["priceLadder"].as_array().unwrap().len(), 3);
    }
}
