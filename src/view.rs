//! Filter/sort view over an already-scored collection.
//!
//! Pure, read-only transform: the dashboard picks a platform filter, a name
//! search string, and a sort key; we hand back a fresh, ordered Vec and never
//! mutate the input. Ties keep input order (stable sort) so repeated renders
//! are deterministic.

use serde::{Deserialize, Serialize};

use crate::model::{Platform, TrendScored};

/// `all` passes every item through; otherwise match one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformFilter {
    #[default]
    All,
    Only(Platform),
}

impl PlatformFilter {
    /// Parse the wire form: "all" (or empty) | "tiktok" | "etsy" | "gumroad".
    pub fn parse(s: &str) -> Option<Self> {
        let t = s.trim();
        if t.is_empty() || t.eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        Platform::parse(t).map(Self::Only)
    }

    pub fn matches(&self, platform: Platform) -> bool {
        match self {
            Self::All => true,
            Self::Only(p) => *p == platform,
        }
    }
}

/// Which column the descending sort uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[serde(rename = "velocity")]
    Velocity,
    #[default]
    #[serde(rename = "profitScore")]
    ProfitScore,
}

/// Filter by platform and case-insensitive name containment, then sort
/// descending by `sort`. An empty query matches everything.
pub fn view(
    items: &[TrendScored],
    platform: PlatformFilter,
    name_query: &str,
    sort: SortKey,
) -> Vec<TrendScored> {
    let needle = name_query.to_lowercase();
    let mut out: Vec<TrendScored> = items
        .iter()
        .filter(|t| platform.matches(t.platform))
        .filter(|t| needle.is_empty() || t.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    // Vec::sort_by is stable: equal keys keep their input order.
    match sort {
        SortKey::Velocity => out.sort_by(|a, b| b.velocity.total_cmp(&a.velocity)),
        SortKey::ProfitScore => out.sort_by(|a, b| b.profit_score.cmp(&a.profit_score)),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::engine::score_trend;
    use crate::model::TrendInput;

    fn scored(name: &str, platform: Platform, velocity: f64) -> TrendScored {
        score_trend(
            &TrendInput {
                name: name.into(),
                platform,
                velocity,
                cogs: 2.0,
                fees: 0.5,
                shipping: 0.5,
            },
            &ScoringConfig::default(),
        )
        .unwrap()
    }

    fn sample() -> Vec<TrendScored> {
        vec![
            scored("#LEDcollars", Platform::Tiktok, 450.0),
            scored("#tinyhats", Platform::Etsy, 310.0),
            scored("#AIstickers", Platform::Gumroad, 280.0),
            scored("#ministand", Platform::Tiktok, 390.0),
        ]
    }

    #[test]
    fn all_and_empty_query_return_everything_sorted() {
        let items = sample();
        let v = view(&items, PlatformFilter::All, "", SortKey::Velocity);
        assert_eq!(v.len(), items.len());
        let names: Vec<_> = v.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["#LEDcollars", "#ministand", "#tinyhats", "#AIstickers"]);
    }

    #[test]
    fn platform_filter_narrows() {
        let items = sample();
        let v = view(
            &items,
            PlatformFilter::Only(Platform::Tiktok),
            "",
            SortKey::Velocity,
        );
        assert!(v.iter().all(|t| t.platform == Platform::Tiktok));
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn name_query_is_case_insensitive_containment() {
        let items = sample();
        let v = view(&items, PlatformFilter::All, "ledCOLLARS", SortKey::ProfitScore);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].name, "#LEDcollars");

        let v2 = view(&items, PlatformFilter::All, "sti", SortKey::ProfitScore);
        assert_eq!(v2.len(), 1);
        assert_eq!(v2[0].name, "#AIstickers");
    }

    #[test]
    fn ties_keep_input_order() {
        let items = vec![
            scored("#first", Platform::Tiktok, 100.0),
            scored("#second", Platform::Etsy, 100.0),
            scored("#third", Platform::Gumroad, 100.0),
        ];
        let v = view(&items, PlatformFilter::All, "", SortKey::Velocity);
        let names: Vec<_> = v.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["#first", "#second", "#third"]);
    }

    #[test]
    fn input_is_not_mutated() {
        let items = sample();
        let before = items.clone();
        let _ = view(&items, PlatformFilter::All, "", SortKey::Velocity);
        assert_eq!(items, before);
    }

    #[test]
    fn filter_parse_accepts_all_and_platforms() {
        assert_eq!(PlatformFilter::parse("all"), Some(PlatformFilter::All));
        assert_eq!(PlatformFilter::parse(""), Some(PlatformFilter::All));
        assert_eq!(
            PlatformFilter::parse("etsy"),
            Some(PlatformFilter::Only(Platform::Etsy))
        );
        assert_eq!(PlatformFilter::parse("myspace"), None);
    }
}
