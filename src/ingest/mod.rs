// src/ingest/mod.rs
pub mod config;
pub mod providers;
pub mod scheduler;
pub mod types;

use crate::ingest::types::TrendProvider;
use crate::model::{Platform, TrendInput};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_records_total", "Raw records fetched from providers.");
        describe_counter!(
            "ingest_kept_total",
            "Records kept after parsing + validation."
        );
        describe_counter!(
            "ingest_rejected_total",
            "Malformed or invalid records discarded at the boundary."
        );
        describe_counter!(
            "ingest_dedup_total",
            "Records superseded by a later same-name record in the batch."
        );
        describe_counter!(
            "ingest_provider_errors_total",
            "Provider fetch/parse errors."
        );
        describe_histogram!("ingest_parse_ms", "Provider parse time in milliseconds.");
        describe_gauge!(
            "ingest_last_run_ts",
            "Unix ts when the ingest pipeline last ran."
        );
    });
}

/// Normalize a trend name scraped from a feed: decode HTML entities, strip
/// tags, collapse whitespace, cap length. Keeps the leading hashtag.
pub fn normalize_name(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out = out.trim().to_string();

    // 4) Length cap: 80 chars is plenty for a hashtag or listing title
    if out.chars().count() > 80 {
        out = out.chars().take(80).collect();
    }

    out
}

/// Parse one untyped record into a `TrendInput`, failing closed: any missing
/// field, unknown platform, or invalid numeric yields `None`.
pub fn parse_record(raw: &serde_json::Value) -> Option<TrendInput> {
    let name = normalize_name(raw.get("name")?.as_str()?);
    let platform = Platform::parse(raw.get("platform")?.as_str()?)?;

    let num = |key: &str| raw.get(key).and_then(serde_json::Value::as_f64);
    let input = TrendInput {
        name,
        platform,
        velocity: num("velocity")?,
        cogs: num("cogs")?,
        fees: num("fees")?,
        shipping: num("shipping")?,
    };
    input.validate().ok()?;
    Some(input)
}

/// Outcome of one typed-boundary pass over a raw batch.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchCounts {
    pub rejected: usize,
    pub deduped: usize,
}

/// Parse + validate + dedup a raw batch. Malformed records are skipped, not
/// fatal. Duplicate names collapse the way the store's upsert would: the
/// later record wins, keeping the earlier record's position.
pub fn parse_batch(raw: &[serde_json::Value]) -> (Vec<TrendInput>, BatchCounts) {
    let mut counts = BatchCounts::default();
    let mut kept: Vec<TrendInput> = Vec::with_capacity(raw.len());

    for value in raw {
        let Some(input) = parse_record(value) else {
            counts.rejected += 1;
            tracing::warn!(record = %value, "discarding malformed trend record");
            continue;
        };
        match kept.iter_mut().find(|t| t.name == input.name) {
            Some(slot) => {
                *slot = input;
                counts.deduped += 1;
            }
            None => kept.push(input),
        }
    }

    (kept, counts)
}

/// Run ingest once over the provided feeds. Returns the typed batch plus
/// reject/dedup counts; a failed provider yields no data for the cycle and
/// never aborts the run.
pub async fn run_once(providers: &[Box<dyn TrendProvider>]) -> (Vec<TrendInput>, BatchCounts) {
    ensure_metrics_described();

    let mut raw = Vec::new();
    for p in providers {
        match p.fetch_latest().await {
            Ok(mut v) => raw.append(&mut v),
            Err(e) => {
                tracing::warn!(error = ?e, provider = p.name(), "provider error");
                counter!("ingest_provider_errors_total").increment(1);
            }
        }
    }

    counter!("ingest_records_total").increment(raw.len() as u64);
    let (kept, counts) = parse_batch(&raw);

    // Telemetry
    counter!("ingest_kept_total").increment(kept.len() as u64);
    counter!("ingest_rejected_total").increment(counts.rejected as u64);
    counter!("ingest_dedup_total").increment(counts.deduped as u64);
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    gauge!("ingest_last_run_ts").set(now as f64);

    (kept, counts)
}
