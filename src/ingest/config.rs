// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const ENV_PATH: &str = "INGEST_CONFIG_PATH";
pub const DEFAULT_REFRESH_SECS: u64 = 900;

/// One remote feed to poll for raw trend records.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedConfig {
    /// Display label for logs/metrics, e.g. "tiktok-trending".
    pub label: String,
    /// Endpoint returning a JSON array of raw trend records.
    pub url: String,
}

/// Ingest configuration: where to poll and how often. The bundled sample
/// feed is used whenever no feeds are configured, so a fresh checkout serves
/// data without any setup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub refresh_secs: u64,
    pub feeds: Vec<FeedConfig>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            refresh_secs: DEFAULT_REFRESH_SECS,
            feeds: Vec::new(),
        }
    }
}

/// Load ingest config from an explicit path. Supports TOML or JSON.
pub fn load_config_from(path: &Path) -> Result<IngestConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading ingest config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
}

/// Load ingest config using env var + fallbacks:
/// 1) $INGEST_CONFIG_PATH
/// 2) config/ingest.toml
/// 3) config/ingest.json
pub fn load_config_default() -> Result<IngestConfig> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_config_from(&pb);
        } else {
            return Err(anyhow!("INGEST_CONFIG_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/ingest.toml");
    if toml_p.exists() {
        return load_config_from(&toml_p);
    }
    let json_p = PathBuf::from("config/ingest.json");
    if json_p.exists() {
        return load_config_from(&json_p);
    }
    Ok(IngestConfig::default())
}

fn parse_config(s: &str, hint_ext: &str) -> Result<IngestConfig> {
    // Try TOML first if hinted or content looks like toml.
    let try_toml = hint_ext == "toml" || s.contains("[[feeds]]");
    if try_toml {
        if let Ok(v) = toml::from_str::<IngestConfig>(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = serde_json::from_str::<IngestConfig>(s) {
        return Ok(v);
    }
    if !try_toml {
        if let Ok(v) = toml::from_str::<IngestConfig>(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported ingest config format"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn toml_and_json_formats_parse() {
        let toml = r#"
refresh_secs = 300

[[feeds]]
label = "tiktok-trending"
url = "https://feeds.example.com/tiktok.json"
"#;
        let cfg = parse_config(toml, "toml").unwrap();
        assert_eq!(cfg.refresh_secs, 300);
        assert_eq!(cfg.feeds.len(), 1);
        assert_eq!(cfg.feeds[0].label, "tiktok-trending");

        let json = r#"{"refresh_secs": 120, "feeds": []}"#;
        let cfg2 = parse_config(json, "json").unwrap();
        assert_eq!(cfg2.refresh_secs, 120);
        assert!(cfg2.feeds.is_empty());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg = parse_config("{}", "json").unwrap();
        assert_eq!(cfg.refresh_secs, DEFAULT_REFRESH_SECS);
        assert!(cfg.feeds.is_empty());
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        // Isolate CWD in a temp dir so a real config/ in the repo can't interfere.
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();

        env::remove_var(ENV_PATH);

        // No files in the temp CWD: defaults.
        let v = load_config_default().unwrap();
        assert_eq!(v, IngestConfig::default());

        // Env var takes precedence.
        let p_json = tmp.path().join("ingest.json");
        fs::write(&p_json, r#"{"refresh_secs": 60}"#).unwrap();
        env::set_var(ENV_PATH, p_json.display().to_string());
        let v2 = load_config_default().unwrap();
        assert_eq!(v2.refresh_secs, 60);
        env::remove_var(ENV_PATH);

        env::set_current_dir(&old).unwrap();
    }
}
