//! Configuration for the analyzer and the HTTP boundary
//!
//! Everything is environment-driven (BYOE - bring your own endpoint); no
//! config files. Defaults match the published service behavior.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default minimum sanitized source length accepted for analysis.
pub const DEFAULT_MIN_SOURCE_LEN: usize = 100;
/// Default maximum sanitized source length (256 KB).
pub const DEFAULT_MAX_SOURCE_LEN: usize = 262_144;
/// Default result-cache time-to-live.
pub const DEFAULT_CACHE_TTL_MS: u64 = 5_000;
/// Default result-cache capacity.
pub const DEFAULT_CACHE_CAPACITY: usize = 25;
/// Default prediction-oracle timeout.
pub const DEFAULT_ORACLE_TIMEOUT_MS: u64 = 800;

/// Tunables for one [`crate::analyzer::Analyzer`] instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Remote prediction endpoint. `None` disables the oracle entirely.
    pub oracle_url: Option<String>,
    pub oracle_timeout_ms: u64,
    pub cache_ttl_ms: u64,
    pub cache_capacity: usize,
    pub min_source_len: usize,
    pub max_source_len: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            oracle_url: Some("http://localhost:8000/predict".to_string()),
            oracle_timeout_ms: DEFAULT_ORACLE_TIMEOUT_MS,
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            min_source_len: DEFAULT_MIN_SOURCE_LEN,
            max_source_len: DEFAULT_MAX_SOURCE_LEN,
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from the environment, falling back to defaults.
    ///
    /// Recognized variables: `CLARITYSCAN_ORACLE_URL` (empty string
    /// disables the oracle), `CLARITYSCAN_ORACLE_TIMEOUT_MS`,
    /// `CLARITYSCAN_CACHE_TTL_MS`, `CLARITYSCAN_CACHE_CAPACITY`,
    /// `CLARITYSCAN_MIN_LEN`, `CLARITYSCAN_MAX_LEN`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = env::var("CLARITYSCAN_ORACLE_URL") {
            config.oracle_url = if url.is_empty() { None } else { Some(url) };
        }
        if let Some(v) = parse_env("CLARITYSCAN_ORACLE_TIMEOUT_MS") {
            config.oracle_timeout_ms = v;
        }
        if let Some(v) = parse_env("CLARITYSCAN_CACHE_TTL_MS") {
            config.cache_ttl_ms = v;
        }
        if let Some(v) = parse_env("CLARITYSCAN_CACHE_CAPACITY") {
            config.cache_capacity = v;
        }
        if let Some(v) = parse_env("CLARITYSCAN_MIN_LEN") {
            config.min_source_len = v;
        }
        if let Some(v) = parse_env("CLARITYSCAN_MAX_LEN") {
            config.max_source_len = v;
        }
        config
    }

    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_millis(self.oracle_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }
}

/// Settings owned by the HTTP boundary, not the analysis core.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub port: u16,
    /// Shared secret expected in the `x-proxy-secret` header.
    pub api_secret: Option<String>,
    /// When false, the secret check is skipped entirely.
    pub enforce_auth: bool,
}

impl ServerConfig {
    pub fn from_env(port: u16) -> Self {
        Self {
            port,
            api_secret: env::var("CLARITYSCAN_API_SECRET").ok(),
            enforce_auth: env::var("CLARITYSCAN_ENFORCE_AUTH")
                .map(|v| v == "true")
                .unwrap_or(false),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.min_source_len, 100);
        assert_eq!(config.max_source_len, 262_144);
        assert_eq!(config.cache_capacity, 25);
        assert_eq!(config.cache_ttl(), Duration::from_millis(5_000));
        assert_eq!(config.oracle_timeout(), Duration::from_millis(800));
        assert!(config.oracle_url.is_some());
    }
}
