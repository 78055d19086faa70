//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;

/// Default static routes pre-cached on worker install.
pub const DEFAULT_STATIC_ASSETS: &[&str] = &["/", "/jobs", "/offline", "/manifest.json"];

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Origin of the job board (pages, assets and REST API)
    pub upstream_url: String,
    /// Upstream request timeout in seconds
    pub upstream_timeout: u64,
    /// Default TTL in milliseconds for API cache entries without explicit TTL
    pub default_ttl_ms: u64,
    /// API cache cleanup interval in seconds
    pub cleanup_interval: u64,
    /// Suffix stamped on cache partition names
    pub cache_version: String,
    /// Routes pre-cached into the static partition on install
    pub static_assets: Vec<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `UPSTREAM_URL` - Job board origin (default: http://127.0.0.1:8080)
    /// - `UPSTREAM_TIMEOUT` - Upstream timeout in seconds (default: 30)
    /// - `DEFAULT_TTL_MS` - Default API cache TTL in ms (default: 300000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 300)
    /// - `CACHE_VERSION` - Partition name suffix (default: v1)
    /// - `STATIC_ASSETS` - Comma separated routes to pre-cache
    ///
    /// Zero is rejected for `UPSTREAM_TIMEOUT`, `DEFAULT_TTL_MS` and
    /// `CLEANUP_INTERVAL`; the default is used instead.
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Builds a Config from any variable source, falling back to defaults
    /// for missing or invalid values.
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            server_port: parse_var(&var, "SERVER_PORT").unwrap_or(defaults.server_port),
            upstream_url: var("UPSTREAM_URL").unwrap_or(defaults.upstream_url),
            upstream_timeout: parse_positive(&var, "UPSTREAM_TIMEOUT")
                .unwrap_or(defaults.upstream_timeout),
            default_ttl_ms: parse_positive(&var, "DEFAULT_TTL_MS")
                .unwrap_or(defaults.default_ttl_ms),
            cleanup_interval: parse_positive(&var, "CLEANUP_INTERVAL")
                .unwrap_or(defaults.cleanup_interval),
            cache_version: var("CACHE_VERSION")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.cache_version),
            static_assets: var("STATIC_ASSETS")
                .map(|v| split_list(&v))
                .filter(|list| !list.is_empty())
                .unwrap_or(defaults.static_assets),
        }
    }

    /// Name of the static asset partition for this version.
    pub fn static_cache_name(&self) -> String {
        format!("job-app-static-{}", self.cache_version)
    }

    /// Name of the dynamic (API + images) partition for this version.
    pub fn dynamic_cache_name(&self) -> String {
        format!("job-app-dynamic-{}", self.cache_version)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            upstream_url: "http://127.0.0.1:8080".to_string(),
            upstream_timeout: 30,
            default_ttl_ms: 5 * 60 * 1000,
            cleanup_interval: 5 * 60,
            cache_version: "v1".to_string(),
            static_assets: DEFAULT_STATIC_ASSETS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(var: impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    var(name).and_then(|v| v.trim().parse().ok())
}

fn parse_positive(var: impl Fn(&str) -> Option<String>, name: &str) -> Option<u64> {
    parse_var(var, name).filter(|v: &u64| *v > 0)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
