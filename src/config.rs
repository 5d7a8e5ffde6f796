//! Environment configuration for the `zgs-node` tool

use std::env;
use std::time::Duration;

use crate::provider::ProviderOptions;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);
const DEFAULT_MAX_IDLE_CONNECTIONS: usize = 32;

/// Settings for the `zgs-node` tool, read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Node endpoints from `ZGS_NODE_URLS`, in order
    pub node_urls: Vec<String>,
    /// Per-request timeout, `None` when disabled
    pub request_timeout: Option<Duration>,
    /// Retries for failed transport attempts
    pub retry_count: usize,
    /// Pause between retries
    pub retry_interval: Duration,
    /// Idle pooled connections kept per node
    pub max_idle_connections: usize,
}

impl Config {
    /// Load settings from `ZGS_*` variables
    ///
    /// Only `ZGS_NODE_URLS` is required; unparsable optional values fall back
    /// to their defaults.
    pub fn from_env() -> Result<Self, String> {
        let node_urls: Vec<String> = env::var("ZGS_NODE_URLS")
            .map_err(|_| "ZGS_NODE_URLS environment variable must be set".to_string())?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        if node_urls.is_empty() {
            return Err("ZGS_NODE_URLS must contain at least one URL".to_string());
        }

        // A zero timeout disables it
        let request_timeout = match env::var("ZGS_REQUEST_TIMEOUT").ok().and_then(|s| parse_duration(&s)) {
            Some(d) if d.is_zero() => None,
            Some(d) => Some(d),
            None => Some(DEFAULT_REQUEST_TIMEOUT),
        };

        let retry_count = env::var("ZGS_RETRY_COUNT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0);

        let retry_interval = env::var("ZGS_RETRY_INTERVAL")
            .ok()
            .and_then(|s| parse_duration(&s))
            .unwrap_or(DEFAULT_RETRY_INTERVAL);

        let max_idle_connections = env::var("ZGS_MAX_IDLE_CONNECTIONS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_IDLE_CONNECTIONS);

        Ok(Config {
            node_urls,
            request_timeout,
            retry_count,
            retry_interval,
            max_idle_connections,
        })
    }

    /// Options for each node's [`crate::HttpProvider`]
    pub fn provider_options(&self) -> ProviderOptions {
        ProviderOptions {
            request_timeout: self.request_timeout,
            retry_count: self.retry_count,
            retry_interval: self.retry_interval,
            max_idle_connections_per_host: self.max_idle_connections,
        }
    }
}

/// Parse duration string (supports: 500ms, 30s, 2m, 1h, or plain milliseconds)
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim().to_lowercase();
    let (num_str, unit_ms): (&str, u64) = if let Some(n) = s.strip_suffix("ms") {
        (n, 1)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1000)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60 * 1000)
    } else if let Some(n) = s.strip_suffix('h') {
        (n, 60 * 60 * 1000)
    } else {
        (s.as_str(), 1)
    };

    num_str
        .trim()
        .parse::<u64>()
        .ok()
        .map(|n| Duration::from_millis(n.saturating_mul(unit_ms)))
}
