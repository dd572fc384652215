//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the prerender proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Origin server the proxy fronts.
    pub origin: OriginConfig,

    /// Prerender middleware and request classification settings.
    pub prerender: PrerenderConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Origin server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OriginConfig {
    /// Origin authority (e.g., "127.0.0.1:3000"). Forwarded requests keep
    /// their method, headers, and body; only scheme and authority of the URI
    /// are rewritten to point here.
    pub address: String,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Prerender middleware and request classification configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PrerenderConfig {
    /// Base URL of the rendering middleware. The percent-encoded request URL
    /// is appended to this value verbatim, so a trailing slash matters.
    pub base_url: String,

    /// Intended ceiling on render attempts per request. The render loop
    /// counts the attempt before checking the ceiling and its continuation
    /// comparison runs in a direction that stops after the first pass, so in
    /// practice one attempt is made whatever the value; the construction is
    /// kept for compatibility with the behavior crawlers have always seen.
    pub max_attempts: u32,

    /// Crawler user-agent signatures, matched case-insensitively as
    /// substrings of the incoming User-Agent header.
    pub bot_agents: Vec<String>,

    /// Pattern classifying a URL as a static resource rather than a page.
    pub resource_pattern: String,
}

impl Default for PrerenderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://render-tron.appspot.com/render/".to_string(),
            max_attempts: 2,
            bot_agents: default_bot_agents(),
            resource_pattern: r"\.[a-zA-Z0-9]+$".to_string(),
        }
    }
}

/// Search crawlers, social link-preview fetchers, and SEO bots that get
/// prerendered HTML by default.
fn default_bot_agents() -> Vec<String> {
    [
        "googlebot",
        "adsbot-google",
        "feedfetcher-google",
        "bingbot",
        "whatsapp",
        "skype",
        "telegram",
        "yandex",
        "baiduspider",
        "facebot",
        "facebookexternalhit",
        "twitterbot",
        "rogerbot",
        "linkedinbot",
        "embedly",
        "quora link preview",
        "showyoubot",
        "outbrain",
        "pinterest",
        "slackbot",
        "vkshare",
        "w3c_validator",
        "flipboard",
        "tumblr",
        "bitlybot",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout for outbound calls in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Idle timeout for pooled outbound connections in seconds.
    pub idle_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
            idle_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
