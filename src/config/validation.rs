//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and referential shape (addresses, URLs, patterns)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before a config is accepted into the system

use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::uri::Authority;
use regex::Regex;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// Human-readable description of the problem.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address",
            message: format!(
                "not a valid socket address: {:?}",
                config.listener.bind_address
            ),
        });
    }

    if Authority::from_str(&config.origin.address).is_err() {
        errors.push(ValidationError {
            field: "origin.address",
            message: format!("not a valid authority: {:?}", config.origin.address),
        });
    }

    match Url::parse(&config.prerender.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError {
            field: "prerender.base_url",
            message: format!("unsupported scheme {:?}", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError {
            field: "prerender.base_url",
            message: e.to_string(),
        }),
    }

    // The render loop counts an attempt before checking the ceiling; a zero
    // ceiling would never let the continuation check terminate on failure.
    if config.prerender.max_attempts == 0 {
        errors.push(ValidationError {
            field: "prerender.max_attempts",
            message: "must be at least 1".to_string(),
        });
    }

    for (index, agent) in config.prerender.bot_agents.iter().enumerate() {
        if agent.trim().is_empty() {
            errors.push(ValidationError {
                field: "prerender.bot_agents",
                message: format!("entry {} is empty and would match every user agent", index),
            });
        }
    }

    if let Err(e) = Regex::new(&config.prerender.resource_pattern) {
        errors.push(ValidationError {
            field: "prerender.resource_pattern",
            message: e.to_string(),
        });
    }

    if config.timeouts.connect_secs == 0 || config.timeouts.request_secs == 0 {
        errors.push(ValidationError {
            field: "timeouts",
            message: "connect_secs and request_secs must be greater than zero".to_string(),
        });
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError {
            field: "observability.metrics_address",
            message: format!(
                "not a valid socket address: {:?}",
                config.observability.metrics_address
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
