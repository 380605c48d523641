//! Semantic validation of a parsed configuration.
//!
//! Serde handles syntax; this checks the values make sense together and
//! reports every violation at once.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Validate a configuration, collecting all errors.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = url::Url::parse(&config.api.base_url) {
        errors.push(ValidationError::new("api.base_url", format!("invalid URL: {}", e)));
    }
    if config.api.api_key_header.trim().is_empty() {
        errors.push(ValidationError::new("api.api_key_header", "must not be empty"));
    }
    if config.api.timeout_secs == 0 {
        errors.push(ValidationError::new("api.timeout_secs", "must be greater than 0"));
    }

    if config.rate_limit.limit == 0 {
        errors.push(ValidationError::new("rate_limit.limit", "must be greater than 0"));
    }
    if config.rate_limit.window_ms == 0 {
        errors.push(ValidationError::new("rate_limit.window_ms", "must be greater than 0"));
    }

    if config.retries.max_retries == 0 {
        errors.push(ValidationError::new(
            "retries.max_retries",
            "must allow at least one attempt",
        ));
    }
    if config.retries.max_retry_delay_ms < config.retries.base_delay_ms {
        errors.push(ValidationError::new(
            "retries.max_retry_delay_ms",
            format!(
                "{} is below base_delay_ms ({})",
                config.retries.max_retry_delay_ms, config.retries.base_delay_ms
            ),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
