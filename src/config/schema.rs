//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::http::request::ApiVersion;

/// Root configuration for the booking gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Upstream booking-platform API settings.
    pub api: ApiConfig,

    /// Fixed-window admission settings.
    pub rate_limit: RateLimitConfig,

    /// Retry configuration.
    pub retries: RetryConfig,

    /// Error classification settings.
    pub errors: ErrorConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Upstream API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API root, without version segment (e.g., "https://api.lodgify.com").
    pub base_url: String,

    /// API key sent on every request. Prefer the `BOOKING_API_KEY` env var.
    #[serde(skip_serializing)]
    pub api_key: String,

    /// Header carrying the API key.
    pub api_key_header: String,

    /// Version used when neither the caller nor the module picks one.
    pub default_version: ApiVersion,

    /// Reject POST/PUT/PATCH/DELETE before they reach the network.
    pub read_only: bool,

    /// Per-request transport timeout in seconds.
    pub timeout_secs: u64,

    /// User-Agent header value.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.lodgify.com".to_string(),
            api_key: String::new(),
            api_key_header: "X-ApiKey".to_string(),
            default_version: ApiVersion::V2,
            read_only: false,
            timeout_secs: 30,
            user_agent: concat!("booking-gateway/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Admissions allowed per window.
    pub limit: u32,

    /// Window length in milliseconds.
    pub window_ms: u64,

    /// Upper bound on the single wait taken when a call arrives over budget.
    pub backstop_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: 60,
            window_ms: 60_000,
            backstop_ms: 1_000,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Cap applied to every computed or server-directed delay.
    pub max_retry_delay_ms: u64,

    /// Add 0-10% jitter to computed backoff (never to server-directed waits).
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay_ms: 1_000,
            max_retry_delay_ms: 30_000,
            jitter: false,
        }
    }
}

/// Error classification configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ErrorConfig {
    /// Redact sensitive keys and key-like values in error details.
    pub sanitize: bool,

    /// Attach the `source()` chain of native errors to `detail.chain`.
    pub include_source_chain: bool,
}

impl Default for ErrorConfig {
    fn default() -> Self {
        Self {
            sanitize: true,
            include_source_chain: false,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
