//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_API_KEY: &str = "BOOKING_API_KEY";
pub const ENV_BASE_URL: &str = "BOOKING_API_BASE_URL";
pub const ENV_READ_ONLY: &str = "BOOKING_READ_ONLY";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Invalid value for {var}: '{value}' (expected true/false, 1/0, yes/no, on/off)")]
    InvalidEnv { var: &'static str, value: String },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, apply environment overrides, and validate a TOML config file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: GatewayConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build a config from defaults plus environment overrides only.
pub fn load_from_env() -> Result<GatewayConfig, ConfigError> {
    let mut config = GatewayConfig::default();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overlay secrets and deployment toggles from the environment.
///
/// The lookup is injected so tests never touch process-global state.
/// An unparseable read-only flag is an error, never silently ignored.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.is_empty()) {
        config.api.api_key = key;
    }
    if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
        config.api.base_url = url;
    }
    if let Some(flag) = lookup(ENV_READ_ONLY) {
        config.api.read_only = parse_flag(&flag).ok_or(ConfigError::InvalidEnv {
            var: ENV_READ_ONLY,
            value: flag,
        })?;
    }
    Ok(())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
