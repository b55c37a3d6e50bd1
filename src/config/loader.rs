//! Configuration loading from the environment.

use std::collections::HashMap;
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::{AllowedOrigins, Mode, ObservabilityConfig, ProxyConfig};
use crate::config::validation::{validate_config, ValidationError};

pub const MODE: &str = "MODE";
pub const PORT: &str = "BOHECO2_PROXY_SERVER_PORT";
pub const API_BASE_URL: &str = "BOHECO2_API_BASE_URL";
pub const ALLOWED_ORIGINS: &str = "BOHECO2_PROXY_SERVER_ALLOWED_ORIGINS";
pub const FRONTEND_ORIGIN: &str = "BOHECO2_FRONTEND_ORIGIN";
pub const UPSTREAM_TIMEOUT_SECS: &str = "BOHECO2_UPSTREAM_TIMEOUT_SECS";
pub const REQUEST_TIMEOUT_SECS: &str = "BOHECO2_REQUEST_TIMEOUT_SECS";
pub const SHUTDOWN_GRACE_SECS: &str = "BOHECO2_SHUTDOWN_GRACE_SECS";
pub const MAX_BODY_BYTES: &str = "BOHECO2_MAX_BODY_BYTES";
pub const LOG_LEVEL: &str = "BOHECO2_LOG_LEVEL";
pub const METRICS_ADDRESS: &str = "BOHECO2_METRICS_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variables not set in {mode} mode: {}", .missing.join(", "))]
    Missing {
        mode: Mode,
        missing: Vec<&'static str>,
    },

    #[error("invalid value `{value}` for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Where configuration values come from.
pub trait EnvSource {
    /// Raw value for `key`, or `None` when unset.
    fn var(&self, key: &str) -> Option<String>;

    /// Value for `key`, treating an empty string the same as unset.
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key).filter(|value| !value.trim().is_empty())
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).map(|value| value.to_string())
    }
}

/// Resolve and validate the configuration for `mode`.
///
/// In production mode the port, upstream URL and allow-list must all be
/// present; in development mode each falls back to its default. The
/// remaining settings are optional in both modes.
pub fn load_config(mode: Mode, env: &impl EnvSource) -> Result<ProxyConfig, ConfigError> {
    let mut config = ProxyConfig {
        mode,
        ..ProxyConfig::default()
    };

    let port = env.non_empty(PORT);
    let base_url = env.non_empty(API_BASE_URL);
    let origins = env.non_empty(ALLOWED_ORIGINS);

    if mode.is_strict() {
        let missing: Vec<&'static str> = [(PORT, &port), (API_BASE_URL, &base_url), (ALLOWED_ORIGINS, &origins)]
            .into_iter()
            .filter(|(_, value)| value.is_none())
            .map(|(key, _)| key)
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing { mode, missing });
        }
    }

    if let Some(port) = port {
        config.listener.port = parse_value(PORT, &port)?;
    }
    if let Some(base_url) = base_url {
        config.upstream.base_url = base_url.trim().trim_end_matches('/').to_string();
    }
    if let Some(origins) = origins {
        config.cors.allowed_origins = AllowedOrigins::parse(&origins);
    }

    if let Some(origin) = env.non_empty(FRONTEND_ORIGIN) {
        config.upstream.frontend_origin = origin.trim().trim_end_matches('/').to_string();
    }
    if let Some(value) = env.non_empty(UPSTREAM_TIMEOUT_SECS) {
        config.upstream.timeout_secs = parse_value(UPSTREAM_TIMEOUT_SECS, &value)?;
    }
    if let Some(value) = env.non_empty(REQUEST_TIMEOUT_SECS) {
        config.timeouts.request_secs = parse_value(REQUEST_TIMEOUT_SECS, &value)?;
    }
    if let Some(value) = env.non_empty(SHUTDOWN_GRACE_SECS) {
        config.timeouts.shutdown_grace_secs = parse_value(SHUTDOWN_GRACE_SECS, &value)?;
    }
    if let Some(value) = env.non_empty(MAX_BODY_BYTES) {
        config.limits.max_body_size = parse_value(MAX_BODY_BYTES, &value)?;
    }
    config.observability = observability_from_env(mode, env);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Logging and metrics settings.
///
/// These never fail, so they can be resolved before the rest of the
/// configuration to get logging up first.
pub fn observability_from_env(mode: Mode, env: &impl EnvSource) -> ObservabilityConfig {
    let defaults = ObservabilityConfig::default();
    ObservabilityConfig {
        log_level: env
            .non_empty(LOG_LEVEL)
            .map(|level| level.trim().to_string())
            .unwrap_or(defaults.log_level),
        json_logs: mode.is_strict(),
        metrics_address: env.non_empty(METRICS_ADDRESS),
    }
}

fn parse_value<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
