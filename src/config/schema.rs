//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! Every section has a `Default` that matches development mode, so the
//! loader only has to override what the environment actually provides.

use serde::{Deserialize, Serialize};

/// Default upstream used when development mode has no override.
pub const DEFAULT_API_BASE_URL: &str = "https://bill-inquiry-api.onrender.com";

/// Origin the upstream expects bill requests to come from.
pub const DEFAULT_FRONTEND_ORIGIN: &str = "https://www.boheco2.com.ph";

/// Runtime mode selected by `MODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Every setting falls back to a built-in default.
    #[default]
    Development,
    /// Required settings must come from the environment.
    Production,
}

impl Mode {
    /// Resolve the mode from the raw `MODE` value.
    ///
    /// Only the exact value `production` selects strict mode; anything else,
    /// including an unset or differently cased value, runs in development.
    pub fn from_env_value(raw: Option<&str>) -> Self {
        match raw {
            Some("production") => Mode::Production,
            _ => Mode::Development,
        }
    }

    pub fn is_strict(self) -> bool {
        self == Mode::Production
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Development => write!(f, "development"),
            Mode::Production => write!(f, "production"),
        }
    }
}

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Mode the configuration was resolved in.
    pub mode: Mode,

    /// Listener configuration (port, bind host).
    pub listener: ListenerConfig,

    /// Upstream bill-inquiry API.
    pub upstream: UpstreamConfig,

    /// CORS allow-list.
    pub cors: CorsConfig,

    /// Inbound timeouts and shutdown drain window.
    pub timeouts: TimeoutConfig,

    /// Inbound request limits.
    pub limits: LimitsConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host part of the bind address.
    pub bind_host: String,

    /// TCP port to listen on.
    pub port: u16,
}

impl ListenerConfig {
    /// Full `host:port` bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Upstream API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the bill-inquiry API, without a trailing slash.
    pub base_url: String,

    /// Origin and Referer presented to the upstream.
    pub frontend_origin: String,

    /// Total timeout for a single outbound request in seconds.
    pub timeout_secs: u64,

    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            frontend_origin: DEFAULT_FRONTEND_ORIGIN.to_string(),
            timeout_secs: 10,
            connect_timeout_secs: 5,
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: AllowedOrigins,
}

/// Frontend origins permitted to receive CORS approval.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AllowedOrigins {
    /// `*`: every origin is echoed back.
    #[default]
    Any,
    /// Exact-match list.
    List(Vec<String>),
}

impl AllowedOrigins {
    /// Parse the comma-separated allow-list. A bare `*` means any origin.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw == "*" {
            return AllowedOrigins::Any;
        }

        AllowedOrigins::List(
            raw.split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Whether `origin` may be echoed in `Access-Control-Allow-Origin`.
    pub fn allows(&self, origin: &str) -> bool {
        match self {
            AllowedOrigins::Any => true,
            AllowedOrigins::List(origins) => origins.iter().any(|o| o == origin),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, AllowedOrigins::List(origins) if origins.is_empty())
    }
}

/// Timeout configuration for the inbound side.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// How long in-flight requests may drain after a shutdown signal.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 15,
            shutdown_grace_secs: 30,
        }
    }
}

/// Inbound request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum body size buffered for forwarding, in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,

    /// Prometheus exporter bind address; disabled when `None`.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_address: None,
        }
    }
}
