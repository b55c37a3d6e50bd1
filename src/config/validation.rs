//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (the loader handles parsing)
//! - Validate value ranges (timeouts > 0, port non-zero)
//! - Keep the outbound timeout inside the inbound one so slow upstreams
//!   surface as 502 rather than a bare 408
//! - Check the upstream URL is something the client can call
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with a resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listen port must be non-zero")]
    ZeroPort,

    #[error("upstream base URL `{url}` is invalid: {reason}")]
    InvalidUpstreamUrl { url: String, reason: String },

    #[error("frontend origin `{0}` is not an absolute http(s) URL")]
    InvalidFrontendOrigin(String),

    #[error("allowed origins list is empty")]
    EmptyAllowList,

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),

    #[error("upstream timeout ({upstream}s) must be shorter than the request timeout ({request}s)")]
    UpstreamOutlivesRequest { upstream: u64, request: u64 },
}

/// Check a resolved configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    if let Err(reason) = check_http_url(&config.upstream.base_url) {
        errors.push(ValidationError::InvalidUpstreamUrl {
            url: config.upstream.base_url.clone(),
            reason,
        });
    }

    if check_http_url(&config.upstream.frontend_origin).is_err() {
        errors.push(ValidationError::InvalidFrontendOrigin(
            config.upstream.frontend_origin.clone(),
        ));
    }

    if config.cors.allowed_origins.is_empty() {
        errors.push(ValidationError::EmptyAllowList);
    }

    let non_zero = [
        ("upstream timeout", config.upstream.timeout_secs as usize),
        ("upstream connect timeout", config.upstream.connect_timeout_secs as usize),
        ("request timeout", config.timeouts.request_secs as usize),
        ("max body size", config.limits.max_body_size),
    ];
    for (name, value) in non_zero {
        if value == 0 {
            errors.push(ValidationError::ZeroValue(name));
        }
    }

    let (upstream, request) = (config.upstream.timeout_secs, config.timeouts.request_secs);
    if request > 0 && upstream >= request {
        errors.push(ValidationError::UpstreamOutlivesRequest { upstream, request });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_http_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme `{}`", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::AllowedOrigins;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate_config(&ProxyConfig::default()), Ok(()));
    }

    #[test]
    fn collects_every_error() {
        let mut config = ProxyConfig::default();
        config.listener.port = 0;
        config.upstream.base_url = "ftp://bills.example".into();
        config.cors.allowed_origins = AllowedOrigins::List(Vec::new());
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroPort));
        assert!(errors.contains(&ValidationError::EmptyAllowList));
        assert!(errors.contains(&ValidationError::ZeroValue("request timeout")));
        assert!(matches!(
            errors[1],
            ValidationError::InvalidUpstreamUrl { ref url, .. } if url == "ftp://bills.example"
        ));
    }

    #[test]
    fn upstream_timeout_must_fit_inside_request_timeout() {
        let mut config = ProxyConfig::default();
        config.upstream.timeout_secs = 15;
        config.timeouts.request_secs = 15;

        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::UpstreamOutlivesRequest {
                upstream: 15,
                request: 15,
            }])
        );

        config.upstream.timeout_secs = 14;
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn relative_upstream_is_rejected() {
        let mut config = ProxyConfig::default();
        config.upstream.base_url = "/api".into();
        assert!(validate_config(&config).is_err());
    }
}
