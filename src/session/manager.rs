//! Cookie-backed session with the upstream API.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::InvalidHeaderValue;
use reqwest::{Body, Client, Response, StatusCode};
use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::session::headers::SpoofedHeaders;
use crate::session::{BILL_PATH, SESSION_COOKIE, SESSION_INIT_PATH};

/// Errors raised while talking to the upstream.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid frontend origin: {0}")]
    InvalidOrigin(#[from] InvalidHeaderValue),

    #[error("failed to build upstream client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response (connect, TLS, timeout).
    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    /// Session-init answered, but not with a success status.
    #[error("session init returned {0}")]
    Rejected(StatusCode),
}

/// Owns the cookie jar and the client bound to it.
///
/// Cheap to share behind an `Arc`; the jar does its own locking.
#[derive(Debug)]
pub struct SessionManager {
    client: Client,
    jar: Arc<Jar>,
    session_init_url: Url,
    bill_url: Url,
    headers: SpoofedHeaders,
}

impl SessionManager {
    /// Build a manager for the configured upstream with an empty jar.
    pub fn new(config: &UpstreamConfig) -> Result<Self, SessionError> {
        let base = config.base_url.trim_end_matches('/');
        let session_init_url = Url::parse(&format!("{base}{SESSION_INIT_PATH}"))?;
        let bill_url = Url::parse(&format!("{base}{BILL_PATH}"))?;
        let headers = SpoofedHeaders::new(&config.frontend_origin)?;

        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(SessionError::Client)?;

        Ok(Self {
            client,
            jar,
            session_init_url,
            bill_url,
            headers,
        })
    }

    /// Whether the jar holds an unexpired session token for the bill endpoint.
    ///
    /// The jar drops cookies once their Expires/Max-Age has passed, so any
    /// token it still returns is valid.
    pub fn has_valid_token(&self) -> bool {
        let Some(cookies) = self.jar.cookies(&self.bill_url) else {
            return false;
        };
        let Ok(cookies) = cookies.to_str() else {
            return false;
        };

        cookies
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .any(|(name, value)| name == SESSION_COOKIE && !value.is_empty())
    }

    /// Call session-init so the jar picks up a fresh token.
    ///
    /// The response body is discarded. A transport failure or a non-2xx
    /// status is an error.
    pub async fn bootstrap(&self) -> Result<(), SessionError> {
        let start = Instant::now();
        tracing::debug!(url = %self.session_init_url, "Initialising upstream session");

        let response = self
            .client
            .get(self.session_init_url.clone())
            .headers(self.headers.session_init())
            .send()
            .await
            .map_err(|e| {
                metrics::record_bootstrap("transport_error", start);
                SessionError::Transport(e)
            })?;

        let status = response.status();
        if let Err(e) = response.bytes().await {
            tracing::debug!(error = %e, "Failed to drain session-init body");
        }

        if !status.is_success() {
            metrics::record_bootstrap("rejected", start);
            return Err(SessionError::Rejected(status));
        }

        metrics::record_bootstrap("ok", start);
        if self.has_valid_token() {
            tracing::info!(status = %status, "Upstream session established");
        } else {
            tracing::warn!(status = %status, "Session init succeeded without issuing a session token");
        }
        Ok(())
    }

    /// Bootstrap only when no valid token is held.
    pub async fn ensure_session(&self) -> Result<(), SessionError> {
        if self.has_valid_token() {
            return Ok(());
        }
        self.bootstrap().await
    }

    /// POST `body` unchanged to the upstream bill endpoint.
    pub async fn forward_bill(&self, body: impl Into<Body>) -> Result<Response, SessionError> {
        self.client
            .post(self.bill_url.clone())
            .headers(self.headers.bill())
            .body(body)
            .send()
            .await
            .map_err(SessionError::Transport)
    }

    pub fn bill_url(&self) -> &Url {
        &self.bill_url
    }
}
