//! Mapping proxy failures to client responses.
//!
//! # Design Decisions
//! - Upstream transport failures surface as 502 with the raw error text
//! - A failed session bootstrap is a 500; the bill request is never sent
//! - An unreadable inbound body is a 400
//! - Error text is returned to the caller; the only consumer is our frontend

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::session::SessionError;

/// Failures while handling a bill request.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Failed to init session: {0}")]
    SessionInit(#[source] SessionError),

    #[error("Failed to read request body: {0}")]
    RequestBody(#[source] axum::Error),

    #[error("{0}")]
    Upstream(#[source] SessionError),
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::SessionInit(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::RequestBody(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
