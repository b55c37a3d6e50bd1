//! The bill-inquiry endpoint.

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::request::request_id;
use crate::http::response::ProxyError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::session::SessionError;

/// `OPTIONS /api/v1/bill`: the CORS middleware supplies the headers.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// `POST /api/v1/bill`: make sure a session exists, forward the body
/// unchanged and relay whatever the upstream answers.
pub async fn bill_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request_id(request.headers()).to_string();
    let method = request.method().to_string();

    tracing::info!(request_id = %request_id, method = %method, "Received bill request");

    let response = match forward(&state, request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                status = %e.status_code(),
                error = %e,
                "Bill request failed"
            );
            e.into_response()
        }
    };

    metrics::record_request(&method, response.status().as_u16(), start);
    response
}

async fn forward(state: &AppState, request: Request<Body>) -> Result<Response, ProxyError> {
    state
        .session
        .ensure_session()
        .await
        .map_err(ProxyError::SessionInit)?;

    let body = axum::body::to_bytes(request.into_body(), state.max_body_size)
        .await
        .map_err(ProxyError::RequestBody)?;

    let upstream = state
        .session
        .forward_bill(body)
        .await
        .map_err(ProxyError::Upstream)?;

    let status = upstream.status();
    let content_type = upstream.headers().get(header::CONTENT_TYPE).cloned();
    let body = upstream
        .bytes()
        .await
        .map_err(|e| ProxyError::Upstream(SessionError::Transport(e)))?;

    tracing::debug!(status = %status, bytes = body.len(), "Relaying upstream response");

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    if let Some(content_type) = content_type {
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    }
    Ok(response)
}
