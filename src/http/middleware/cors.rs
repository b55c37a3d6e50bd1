//! CORS middleware for the bill endpoint.
//! Echoes allowed origins and always advertises the accepted methods and headers.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::config::AllowedOrigins;
use crate::http::server::AppState;

const ALLOWED_METHODS: &str = "POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// Add CORS headers to every response, including errors and preflights.
pub async fn cors_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let origin = request.headers().get(header::ORIGIN).cloned();

    let mut response = next.run(request).await;
    apply_cors(response.headers_mut(), origin.as_ref(), &state.allowed_origins);
    response
}

/// Set the CORS response headers for a request carrying `origin`.
///
/// The origin is echoed only when the allow-list accepts it; the methods
/// and headers are set regardless.
pub fn apply_cors(headers: &mut HeaderMap, origin: Option<&HeaderValue>, allowed: &AllowedOrigins) {
    let echoed = origin.filter(|origin| {
        origin
            .to_str()
            .map(|o| !o.is_empty() && allowed.allows(o))
            .unwrap_or(false)
    });
    if let Some(origin) = echoed {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
    }

    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
}
