//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router for the bill endpoint
//! - Wire up middleware (tracing, request ID, timeout, CORS)
//! - Bind server to listener
//! - Drain in-flight requests on shutdown, bounded by the grace period

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Request,
    middleware,
    routing::post,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, oneshot};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{AllowedOrigins, ProxyConfig};
use crate::http::handler::{bill_handler, preflight};
use crate::http::middleware::cors_middleware;
use crate::http::request::{request_id, MakeRequestUuidV4};
use crate::session::{SessionError, SessionManager, BILL_PATH};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionManager>,
    pub allowed_origins: Arc<AllowedOrigins>,
    pub max_body_size: usize,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    session: Arc<SessionManager>,
}

impl HttpServer {
    /// Create a new HTTP server with a fresh upstream session.
    pub fn new(config: ProxyConfig) -> Result<Self, SessionError> {
        let session = Arc::new(SessionManager::new(&config.upstream)?);
        Ok(Self::with_session(config, session))
    }

    /// Create a server around an existing session manager.
    pub fn with_session(config: ProxyConfig, session: Arc<SessionManager>) -> Self {
        let state = AppState {
            session: Arc::clone(&session),
            allowed_origins: Arc::new(config.cors.allowed_origins.clone()),
            max_body_size: config.limits.max_body_size,
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            session,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        // CORS sits outside the timeout so a 408 still carries the headers.
        Router::new()
            .route(BILL_PATH, post(bill_handler).options(preflight))
            .with_state(state.clone())
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn_with_state(state, cors_middleware))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id(request.headers()),
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// Run the server until `shutdown` fires, then drain.
    ///
    /// In-flight requests get `timeouts.shutdown_grace_secs` to finish;
    /// after that the server stops waiting for them.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        let grace = Duration::from_secs(self.config.timeouts.shutdown_grace_secs);
        let (draining_tx, draining_rx) = oneshot::channel::<()>();

        let serve = axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
                let _ = draining_tx.send(());
            })
            .into_future();
        tokio::pin!(serve);

        tokio::select! {
            result = &mut serve => {
                result?;
                tracing::info!("HTTP server stopped");
                return Ok(());
            }
            _ = draining_rx => {}
        }

        match tokio::time::timeout(grace, serve).await {
            Ok(result) => {
                result?;
                tracing::info!("HTTP server stopped gracefully");
            }
            Err(_) => {
                tracing::warn!(
                    grace_secs = grace.as_secs(),
                    "Drain window elapsed, forcing shutdown"
                );
            }
        }
        Ok(())
    }

    /// The router, for driving the server without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// The upstream session shared by all requests.
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }
}
