//! Shared utilities for integration testing: mock upstreams and a proxy launcher.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use boheco2_proxy::config::{AllowedOrigins, ProxyConfig};
use boheco2_proxy::{HttpServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const FAR_FUTURE: &str = "Wed, 21 Oct 2099 07:28:00 GMT";
pub const LONG_AGO: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// How the mock upstream answers.
#[derive(Debug, Clone)]
pub struct Behaviour {
    pub session_status: u16,
    pub set_cookie: Option<String>,
    pub bill_status: u16,
    pub bill_body: String,
    pub bill_content_type: Option<&'static str>,
    pub bill_delay: Duration,
    /// Answer 401 to bill calls that carry no session cookie.
    pub require_cookie: bool,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            session_status: 200,
            set_cookie: Some(format!("session_token=abc; Path=/; Expires={FAR_FUTURE}")),
            bill_status: 200,
            bill_body: r#"{"balance":42}"#.to_string(),
            bill_content_type: Some("application/json"),
            bill_delay: Duration::ZERO,
            require_cookie: true,
        }
    }
}

/// A bill call as the upstream saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[derive(Debug)]
pub struct UpstreamState {
    behaviour: Behaviour,
    pub session_inits: AtomicUsize,
    pub bills: AtomicUsize,
    pub last_session_init: Mutex<Option<HeaderMap>>,
    pub last_bill: Mutex<Option<Recorded>>,
}

impl UpstreamState {
    pub fn session_inits(&self) -> usize {
        self.session_inits.load(Ordering::SeqCst)
    }

    pub fn bills(&self) -> usize {
        self.bills.load(Ordering::SeqCst)
    }

    pub fn last_bill(&self) -> Recorded {
        self.last_bill
            .lock()
            .unwrap()
            .clone()
            .expect("upstream saw no bill request")
    }
}

pub struct MockUpstream {
    pub addr: SocketAddr,
    pub state: Arc<UpstreamState>,
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Start an axum upstream implementing session-init and bill.
pub async fn start_upstream(behaviour: Behaviour) -> MockUpstream {
    let state = Arc::new(UpstreamState {
        behaviour,
        session_inits: AtomicUsize::new(0),
        bills: AtomicUsize::new(0),
        last_session_init: Mutex::new(None),
        last_bill: Mutex::new(None),
    });

    let app = Router::new()
        .route("/api/v1/session-init", get(session_init))
        .route("/api/v1/bill", post(bill))
        .with_state(Arc::clone(&state));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream { addr, state }
}

async fn session_init(State(state): State<Arc<UpstreamState>>, headers: HeaderMap) -> Response {
    state.session_inits.fetch_add(1, Ordering::SeqCst);
    *state.last_session_init.lock().unwrap() = Some(headers);

    let status = StatusCode::from_u16(state.behaviour.session_status).unwrap();
    let mut response = (status, r#"{"ok":true}"#).into_response();
    if let Some(cookie) = &state.behaviour.set_cookie {
        response
            .headers_mut()
            .insert(header::SET_COOKIE, cookie.parse().unwrap());
    }
    response
}

async fn bill(State(state): State<Arc<UpstreamState>>, headers: HeaderMap, body: Bytes) -> Response {
    state.bills.fetch_add(1, Ordering::SeqCst);
    let has_session = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|cookies| cookies.contains("session_token="))
        .unwrap_or(false);
    *state.last_bill.lock().unwrap() = Some(Recorded { headers, body });

    if !state.behaviour.bill_delay.is_zero() {
        tokio::time::sleep(state.behaviour.bill_delay).await;
    }

    if state.behaviour.require_cookie && !has_session {
        return (StatusCode::UNAUTHORIZED, "no session").into_response();
    }

    let status = StatusCode::from_u16(state.behaviour.bill_status).unwrap();
    let mut response = (status, state.behaviour.bill_body.clone()).into_response();
    match state.behaviour.bill_content_type {
        Some(content_type) => {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, content_type.parse().unwrap());
        }
        None => {
            response.headers_mut().remove(header::CONTENT_TYPE);
        }
    }
    response
}

/// Start a raw TCP upstream that issues a session on session-init but hangs
/// up on every bill request without answering.
pub async fn start_hangup_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = Vec::new();
                        let mut chunk = [0u8; 1024];
                        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                            match socket.read(&mut chunk).await {
                                Ok(0) | Err(_) => return,
                                Ok(n) => buf.extend_from_slice(&chunk[..n]),
                            }
                        }

                        if buf.starts_with(b"GET /api/v1/session-init") {
                            let response = "HTTP/1.1 200 OK\r\nSet-Cookie: session_token=abc; Path=/; Max-Age=3600\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
                            let _ = socket.write_all(response.as_bytes()).await;
                            let _ = socket.shutdown().await;
                        }
                        // Anything else: drop the socket unanswered.
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address nothing is listening on.
pub fn closed_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

pub struct RunningProxy {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

impl RunningProxy {
    pub fn bill_url(&self) -> String {
        format!("http://{}/api/v1/bill", self.addr)
    }
}

/// Config pointing at `base_url`, with the given allow-list.
pub fn proxy_config(base_url: &str, origins: &str) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_host = "127.0.0.1".into();
    config.upstream.base_url = base_url.to_string();
    config.upstream.timeout_secs = 5;
    config.cors.allowed_origins = AllowedOrigins::parse(origins);
    config.timeouts.shutdown_grace_secs = 5;
    config
}

/// Start the proxy on an ephemeral port.
pub async fn start_proxy(mut config: ProxyConfig) -> RunningProxy {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.port = addr.port();

    let server = HttpServer::new(config).unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(server.run(listener, server_shutdown));

    RunningProxy {
        addr,
        shutdown,
        handle,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
