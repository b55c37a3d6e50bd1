//! BOHECO 2 bill-inquiry proxy library.
//!
//! Forwards `POST /api/v1/bill` to the upstream bill API, keeping a
//! cookie-based upstream session alive and answering CORS for the frontend.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod session;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use session::SessionManager;
