//! Upstream session subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound bill request
//!     → manager.rs has_valid_token (cookie jar lookup, no I/O)
//!     → manager.rs bootstrap (GET session-init, jar absorbs Set-Cookie)
//!     → manager.rs forward_bill (POST bill, cookies attached by the client)
//! ```
//!
//! # Design Decisions
//! - One jar and one client per `SessionManager`, built explicitly at startup
//! - The jar is internally synchronised; concurrent bootstraps are tolerated
//!   and the last Set-Cookie wins
//! - Outbound calls carry spoofed frontend headers (headers.rs)

pub mod headers;
pub mod manager;

pub use manager::{SessionError, SessionManager};

/// Name of the cookie the upstream issues on session-init.
pub const SESSION_COOKIE: &str = "session_token";

/// Upstream path that issues a session cookie.
pub const SESSION_INIT_PATH: &str = "/api/v1/session-init";

/// Upstream (and local) bill-inquiry path.
pub const BILL_PATH: &str = "/api/v1/bill";
