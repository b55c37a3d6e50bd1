//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the session manager produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and histograms)
//!
//! Consumers:
//!     → stdout (fmt in development, JSON lines in production)
//!     → Prometheus scrape endpoint (only when an address is configured)
//! ```
//!
//! # Design Decisions
//! - Request ID flows from the request-id layer into every request span
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
