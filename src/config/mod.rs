//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! MODE + BOHECO2_* environment
//!     → loader.rs (strict or fallback resolution)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → handed to the session manager and HTTP server at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults so development mode needs no environment
//! - Production mode refuses to start without port, upstream and allow-list

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, observability_from_env, ConfigError, EnvSource, ProcessEnv};
pub use schema::{
    AllowedOrigins, CorsConfig, LimitsConfig, ListenerConfig, Mode, ObservabilityConfig,
    ProxyConfig, TimeoutConfig, UpstreamConfig,
};
pub use validation::ValidationError;
