//! BOHECO 2 bill-inquiry proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                 BILL PROXY                    │
//!   Frontend         │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!   ─────────────────┼─▶│  cors   │──▶│ handler  │──▶│  session  │──┼──▶ Upstream
//!   POST/OPTIONS     │  │         │   │          │   │ jar+client│  │   bill API
//!   /api/v1/bill     │  └─────────┘   └──────────┘   └───────────┘  │
//!   ◀────────────────┼── status + body relayed verbatim             │
//!                    │                                              │
//!                    │  config (MODE + env) · lifecycle · logging   │
//!                    └──────────────────────────────────────────────┘
//! ```

use clap::Parser;

use boheco2_proxy::config::{load_config, observability_from_env, Mode, ProcessEnv};
use boheco2_proxy::lifecycle;
use boheco2_proxy::observability::logging;

#[derive(Parser)]
#[command(name = "boheco2-proxy", version)]
#[command(about = "CORS and session proxy for the BOHECO 2 bill inquiry API", long_about = None)]
struct Cli {
    /// Runtime mode; only `production` requires the BOHECO2_* variables to be set.
    #[arg(long, env = "MODE")]
    mode: Option<String>,

    /// Resolve and validate the configuration, print it, then exit.
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mode = Mode::from_env_value(cli.mode.as_deref());
    let env = ProcessEnv;

    logging::init_logging(&observability_from_env(mode, &env))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        mode = %mode,
        "boheco2-proxy starting"
    );

    let config = match load_config(mode, &env) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    tracing::info!(
        port = config.listener.port,
        upstream = %config.upstream.base_url,
        allowed_origins = ?config.cors.allowed_origins,
        upstream_timeout_secs = config.upstream.timeout_secs,
        "Configuration loaded"
    );

    if cli.check_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    lifecycle::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
