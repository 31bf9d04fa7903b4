//! Map dashboard service: loads the company dataset once and serves an
//! interactive, per-session filtered map over HTTP.
//!
//! The module is split into focused submodules:
//! - `config`: CLI configuration parsing.
//! - `service`: Startup, dataset loading and shutdown supervision.
//! - `data`: Session registry shared between handlers.
//! - `server`: Actix Web routes for the page, session API, SSE and metrics.
//! - `reaper`: Eviction of idle sessions.
//! - `telemetry`: Tracing subscriber and Prometheus recorder setup.

/// Re-export service settings so callers can configure runs without reaching
/// into submodules.
pub use config::DashboardConfig;
/// Launch the dashboard with a ready-made configuration.
pub use service::run;

mod config;
mod data;
mod reaper;
mod server;
mod service;
mod telemetry;

use anyhow::Result;

/// Parse `serve` arguments (`args[1]` is the subcommand) and run the service.
pub fn run_from_args(args: &[String]) -> Result<()> {
    let config = DashboardConfig::from_args(&args[1..])?;
    run(config)
}
