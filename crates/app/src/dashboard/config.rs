//! Configuration parsing for the dashboard service.
//!
//! This module owns translation of CLI arguments (and their `ATLAS_*`
//! environment fallbacks) into a validated `DashboardConfig`.

use std::{path::PathBuf, time::Duration};

use anyhow::{Result, anyhow, bail};
use atlas_core::{GeoPoint, Viewport, controller::MAX_ZOOM};
use clap::{Args, Parser, error::ErrorKind};

const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;

#[derive(Clone, Debug)]
/// Canonical configuration shared by the loader, the server and the reaper.
pub struct DashboardConfig {
    /// CSV file holding the company listing.
    pub dataset_path: PathBuf,
    /// Interface the HTTP server binds to.
    pub bind: String,
    pub port: u16,
    /// Map centre and zoom used on first load and on explicit reset.
    pub home: Viewport,
    /// Sessions idle for longer than this are dropped.
    pub session_ttl: Duration,
    /// Emit debug logging (dropped rows, applied events).
    pub verbose: bool,
    pub telemetry: TelemetryOptions,
}

#[derive(Clone, Debug, Default)]
/// Optional telemetry knobs for tracing output.
pub struct TelemetryOptions {
    /// Write a Chrome trace JSON file capturing request and recompute spans.
    pub chrome_trace_path: Option<PathBuf>,
}

/// CLI arguments accepted by the `serve` subcommand.
#[derive(Debug, Args)]
pub struct DashboardCliArgs {
    /// Dataset CSV path.
    #[arg(value_name = "DATASET")]
    pub dataset: Option<PathBuf>,
    /// Dataset CSV path flag (overrides positional).
    #[arg(long = "dataset", value_name = "PATH", env = "ATLAS_DATASET")]
    pub dataset_flag: Option<PathBuf>,
    /// Address to bind the HTTP server to.
    #[arg(long, value_name = "ADDR", env = "ATLAS_BIND", default_value = "0.0.0.0")]
    pub bind: String,
    /// Port to bind the HTTP server to.
    #[arg(long, value_name = "PORT", env = "ATLAS_PORT", default_value_t = 8080)]
    pub port: u16,
    /// Latitude of the map's home centre.
    #[arg(long = "center-lat", value_name = "DEG", env = "ATLAS_CENTER_LAT", allow_negative_numbers = true)]
    pub center_lat: Option<f64>,
    /// Longitude of the map's home centre.
    #[arg(long = "center-lon", value_name = "DEG", env = "ATLAS_CENTER_LON", allow_negative_numbers = true)]
    pub center_lon: Option<f64>,
    /// Zoom level of the map's home view.
    #[arg(long, value_name = "LEVEL", env = "ATLAS_ZOOM")]
    pub zoom: Option<u8>,
    /// Idle session lifetime in seconds.
    #[arg(long = "session-ttl", value_name = "SECS", env = "ATLAS_SESSION_TTL")]
    pub session_ttl: Option<u64>,
    /// Enable verbose logging.
    #[arg(long = "verbose", action = clap::ArgAction::SetTrue)]
    pub verbose: bool,
    /// Emit Chrome trace JSON for post-mortem analysis.
    #[arg(long = "chrome-trace", value_name = "PATH", env = "ATLAS_CHROME_TRACE")]
    pub chrome_trace: Option<PathBuf>,
}

/// Top-level parser for `company-atlas serve ...`.
#[derive(Debug, Parser)]
#[command(name = "company-atlas serve", about = "Serve the company map dashboard")]
pub struct ServeCommand {
    #[command(flatten)]
    pub args: DashboardCliArgs,
}

impl TryFrom<DashboardCliArgs> for DashboardConfig {
    type Error = anyhow::Error;

    fn try_from(args: DashboardCliArgs) -> Result<Self> {
        let dataset_path = args.dataset_flag.or(args.dataset).ok_or_else(|| {
            anyhow!("Missing dataset. Provide --dataset <path> or positional <dataset>.")
        })?;

        if args.port == 0 {
            bail!("--port must be between 1 and 65535");
        }

        let fallback = Viewport::CAMBRIDGE;
        let lat = args.center_lat.unwrap_or(fallback.center.lat);
        let lon = args.center_lon.unwrap_or(fallback.center.lon);
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            bail!("--center-lat must be between -90 and 90");
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            bail!("--center-lon must be between -180 and 180");
        }
        let zoom = args.zoom.unwrap_or(fallback.zoom);
        if zoom > MAX_ZOOM {
            bail!("--zoom must be at most {MAX_ZOOM}");
        }

        let ttl_secs = args.session_ttl.unwrap_or(DEFAULT_SESSION_TTL_SECS);
        if ttl_secs == 0 {
            bail!("--session-ttl must be at least 1 second");
        }

        Ok(Self {
            dataset_path,
            bind: args.bind,
            port: args.port,
            home: Viewport {
                center: GeoPoint::new(lat, lon),
                zoom,
            },
            session_ttl: Duration::from_secs(ttl_secs),
            verbose: args.verbose,
            telemetry: TelemetryOptions {
                chrome_trace_path: args.chrome_trace,
            },
        })
    }
}

impl DashboardConfig {
    /// Parse `serve` arguments; `args[0]` is the subcommand name.
    pub fn from_args(args: &[String]) -> Result<Self> {
        let command = match ServeCommand::try_parse_from(args) {
            Ok(command) => command,
            Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                err.exit()
            }
            Err(err) => return Err(err.into()),
        };
        Self::try_from(command.args)
    }
}
