//! Service supervisor: loads the reference data, starts the HTTP server and
//! the session reaper, and tears both down on Ctrl+C.

use std::{
    sync::{
        Arc, Once,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use anyhow::{Context, Result, bail};
use atlas_core::{CategoryPalette, RecordStore, ReferenceData};
use tracing::{info, info_span, warn};

use crate::dashboard::{
    DashboardConfig,
    data::SessionRegistry,
    reaper::spawn_session_reaper,
    server::spawn_dashboard_server,
    telemetry,
};

const SHUTDOWN_POLL_INTERVAL_MS: u64 = 200;

/// Run the dashboard until interrupted.
pub fn run(config: DashboardConfig) -> Result<()> {
    static CTRL_HANDLER: Once = Once::new();

    let _telemetry = telemetry::install(&config.telemetry, config.verbose);
    telemetry::init_metrics_recorder();

    let data = Arc::new(load_reference_data(&config)?);
    let sessions = Arc::new(SessionRegistry::new(data, config.session_ttl));

    let shutdown = Arc::new(AtomicBool::new(false));
    let handler_shutdown = shutdown.clone();
    CTRL_HANDLER.call_once(move || {
        if let Err(err) = ctrlc::set_handler(move || {
            handler_shutdown.store(true, Ordering::SeqCst);
        }) {
            warn!("Failed to install Ctrl+C handler: {err}");
        }
    });

    let server = spawn_dashboard_server(sessions.clone(), &config.bind, config.port)?;
    let reaper = spawn_session_reaper(sessions.clone(), shutdown.clone())
        .context("Failed to spawn session reaper thread")?;
    info!(
        "Dashboard listening on http://{}:{} ({} companies)",
        config.bind,
        config.port,
        sessions.reference_data().store.len()
    );

    while !shutdown.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(SHUTDOWN_POLL_INTERVAL_MS));
    }

    info!("Shutting down dashboard");
    server.stop();
    let _ = reaper.join();
    Ok(())
}

/// Read and clean the dataset; any failure here is fatal for the service.
pub(crate) fn load_reference_data(config: &DashboardConfig) -> Result<ReferenceData> {
    let span = info_span!("load_dataset", path = %config.dataset_path.display());
    let _entered = span.enter();

    let rows = dataset_ingest::read_rows(&config.dataset_path).with_context(|| {
        format!(
            "Failed to load dataset {}",
            config.dataset_path.display()
        )
    })?;
    let total_rows = rows.len();
    let store = RecordStore::from_rows(rows);
    if store.is_empty() {
        bail!(
            "Dataset {} contains no mappable records ({} rows read)",
            config.dataset_path.display(),
            total_rows
        );
    }

    metrics::counter!("atlas_rows_dropped_total").increment(store.dropped() as u64);
    let counts = store.category_counts();
    info!(
        "Loaded {} companies ({} life sciences, {} technology, {} other); skipped {} unmappable rows",
        store.len(),
        counts.life_sciences,
        counts.technology,
        counts.other,
        store.dropped()
    );

    Ok(ReferenceData::new(
        store,
        CategoryPalette::default(),
        config.home,
    ))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::dashboard::config::TelemetryOptions;
    use atlas_core::Viewport;

    const HEADER: &str = "Business Name,Business Type,Address,City,State,Zip Code,Business Description,Website,Year Established,Longitude,Latitude";

    fn config_for(path: &std::path::Path) -> DashboardConfig {
        DashboardConfig {
            dataset_path: path.to_path_buf(),
            bind: "127.0.0.1".into(),
            port: 8080,
            home: Viewport::CAMBRIDGE,
            session_ttl: Duration::from_secs(60),
            verbose: false,
            telemetry: TelemetryOptions::default(),
        }
    }

    #[test]
    fn loads_and_cleans_dataset() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "Acme Bio,Life Sciences,1 Main St,Cambridge,MA,02139,,,,-71.09,42.36").unwrap();
        writeln!(file, "Ghost Tech,Technology,,,,,,,,,").unwrap();
        file.flush().unwrap();

        let data = load_reference_data(&config_for(file.path())).unwrap();
        assert_eq!(data.store.len(), 1);
        assert_eq!(data.store.dropped(), 1);
        assert_eq!(data.home, Viewport::CAMBRIDGE);
    }

    #[test]
    fn missing_dataset_is_fatal_with_context() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_reference_data(&config_for(&dir.path().join("nope.csv"))).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to load dataset"));
    }

    #[test]
    fn dataset_without_mappable_rows_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "Ghost Tech,Technology,,,,,,,,0,0").unwrap();
        file.flush().unwrap();

        let err = load_reference_data(&config_for(file.path())).unwrap_err();
        assert!(err.to_string().contains("no mappable records"));
    }
}
