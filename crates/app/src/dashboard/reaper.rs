use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use tracing::info;

use crate::dashboard::{
    data::{SessionRegistry, current_millis},
    telemetry::spawn_thread,
};

pub(crate) const REAPER_POLL_INTERVAL_MS: u64 = 500;
pub(crate) const REAPER_SWEEP_INTERVAL_MS: u64 = 10_000;

/// Periodically drop idle sessions until `shutdown` is raised.
pub(crate) fn spawn_session_reaper(
    sessions: Arc<SessionRegistry>,
    shutdown: Arc<AtomicBool>,
) -> io::Result<thread::JoinHandle<()>> {
    spawn_thread("atlas-session-reaper", move || {
        let mut last_sweep = current_millis();
        while !shutdown.load(Ordering::Relaxed) {
            thread::sleep(Duration::from_millis(REAPER_POLL_INTERVAL_MS));
            let now = current_millis();
            if now.saturating_sub(last_sweep) < REAPER_SWEEP_INTERVAL_MS {
                continue;
            }
            last_sweep = now;
            let evicted = sessions.evict_idle(now);
            if evicted > 0 {
                info!(
                    "Evicted {evicted} idle session(s); {} remain",
                    sessions.len()
                );
            }
        }
    })
}
