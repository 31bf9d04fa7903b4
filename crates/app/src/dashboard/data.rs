//! Session registry shared between HTTP handlers and the reaper.
//!
//! Each browser session owns its own `Controller`; the canonical records are
//! shared read-only through one `Arc<ReferenceData>`. All mutations go through
//! the registry lock, so events are applied one at a time.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

use atlas_core::{Controller, ControllerError, DashboardView, ReferenceData, UiEvent};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info_span};
use uuid::Uuid;

pub(crate) type SessionId = Uuid;

struct SessionEntry {
    controller: Controller,
    last_seen_ms: u64,
}

#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error("unknown session {0}")]
    NotFound(SessionId),
    #[error(transparent)]
    Rejected(#[from] ControllerError),
}

/// Request body for the events endpoint: one event or an ordered batch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum EventPayload {
    Single(UiEvent),
    Batch(Vec<UiEvent>),
}

impl EventPayload {
    pub(crate) fn into_events(self) -> Vec<UiEvent> {
        match self {
            EventPayload::Single(event) => vec![event],
            EventPayload::Batch(events) => events,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct SessionCreated {
    pub(crate) session_id: SessionId,
    pub(crate) view: DashboardView,
}

#[derive(Serialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: String,
}

pub(crate) struct SessionRegistry {
    data: Arc<ReferenceData>,
    ttl: Duration,
    sessions: Mutex<HashMap<SessionId, SessionEntry>>,
}

impl SessionRegistry {
    pub(crate) fn new(data: Arc<ReferenceData>, ttl: Duration) -> Self {
        Self {
            data,
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn reference_data(&self) -> &ReferenceData {
        &self.data
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a session with default filters and return its first view.
    pub(crate) fn create(&self) -> SessionCreated {
        let session_id = Uuid::new_v4();
        let controller = Controller::new(Arc::clone(&self.data));
        let view = controller.view();
        let mut sessions = self.lock();
        sessions.insert(
            session_id,
            SessionEntry {
                controller,
                last_seen_ms: current_millis(),
            },
        );
        metrics::counter!("atlas_sessions_created_total").increment(1);
        metrics::gauge!("atlas_sessions_active").set(sessions.len() as f64);
        debug!(%session_id, "session created");
        SessionCreated { session_id, view }
    }

    pub(crate) fn view(&self, id: SessionId) -> Result<DashboardView, SessionError> {
        let mut sessions = self.lock();
        let entry = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        entry.last_seen_ms = current_millis();
        Ok(entry.controller.view())
    }

    /// Current revision, without rendering; used by the SSE poller.
    pub(crate) fn revision(&self, id: SessionId) -> Option<u64> {
        self.lock().get(&id).map(|entry| entry.controller.revision())
    }

    /// Apply an ordered batch of events and return the resulting view.
    pub(crate) fn apply(
        &self,
        id: SessionId,
        events: Vec<UiEvent>,
    ) -> Result<DashboardView, SessionError> {
        let span = info_span!("apply_events", session = %id, events = events.len());
        let _entered = span.enter();

        let kinds: Vec<&'static str> = events.iter().map(UiEvent::kind).collect();

        let mut sessions = self.lock();
        let entry = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        entry.last_seen_ms = current_millis();

        let started = Instant::now();
        let outcome = entry.controller.apply_batch(events);
        metrics::histogram!("atlas_recompute_seconds").record(started.elapsed().as_secs_f64());
        if let Err(err) = &outcome {
            metrics::counter!("atlas_events_rejected_total").increment(1);
            debug!("rejected event batch: {err}");
        }
        outcome?;
        for kind in kinds {
            metrics::counter!("atlas_events_total", "kind" => kind).increment(1);
        }
        Ok(entry.controller.view())
    }

    pub(crate) fn remove(&self, id: SessionId) -> bool {
        let mut sessions = self.lock();
        let removed = sessions.remove(&id).is_some();
        metrics::gauge!("atlas_sessions_active").set(sessions.len() as f64);
        removed
    }

    /// Drop sessions idle for longer than the TTL; returns how many went.
    pub(crate) fn evict_idle(&self, now_ms: u64) -> usize {
        let ttl_ms = u64::try_from(self.ttl.as_millis()).unwrap_or(u64::MAX);
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, entry| now_ms.saturating_sub(entry.last_seen_ms) <= ttl_ms);
        let evicted = before - sessions.len();
        if evicted > 0 {
            metrics::counter!("atlas_sessions_evicted_total").increment(evicted as u64);
            metrics::gauge!("atlas_sessions_active").set(sessions.len() as f64);
        }
        evicted
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }
}

pub(crate) fn current_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
