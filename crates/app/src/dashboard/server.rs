//! Actix Web server exposing the dashboard page, the session API, an SSE view
//! stream and Prometheus metrics.
//!
//! The server runs on a dedicated thread with its own actix system so the
//! caller only deals with a blocking start and a `stop()`.

use std::{
    sync::{Arc, mpsc},
    time::Duration,
};

use actix_web::{
    App, HttpResponse, HttpServer,
    http::header,
    web::{self, Bytes},
};
use anyhow::{Context, Result, anyhow};
use async_stream::stream;
use serde_json::to_string;
use tokio::sync::oneshot;
use tracing::error;

use crate::dashboard::{
    data::{ErrorBody, EventPayload, SessionError, SessionId, SessionRegistry},
    telemetry::{prometheus_handle, spawn_thread},
};

const SSE_POLL_INTERVAL_MS: u64 = 250;

/// Shared state backing HTTP handlers.
pub(crate) struct ServerState {
    pub(crate) sessions: Arc<SessionRegistry>,
}

#[derive(Default)]
/// Handle for the dashboard server thread.
pub(crate) struct DashboardServer {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<std::thread::JoinHandle<()>>,
}

impl DashboardServer {
    /// Signal the server to stop and block until the thread exits.
    pub(crate) fn stop(self) {
        if let Some(tx) = self.shutdown {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle {
            let _ = handle.join();
        }
    }
}

/// Register every route; shared by the real server and handler tests.
pub(crate) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index_route))
        .route("/metrics", web::get().to(metrics_handler))
        .route("/api/sessions", web::post().to(create_session_handler))
        .route("/api/sessions/{id}", web::get().to(view_handler))
        .route("/api/sessions/{id}", web::delete().to(delete_session_handler))
        .route("/api/sessions/{id}/events", web::post().to(events_handler))
        .route("/api/sessions/{id}/stream", web::get().to(stream_handler));
}

/// Spawn the server thread, wait until it is bound, and return its handle.
pub(crate) fn spawn_dashboard_server(
    sessions: Arc<SessionRegistry>,
    bind: &str,
    port: u16,
) -> Result<DashboardServer> {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let (bound_tx, bound_rx) = mpsc::channel::<std::io::Result<()>>();
    let bind = bind.to_string();
    let handle = spawn_thread("atlas-http-server", move || {
        if let Err(err) = actix_web::rt::System::new().block_on(async move {
            let server = match HttpServer::new(move || {
                App::new()
                    .app_data(web::Data::new(ServerState {
                        sessions: sessions.clone(),
                    }))
                    .configure(configure)
            })
            .bind((bind.as_str(), port))
            {
                Ok(server) => {
                    let _ = bound_tx.send(Ok(()));
                    server.run()
                }
                Err(err) => {
                    let _ = bound_tx.send(Err(std::io::Error::new(err.kind(), err.to_string())));
                    return Err(err);
                }
            };

            let srv_handle = server.handle();
            actix_web::rt::spawn(async move {
                let _ = shutdown_rx.await;
                srv_handle.stop(true).await;
            });

            server.await
        }) {
            error!("HTTP server error: {err}");
        }
    })
    .context("Failed to spawn dashboard server thread")?;

    bound_rx
        .recv()
        .map_err(|_| anyhow!("Dashboard server thread exited before binding"))?
        .with_context(|| format!("Failed to bind dashboard server to port {port}"))?;

    Ok(DashboardServer {
        shutdown: Some(shutdown_tx),
        handle: Some(handle),
    })
}

fn error_response(err: &SessionError) -> HttpResponse {
    let body = ErrorBody {
        error: err.to_string(),
    };
    match err {
        SessionError::NotFound(_) => HttpResponse::NotFound().json(body),
        SessionError::Rejected(_) => HttpResponse::UnprocessableEntity().json(body),
    }
}

/// Serve the dashboard page.
async fn index_route() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(crate::html::dashboard::DASHBOARD_HTML)
}

/// Prometheus text exposition of the process metrics.
async fn metrics_handler() -> HttpResponse {
    match prometheus_handle() {
        Some(handle) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(handle.render()),
        None => HttpResponse::NoContent().finish(),
    }
}

/// Start a session and return its id plus the initial view.
async fn create_session_handler(state: web::Data<ServerState>) -> HttpResponse {
    HttpResponse::Created().json(state.sessions.create())
}

/// Return the current view of a session.
async fn view_handler(path: web::Path<SessionId>, state: web::Data<ServerState>) -> HttpResponse {
    match state.sessions.view(path.into_inner()) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => error_response(&err),
    }
}

/// Apply one event or an ordered batch, answering with the new view.
async fn events_handler(
    path: web::Path<SessionId>,
    payload: web::Json<EventPayload>,
    state: web::Data<ServerState>,
) -> HttpResponse {
    let events = payload.into_inner().into_events();
    match state.sessions.apply(path.into_inner(), events) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => error_response(&err),
    }
}

async fn delete_session_handler(
    path: web::Path<SessionId>,
    state: web::Data<ServerState>,
) -> HttpResponse {
    let id = path.into_inner();
    if state.sessions.remove(id) {
        HttpResponse::NoContent().finish()
    } else {
        error_response(&SessionError::NotFound(id))
    }
}

/// Stream view snapshots as Server-Sent Events whenever the revision moves.
async fn stream_handler(path: web::Path<SessionId>, state: web::Data<ServerState>) -> HttpResponse {
    let id = path.into_inner();
    if state.sessions.revision(id).is_none() {
        return error_response(&SessionError::NotFound(id));
    }

    let state = state.clone();
    let stream = stream! {
        yield Ok::<Bytes, actix_web::Error>(Bytes::from_static(b"retry: 500\n\n"));
        let mut interval = actix_web::rt::time::interval(Duration::from_millis(SSE_POLL_INTERVAL_MS));
        let mut last_sent: Option<u64> = None;
        loop {
            interval.tick().await;
            let Some(revision) = state.sessions.revision(id) else {
                yield Ok::<Bytes, actix_web::Error>(Bytes::from_static(b"event: closed\ndata: {}\n\n"));
                break;
            };
            if last_sent == Some(revision) {
                yield Ok::<Bytes, actix_web::Error>(Bytes::from_static(b": keep-alive\n\n"));
                continue;
            }
            match state.sessions.view(id).map_err(|err| err.to_string()).and_then(|view| {
                to_string(&view).map_err(|err| err.to_string())
            }) {
                Ok(json) => {
                    last_sent = Some(revision);
                    let mut sse_chunk = String::with_capacity(json.len() + 32);
                    sse_chunk.push_str("id: ");
                    sse_chunk.push_str(&revision.to_string());
                    sse_chunk.push('\n');
                    sse_chunk.push_str("data: ");
                    sse_chunk.push_str(&json);
                    sse_chunk.push_str("\n\n");
                    yield Ok::<Bytes, actix_web::Error>(Bytes::from(sse_chunk));
                }
                Err(err) => {
                    let error_chunk = format!("event: error\ndata: {}\n\n", err);
                    yield Ok::<Bytes, actix_web::Error>(Bytes::from(error_chunk));
                }
            }
        }
    };

    HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .insert_header((header::CONTENT_TYPE, "text/event-stream"))
        .insert_header((header::CONNECTION, "keep-alive"))
        .streaming(stream)
}
