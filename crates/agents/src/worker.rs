//! Worker process: accepts room connections and dispatches one job
//! invocation per connection to the configured entrypoint.

use crate::error::AgentError;
use crate::room::Room;
use crate::transport::WsRoom;
use axum::{
    Router,
    extract::{Query, State, WebSocketUpgrade, ws::WebSocket},
    response::Response,
    routing::get,
};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

/// Boxed entrypoint future invoked once per job.
pub type JobHandler = Arc<dyn Fn(JobContext) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Context handed to an entrypoint for one job invocation.
///
/// Each invocation gets a fresh context with its own room handle; nothing is
/// shared between concurrent jobs.
pub struct JobContext {
    job_id: Uuid,
    room: Arc<dyn Room>,
}

impl JobContext {
    pub fn new(job_id: Uuid, room: Arc<dyn Room>) -> Self {
        Self { job_id, room }
    }

    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    pub fn room(&self) -> Arc<dyn Room> {
        self.room.clone()
    }

    /// Establishes the room connection. Failure here is fatal to the job.
    pub async fn connect(&self) -> Result<(), AgentError> {
        self.room.connect().await
    }
}

/// Configuration for a worker process.
#[derive(Clone)]
pub struct WorkerOptions {
    pub(crate) entrypoint: JobHandler,
}

impl WorkerOptions {
    pub fn new<F, Fut>(entrypoint: F) -> Self
    where
        F: Fn(JobContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            entrypoint: Arc::new(move |ctx| entrypoint(ctx).boxed()),
        }
    }
}

/// Accepts WebSocket room connections and runs the entrypoint for each.
pub struct Worker {
    options: WorkerOptions,
}

impl Worker {
    pub fn new(options: WorkerOptions) -> Self {
        Self { options }
    }

    /// Serves job dispatches until interrupted.
    pub async fn serve(self, addr: SocketAddr) -> anyhow::Result<()> {
        let app = Router::new()
            .route("/ws", get(ws_handler))
            .with_state(Arc::new(self.options));

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(%addr, "worker listening for job dispatches");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("worker has shut down");
        Ok(())
    }
}

/// Listens for Ctrl+C to gracefully shut the worker down.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received shutdown signal. Shutting down gracefully...");
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<HashMap<String, String>>,
    State(options): State<Arc<WorkerOptions>>,
) -> Response {
    let room_name = params.get("room").cloned();
    ws.on_upgrade(move |socket| dispatch_job(socket, room_name, options))
}

/// Runs one job invocation to completion, logging any terminal error. The
/// entrypoint owns all error handling beyond this point; the worker performs
/// no retries.
async fn dispatch_job(socket: WebSocket, room_name: Option<String>, options: Arc<WorkerOptions>) {
    let job_id = Uuid::new_v4();
    let room_name = room_name.unwrap_or_else(|| format!("job-{job_id}"));
    let room = Arc::new(WsRoom::new(socket, room_name.clone()));
    let ctx = JobContext::new(job_id, room);

    let span = info_span!("job", %job_id, room = %room_name);
    async move {
        info!("dispatching job to entrypoint");
        if let Err(e) = (options.entrypoint)(ctx).await {
            error!(error = ?e, "job terminated with error");
        } else {
            info!("job finished");
        }
    }
    .instrument(span)
    .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioFrame;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::mpsc;

    struct NullRoom {
        connected: AtomicBool,
    }

    #[async_trait]
    impl Room for NullRoom {
        fn name(&self) -> &str {
            "null"
        }

        async fn connect(&self) -> Result<(), AgentError> {
            self.connected.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn subscribe_audio(&self) -> Result<mpsc::Receiver<AudioFrame>, AgentError> {
            Err(AgentError::Room("no audio".to_string()))
        }

        async fn publish_audio(&self, _frame: AudioFrame) -> Result<(), AgentError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn entrypoint_is_invoked_with_the_job_context() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let options = WorkerOptions::new(move |ctx: JobContext| {
            let seen = seen.clone();
            async move {
                ctx.connect().await?;
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        let room = Arc::new(NullRoom {
            connected: AtomicBool::new(false),
        });
        let ctx = JobContext::new(Uuid::new_v4(), room.clone());
        (options.entrypoint)(ctx).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(room.connected.load(Ordering::SeqCst));
    }
}
