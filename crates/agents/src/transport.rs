//! WebSocket room transport.
//!
//! A [`WsRoom`] treats one accepted WebSocket as a real-time audio channel:
//! every binary message is a PCM16 little-endian mono frame at
//! [`ROOM_SAMPLE_RATE`], in both directions. Text and control messages are
//! ignored; a close frame or transport error ends the audio stream, which in
//! turn stops the session pipeline.

use crate::audio::{AudioFrame, ROOM_SAMPLE_RATE};
use crate::error::AgentError;
use crate::room::Room;
use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, mpsc};
use tracing::{Instrument, info, info_span, warn};

/// Capacity of the incoming audio channel before backpressure reaches the
/// socket reader.
const AUDIO_CHANNEL_CAPACITY: usize = 256;

/// A [`Room`] backed by an accepted WebSocket connection.
pub struct WsRoom {
    name: String,
    sink: Arc<Mutex<SplitSink<WebSocket, Message>>>,
    source: Mutex<Option<SplitStream<WebSocket>>>,
    audio_rx: Mutex<Option<mpsc::Receiver<AudioFrame>>>,
    connected: AtomicBool,
}

impl WsRoom {
    pub fn new(socket: WebSocket, name: String) -> Self {
        let (sink, source) = socket.split();
        Self {
            name,
            sink: Arc::new(Mutex::new(sink)),
            source: Mutex::new(Some(source)),
            audio_rx: Mutex::new(None),
            connected: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Room for WsRoom {
    fn name(&self) -> &str {
        &self.name
    }

    async fn connect(&self) -> Result<(), AgentError> {
        let mut source = self
            .source
            .lock()
            .await
            .take()
            .ok_or_else(|| AgentError::Room("room already connected".to_string()))?;

        let (tx, rx) = mpsc::channel(AUDIO_CHANNEL_CAPACITY);
        let span = info_span!("room_rx", room = %self.name);
        tokio::spawn(
            async move {
                while let Some(msg) = source.next().await {
                    match msg {
                        Ok(Message::Binary(data)) => {
                            let frame = AudioFrame::new(data, ROOM_SAMPLE_RATE);
                            if tx.send(frame).await.is_err() {
                                break;
                            }
                        }
                        Ok(Message::Close(_)) => {
                            info!("remote participant closed the room");
                            break;
                        }
                        Ok(_) => {}
                        Err(e) => {
                            warn!(error = %e, "room transport error");
                            break;
                        }
                    }
                }
            }
            .instrument(span),
        );

        *self.audio_rx.lock().await = Some(rx);
        self.connected.store(true, Ordering::SeqCst);
        info!(room = %self.name, "connection established");
        Ok(())
    }

    async fn subscribe_audio(&self) -> Result<mpsc::Receiver<AudioFrame>, AgentError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(AgentError::Room("room is not connected".to_string()));
        }
        self.audio_rx
            .lock()
            .await
            .take()
            .ok_or_else(|| AgentError::Room("room audio already subscribed".to_string()))
    }

    async fn publish_audio(&self, frame: AudioFrame) -> Result<(), AgentError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(AgentError::Room("room is not connected".to_string()));
        }
        self.sink
            .lock()
            .await
            .send(Message::Binary(frame.data().clone()))
            .await
            .map_err(|e| AgentError::Room(format!("failed to publish audio: {e}")))
    }
}
