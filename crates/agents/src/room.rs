use crate::audio::AudioFrame;
use crate::error::AgentError;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Handle to a real-time audio channel shared with one or more participants.
///
/// The runtime only ever sees this trait; the concrete transport (see
/// [`WsRoom`](crate::transport::WsRoom)) is chosen by the worker that
/// dispatched the job.
#[async_trait]
pub trait Room: Send + Sync {
    fn name(&self) -> &str;

    /// Establishes the connection. Must be called once, before audio flows.
    async fn connect(&self) -> Result<(), AgentError>;

    /// Returns the stream of audio captured from remote participants. May be
    /// taken at most once per room.
    async fn subscribe_audio(&self) -> Result<mpsc::Receiver<AudioFrame>, AgentError>;

    /// Plays audio into the room.
    async fn publish_audio(&self, frame: AudioFrame) -> Result<(), AgentError>;
}
