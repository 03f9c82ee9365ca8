use crate::audio::AudioFrame;
use crate::error::AgentError;
use async_trait::async_trait;

/// A text-to-speech provider: renders reply text as audio for the room.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Tts: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<AudioFrame, AgentError>;
}
