use crate::audio::AudioFrame;
use crate::error::AgentError;
use async_trait::async_trait;

/// A speech-to-text provider: converts a captured utterance into text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Stt: Send + Sync {
    /// Transcribes one utterance of audio. Implementations may return an
    /// empty string when the audio contains no recognizable speech.
    async fn transcribe(&self, audio: AudioFrame) -> Result<String, AgentError>;
}
