use thiserror::Error;

/// Errors surfaced by the agent runtime and its providers.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("room error: {0}")]
    Room(String),

    #[error("speech-to-text error: {0}")]
    Stt(String),

    #[error("language model error: {0}")]
    Llm(String),

    #[error("text-to-speech error: {0}")]
    Tts(String),

    #[error("voice activity detection error: {0}")]
    Vad(String),

    #[error("session error: {0}")]
    Session(String),
}
