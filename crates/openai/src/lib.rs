//! OpenAI-backed capability providers: whisper transcription, chat
//! completions, and speech synthesis.
//!
//! All three providers share the `async-openai` client; credentials come in
//! through an [`OpenAIConfig`](async_openai::config::OpenAIConfig) built by
//! the caller.

pub mod llm;
pub mod stt;
pub mod tts;

pub use llm::Llm;
pub use stt::Stt;
pub use tts::{Tts, TtsOptions};
