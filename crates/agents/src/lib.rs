//! Runtime for voice conversation agents.
//!
//! This crate is the seam between an agent entrypoint and everything that
//! actually moves audio: it defines the capability traits for speech-to-text,
//! language-model, text-to-speech, and voice-activity-detection providers, an
//! [`AgentSession`] that wires the four together over a [`Room`], and a worker
//! process that dispatches one job invocation per incoming room connection.
//!
//! Providers are supplied by sibling crates; the runtime never talks to a
//! hosted service itself.

pub mod agent;
pub mod audio;
pub mod cli;
pub mod error;
pub mod llm;
pub mod room;
pub mod session;
pub mod stt;
pub mod transport;
pub mod tts;
pub mod vad;
pub mod worker;

pub use agent::Agent;
pub use audio::{AudioFrame, ROOM_SAMPLE_RATE};
pub use error::AgentError;
pub use llm::{ChatMessage, ChatRole, Llm};
pub use room::Room;
pub use session::AgentSession;
pub use stt::Stt;
pub use transport::WsRoom;
pub use tts::Tts;
pub use vad::{Vad, VadEvent};
pub use worker::{JobContext, WorkerOptions};
