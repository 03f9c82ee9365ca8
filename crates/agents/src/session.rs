//! The agent session: binds the four capability providers to a room and runs
//! the listen → transcribe → reply → speak loop for the life of the
//! connection.

use crate::agent::Agent;
use crate::audio::AudioFrame;
use crate::error::AgentError;
use crate::llm::{ChatMessage, Llm};
use crate::room::Room;
use crate::stt::Stt;
use crate::tts::Tts;
use crate::vad::{Vad, VadEvent};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{Instrument, error, info, info_span, warn};

/// Audio retained from just before a speech onset, so the transcription does
/// not lose the first syllables while the detector is still committing.
const PRE_SPEECH_PADDING: Duration = Duration::from_millis(200);

type SharedHistory = Arc<Mutex<Vec<ChatMessage>>>;

struct ActiveSession {
    room: Arc<dyn Room>,
    agent: Agent,
    history: SharedHistory,
    pipeline: Option<JoinHandle<()>>,
}

/// A running conversation bound to one room and one agent profile.
///
/// Construction requires all four capability providers, so a session can
/// never start with a missing one. Each job invocation builds its own
/// session; nothing is shared across invocations.
pub struct AgentSession {
    stt: Arc<dyn Stt>,
    llm: Arc<dyn Llm>,
    tts: Arc<dyn Tts>,
    vad: Mutex<Option<Box<dyn Vad>>>,
    active: Mutex<Option<ActiveSession>>,
}

impl AgentSession {
    pub fn new(
        stt: Arc<dyn Stt>,
        llm: Arc<dyn Llm>,
        tts: Arc<dyn Tts>,
        vad: Box<dyn Vad>,
    ) -> Self {
        Self {
            stt,
            llm,
            tts,
            vad: Mutex::new(Some(vad)),
            active: Mutex::new(None),
        }
    }

    /// Binds the session to a connected room and agent profile and spawns the
    /// conversation pipeline. A session starts at most once.
    pub async fn start(&self, room: Arc<dyn Room>, agent: Agent) -> Result<(), AgentError> {
        let mut active = self.active.lock().await;
        if active.is_some() {
            return Err(AgentError::Session("session already started".to_string()));
        }
        if agent.instructions().is_empty() {
            return Err(AgentError::Session(
                "agent instructions must not be empty".to_string(),
            ));
        }

        let vad = self
            .vad
            .lock()
            .await
            .take()
            .ok_or_else(|| AgentError::Session("voice activity detector unavailable".to_string()))?;
        let audio_rx = room.subscribe_audio().await?;
        let history: SharedHistory = Arc::new(Mutex::new(Vec::new()));

        let span = info_span!("pipeline", room = %room.name());
        let pipeline = tokio::spawn(
            run_pipeline(
                self.stt.clone(),
                self.llm.clone(),
                self.tts.clone(),
                vad,
                room.clone(),
                agent.instructions().to_string(),
                history.clone(),
                audio_rx,
            )
            .instrument(span),
        );

        info!(room = %room.name(), "agent session started");
        *active = Some(ActiveSession {
            room,
            agent,
            history,
            pipeline: Some(pipeline),
        });
        Ok(())
    }

    /// Generates one unprompted reply, steered by `instructions`, and speaks
    /// it into the room. Returns the reply text.
    pub async fn generate_reply(&self, instructions: &str) -> Result<String, AgentError> {
        let active = self.active.lock().await;
        let active = active
            .as_ref()
            .ok_or_else(|| AgentError::Session("session not started".to_string()))?;

        let mut messages = vec![ChatMessage::system(active.agent.instructions())];
        messages.extend(active.history.lock().await.iter().cloned());
        messages.push(ChatMessage::system(instructions));

        let reply = self.llm.complete(&messages).await?;
        active
            .history
            .lock()
            .await
            .push(ChatMessage::assistant(reply.clone()));

        let audio = self.tts.synthesize(&reply).await?;
        active.room.publish_audio(audio).await?;
        info!(chars = reply.len(), "generated reply published");
        Ok(reply)
    }

    /// Waits for the conversation pipeline to finish, which happens when the
    /// room's audio stream ends.
    pub async fn wait(&self) -> Result<(), AgentError> {
        let pipeline = self
            .active
            .lock()
            .await
            .as_mut()
            .and_then(|a| a.pipeline.take())
            .ok_or_else(|| AgentError::Session("session not started".to_string()))?;
        pipeline
            .await
            .map_err(|e| AgentError::Session(format!("pipeline task failed: {e}")))
    }

    /// Tears the session down, aborting the pipeline if it is still running.
    pub async fn close(&self) {
        if let Some(active) = self.active.lock().await.take() {
            if let Some(pipeline) = active.pipeline {
                pipeline.abort();
            }
            info!(room = %active.room.name(), "agent session closed");
        }
    }
}

/// Consumes room audio until the stream ends, segmenting it into utterances
/// and answering each one.
#[allow(clippy::too_many_arguments)]
async fn run_pipeline(
    stt: Arc<dyn Stt>,
    llm: Arc<dyn Llm>,
    tts: Arc<dyn Tts>,
    mut vad: Box<dyn Vad>,
    room: Arc<dyn Room>,
    instructions: String,
    history: SharedHistory,
    mut audio_rx: mpsc::Receiver<AudioFrame>,
) {
    let mut pre_speech: VecDeque<AudioFrame> = VecDeque::new();
    let mut pre_speech_len = Duration::ZERO;
    let mut capture: Vec<AudioFrame> = Vec::new();
    let mut capturing = false;

    while let Some(frame) = audio_rx.recv().await {
        match vad.process(&frame) {
            Some(VadEvent::SpeechStart) => {
                capturing = true;
                capture.clear();
                capture.extend(pre_speech.drain(..));
                pre_speech_len = Duration::ZERO;
                capture.push(frame);
            }
            Some(VadEvent::SpeechEnd) => {
                if capturing {
                    capture.push(frame);
                    capturing = false;
                    let utterance = AudioFrame::concat(&capture);
                    capture.clear();
                    if let Err(e) =
                        handle_turn(&stt, &llm, &tts, &room, &instructions, &history, utterance)
                            .await
                    {
                        error!(error = %e, "conversation turn failed");
                    }
                }
            }
            None => {
                if capturing {
                    capture.push(frame);
                } else {
                    pre_speech_len += frame.duration();
                    pre_speech.push_back(frame);
                    while pre_speech_len > PRE_SPEECH_PADDING {
                        match pre_speech.pop_front() {
                            Some(old) => pre_speech_len -= old.duration(),
                            None => break,
                        }
                    }
                }
            }
        }
    }
    info!("room audio stream ended, pipeline stopping");
}

/// One conversational turn: transcribe the utterance, ask the language model
/// for a reply, speak it into the room.
async fn handle_turn(
    stt: &Arc<dyn Stt>,
    llm: &Arc<dyn Llm>,
    tts: &Arc<dyn Tts>,
    room: &Arc<dyn Room>,
    instructions: &str,
    history: &SharedHistory,
    utterance: AudioFrame,
) -> Result<(), AgentError> {
    let text = stt.transcribe(utterance).await?;
    if text.trim().is_empty() {
        warn!("utterance transcribed to nothing, skipping turn");
        return Ok(());
    }
    info!(chars = text.len(), "user utterance transcribed");

    let messages = {
        let mut history = history.lock().await;
        history.push(ChatMessage::user(text));
        let mut messages = vec![ChatMessage::system(instructions)];
        messages.extend(history.iter().cloned());
        messages
    };

    let reply = llm.complete(&messages).await?;
    history.lock().await.push(ChatMessage::assistant(reply.clone()));

    let audio = tts.synthesize(&reply).await?;
    room.publish_audio(audio).await?;
    info!(chars = reply.len(), "agent reply published");
    Ok(())
}
