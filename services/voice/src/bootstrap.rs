//! Session bootstrapping: provider construction, TTS backend selection, and
//! the per-job entrypoint.
//!
//! Every job invocation runs the same fixed sequence: connect to the room,
//! build the four capability providers from configuration, start the session
//! with the assistant profile, and issue one casual greeting. Failures
//! propagate to the worker's fault logging; nothing here retries.

use crate::assistant::{GREETING_INSTRUCTIONS, assistant};
use crate::config::{Config, TtsBackend};
use anyhow::Context;
use async_openai::config::OpenAIConfig;
use async_openai::types::{SpeechModel, Voice};
use rooftops_agents::{AgentError, AgentSession, JobContext, Tts};
use rooftops_elevenlabs::{ElevenLabsConfig, VoiceSettings};
use rooftops_vad::{EnergyVad, VadOptions};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Fixed ElevenLabs voice for the assistant.
pub const ELEVEN_VOICE_ID: &str = "UgBBYS2sOqTuMpoF3BR0";
/// Fastest ElevenLabs model, for lower latency.
pub const ELEVEN_MODEL_ID: &str = "eleven_flash_v2_5";
/// Voice preset used when falling back to the OpenAI backend.
pub const FALLBACK_VOICE: Voice = Voice::Shimmer;

/// Voice-quality tuning for the ElevenLabs backend.
pub fn eleven_voice_settings() -> VoiceSettings {
    VoiceSettings {
        stability: 0.7,         // Higher = more consistent voice
        similarity_boost: 0.9,  // Higher = closer to original voice
        speed: 1.15,            // Slightly faster speech
    }
}

/// Turn-taking thresholds for the voice activity detector.
pub fn vad_options() -> VadOptions {
    VadOptions {
        min_speech_duration: Duration::from_millis(200),
        min_silence_duration: Duration::from_millis(500),
        activation_threshold: 0.5,
    }
}

fn openai_config(config: &Config) -> OpenAIConfig {
    OpenAIConfig::new().with_api_key(config.openai_api_key.as_str())
}

/// Chooses the TTS backend from the startup configuration.
pub fn build_tts(config: &Config) -> Arc<dyn Tts> {
    match (&config.tts_backend, &config.eleven_api_key) {
        (TtsBackend::ElevenLabs, Some(key)) => {
            info!(
                voice_id = ELEVEN_VOICE_ID,
                model = ELEVEN_MODEL_ID,
                "Using ElevenLabs TTS for natural voice"
            );
            Arc::new(rooftops_elevenlabs::Tts::new(
                ElevenLabsConfig::new(key.clone()),
                rooftops_elevenlabs::TtsOptions {
                    voice_id: ELEVEN_VOICE_ID.to_string(),
                    model_id: ELEVEN_MODEL_ID.to_string(),
                    voice_settings: eleven_voice_settings(),
                },
            ))
        }
        _ => {
            info!(
                voice = "shimmer",
                "Using OpenAI TTS (set ELEVEN_API_KEY for better voices)"
            );
            Arc::new(rooftops_openai::Tts::new(
                openai_config(config),
                rooftops_openai::TtsOptions {
                    voice: FALLBACK_VOICE,
                    model: SpeechModel::Tts1,
                },
            ))
        }
    }
}

/// Constructs a session with all four capability providers. Each job
/// invocation gets its own providers; nothing is shared between jobs.
pub fn build_session(config: &Config) -> Result<AgentSession, AgentError> {
    let stt = Arc::new(rooftops_openai::Stt::new(openai_config(config)));
    let llm = Arc::new(rooftops_openai::Llm::new(
        openai_config(config),
        config.chat_model.clone(),
    ));
    let tts = build_tts(config);
    let vad = EnergyVad::load(vad_options())?;
    Ok(AgentSession::new(stt, llm, tts, Box::new(vad)))
}

/// Entrypoint for one job invocation.
pub async fn entrypoint(ctx: JobContext, config: Arc<Config>) -> anyhow::Result<()> {
    info!(job_id = %ctx.job_id(), room = %ctx.room().name(), "Connecting to room");
    ctx.connect().await.context("Failed to connect to room")?;

    let session = build_session(&config).context("Failed to construct session providers")?;
    session
        .start(ctx.room(), assistant())
        .await
        .context("Failed to start agent session")?;

    // Greet the user naturally, exactly once per session.
    session
        .generate_reply(GREETING_INSTRUCTIONS)
        .await
        .context("Failed to generate greeting")?;

    session
        .wait()
        .await
        .context("Agent session ended abnormally")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    fn config_with_backend(backend: TtsBackend) -> Config {
        Config {
            openai_api_key: "test-openai-key".to_string(),
            eleven_api_key: match backend {
                TtsBackend::ElevenLabs => Some("test-eleven-key".to_string()),
                TtsBackend::OpenAi => None,
            },
            chat_model: "gpt-4o-mini".to_string(),
            log_level: Level::INFO,
            tts_backend: backend,
        }
    }

    #[test]
    fn eleven_settings_match_the_tuned_voice() {
        let settings = eleven_voice_settings();
        assert_eq!(settings.stability, 0.7);
        assert_eq!(settings.similarity_boost, 0.9);
        assert_eq!(settings.speed, 1.15);
        assert_eq!(ELEVEN_VOICE_ID, "UgBBYS2sOqTuMpoF3BR0");
        assert_eq!(ELEVEN_MODEL_ID, "eleven_flash_v2_5");
    }

    #[test]
    fn fallback_voice_is_shimmer() {
        assert!(matches!(FALLBACK_VOICE, Voice::Shimmer));
    }

    #[test]
    fn vad_thresholds_match_turn_taking_tuning() {
        let options = vad_options();
        assert_eq!(options.min_speech_duration, Duration::from_millis(200));
        assert_eq!(options.min_silence_duration, Duration::from_millis(500));
        assert_eq!(options.activation_threshold, 0.5);
    }

    #[test]
    fn build_session_wires_all_four_providers() {
        for backend in [TtsBackend::OpenAi, TtsBackend::ElevenLabs] {
            let config = config_with_backend(backend);
            assert!(build_session(&config).is_ok());
        }
    }
}
