//! ElevenLabs text-to-speech provider.
//!
//! Calls the hosted synthesis endpoint with a configured voice and model and
//! requests raw PCM output so the audio can be published to a room without
//! decoding.

use async_trait::async_trait;
use rooftops_agents::{AgentError, AudioFrame};
use serde::Serialize;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";

/// Output format requested from the synthesis endpoint; matches the room's
/// 24 kHz PCM16 audio.
const OUTPUT_FORMAT: &str = "pcm_24000";
const PCM_SAMPLE_RATE: u32 = 24_000;

/// Credentials and endpoint for the ElevenLabs API.
#[derive(Debug, Clone)]
pub struct ElevenLabsConfig {
    pub api_key: String,
    pub base_url: String,
}

impl ElevenLabsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Voice-quality tuning sent with every synthesis request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VoiceSettings {
    /// Higher values keep the voice more consistent between generations.
    pub stability: f32,
    /// Higher values track the original voice more closely.
    pub similarity_boost: f32,
    /// Playback speed multiplier.
    pub speed: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
            speed: 1.0,
        }
    }
}

/// Voice and model selection for a [`Tts`] provider.
#[derive(Debug, Clone)]
pub struct TtsOptions {
    pub voice_id: String,
    pub model_id: String,
    pub voice_settings: VoiceSettings,
}

#[derive(Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: &'a VoiceSettings,
}

/// ElevenLabs speech synthesis provider.
pub struct Tts {
    config: ElevenLabsConfig,
    options: TtsOptions,
    client: reqwest::Client,
}

impl Tts {
    pub fn new(config: ElevenLabsConfig, options: TtsOptions) -> Self {
        Self {
            config,
            options,
            client: reqwest::Client::new(),
        }
    }

    pub fn options(&self) -> &TtsOptions {
        &self.options
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/text-to-speech/{}",
            self.config.base_url, self.options.voice_id
        )
    }
}

#[async_trait]
impl rooftops_agents::Tts for Tts {
    async fn synthesize(&self, text: &str) -> Result<AudioFrame, AgentError> {
        let body = SynthesisRequest {
            text,
            model_id: &self.options.model_id,
            voice_settings: &self.options.voice_settings,
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("xi-api-key", &self.config.api_key)
            .query(&[("output_format", OUTPUT_FORMAT)])
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::Tts(e.to_string()))?
            .error_for_status()
            .map_err(|e| AgentError::Tts(e.to_string()))?;

        let audio = response
            .bytes()
            .await
            .map_err(|e| AgentError::Tts(e.to_string()))?;
        debug!(voice_id = %self.options.voice_id, bytes = audio.len(), "speech synthesized");
        Ok(AudioFrame::new(audio, PCM_SAMPLE_RATE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesis_body_carries_voice_settings() {
        let settings = VoiceSettings {
            stability: 0.7,
            similarity_boost: 0.9,
            speed: 1.15,
        };
        let body = SynthesisRequest {
            text: "hello",
            model_id: "eleven_flash_v2_5",
            voice_settings: &settings,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["text"], "hello");
        assert_eq!(json["model_id"], "eleven_flash_v2_5");
        assert_eq!(json["voice_settings"]["stability"], 0.7f32 as f64);
        assert_eq!(json["voice_settings"]["similarity_boost"], 0.9f32 as f64);
        assert_eq!(json["voice_settings"]["speed"], 1.15f32 as f64);
    }

    #[test]
    fn endpoint_embeds_the_voice_id() {
        let tts = Tts::new(
            ElevenLabsConfig::new("key"),
            TtsOptions {
                voice_id: "abc123".to_string(),
                model_id: "eleven_flash_v2_5".to_string(),
                voice_settings: VoiceSettings::default(),
            },
        );
        assert_eq!(
            tts.endpoint(),
            "https://api.elevenlabs.io/v1/text-to-speech/abc123"
        );
    }

    #[test]
    fn default_voice_settings_are_neutral() {
        let settings = VoiceSettings::default();
        assert_eq!(settings.speed, 1.0);
        assert_eq!(settings.stability, 0.5);
    }
}
