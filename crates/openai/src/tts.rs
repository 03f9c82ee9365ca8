use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{CreateSpeechRequestArgs, SpeechModel, SpeechResponseFormat, Voice},
};
use async_trait::async_trait;
use rooftops_agents::{AgentError, AudioFrame};
use tracing::debug;

/// Sample rate of the PCM audio returned by the speech endpoint.
const SPEECH_PCM_SAMPLE_RATE: u32 = 24_000;

/// Voice and model selection for the speech synthesis provider.
#[derive(Debug, Clone)]
pub struct TtsOptions {
    pub voice: Voice,
    pub model: SpeechModel,
}

impl Default for TtsOptions {
    fn default() -> Self {
        Self {
            voice: Voice::Alloy,
            model: SpeechModel::Tts1,
        }
    }
}

/// Speech synthesis provider. Requests raw PCM so frames can go straight to
/// the room without decoding.
pub struct Tts {
    client: Client<OpenAIConfig>,
    options: TtsOptions,
}

impl Tts {
    pub fn new(config: OpenAIConfig, options: TtsOptions) -> Self {
        Self {
            client: Client::with_config(config),
            options,
        }
    }

    pub fn options(&self) -> &TtsOptions {
        &self.options
    }
}

#[async_trait]
impl rooftops_agents::Tts for Tts {
    async fn synthesize(&self, text: &str) -> Result<AudioFrame, AgentError> {
        let request = CreateSpeechRequestArgs::default()
            .input(text)
            .voice(self.options.voice.clone())
            .model(self.options.model.clone())
            .response_format(SpeechResponseFormat::Pcm)
            .build()
            .map_err(|e| AgentError::Tts(e.to_string()))?;

        let response = self
            .client
            .audio()
            .speech(request)
            .await
            .map_err(|e| AgentError::Tts(e.to_string()))?;
        debug!(bytes = response.bytes.len(), "speech synthesized");
        Ok(AudioFrame::new(response.bytes, SPEECH_PCM_SAMPLE_RATE))
    }
}
