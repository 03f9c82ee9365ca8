use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{AudioInput, CreateTranscriptionRequestArgs},
};
use async_trait::async_trait;
use rooftops_agents::{AgentError, AudioFrame};
use tracing::debug;

const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Whisper transcription provider.
///
/// Utterances arrive as raw PCM16 frames; the transcription endpoint wants a
/// container, so each one is wrapped in a minimal WAV header before upload.
pub struct Stt {
    client: Client<OpenAIConfig>,
    model: String,
}

impl Stt {
    pub fn new(config: OpenAIConfig) -> Self {
        Self {
            client: Client::with_config(config),
            model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Wraps raw PCM16 mono audio in a 44-byte WAV header.
fn wav_bytes(frame: &AudioFrame) -> Vec<u8> {
    let data_len = frame.data().len() as u32;
    let sample_rate = frame.sample_rate();
    let byte_rate = sample_rate * 2;

    let mut wav = Vec::with_capacity(44 + data_len as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes()); // block align
    wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.extend_from_slice(frame.data());
    wav
}

#[async_trait]
impl rooftops_agents::Stt for Stt {
    async fn transcribe(&self, audio: AudioFrame) -> Result<String, AgentError> {
        if audio.is_empty() {
            return Ok(String::new());
        }

        let request = CreateTranscriptionRequestArgs::default()
            .file(AudioInput::from_vec_u8(
                "utterance.wav".to_string(),
                wav_bytes(&audio),
            ))
            .model(&self.model)
            .build()
            .map_err(|e| AgentError::Stt(e.to_string()))?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| AgentError::Stt(e.to_string()))?;
        debug!(model = %self.model, chars = response.text.len(), "utterance transcribed");
        Ok(response.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rooftops_agents::ROOM_SAMPLE_RATE;

    #[test]
    fn wav_header_describes_the_payload() {
        let frame = AudioFrame::from_samples(&[1i16, -1, 0, 42], ROOM_SAMPLE_RATE);
        let wav = wav_bytes(&frame);

        assert_eq!(wav.len(), 44 + 8);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        // Sample rate at offset 24, little-endian.
        assert_eq!(
            u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]),
            ROOM_SAMPLE_RATE
        );
        // Data chunk length at offset 40.
        assert_eq!(u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]), 8);
        // Payload follows the header verbatim.
        assert_eq!(&wav[44..], frame.data().as_ref());
    }

    #[test]
    fn wav_riff_size_covers_header_and_data() {
        let frame = AudioFrame::from_samples(&[0i16; 100], ROOM_SAMPLE_RATE);
        let wav = wav_bytes(&frame);
        assert_eq!(
            u32::from_le_bytes([wav[4], wav[5], wav[6], wav[7]]),
            36 + 200
        );
    }
}
