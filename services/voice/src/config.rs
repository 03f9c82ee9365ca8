use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which text-to-speech backend the assistant will speak through.
///
/// Decided once at startup from credential presence, never from runtime
/// probing: ElevenLabs when `ELEVEN_API_KEY` is set, the OpenAI voice
/// otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TtsBackend {
    ElevenLabs,
    OpenAi,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub openai_api_key: String,
    pub eleven_api_key: Option<String>,
    pub chat_model: String,
    pub log_level: Level,
    pub tts_backend: TtsBackend,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ConfigError::MissingVar("OPENAI_API_KEY".to_string()))?;

        // An empty credential counts as absent.
        let eleven_api_key = std::env::var("ELEVEN_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());
        let tts_backend = if eleven_api_key.is_some() {
            TtsBackend::ElevenLabs
        } else {
            TtsBackend::OpenAi
        };

        let chat_model = std::env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            openai_api_key,
            eleven_api_key,
            chat_model,
            log_level,
            tts_backend,
        })
    }
}
