use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use rooftops_agents::{AgentError, ChatMessage, ChatRole};
use tracing::debug;

/// Chat-completion language model provider.
pub struct Llm {
    client: Client<OpenAIConfig>,
    model: String,
}

impl Llm {
    /// Creates a provider for the given model identifier (e.g. "gpt-4o-mini").
    pub fn new(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn to_request_message(msg: &ChatMessage) -> Result<ChatCompletionRequestMessage, OpenAIError> {
    Ok(match msg.role {
        ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(msg.content.clone())
            .build()?
            .into(),
        ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(msg.content.clone())
            .build()?
            .into(),
        ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(msg.content.clone())
            .build()?
            .into(),
    })
}

#[async_trait]
impl rooftops_agents::Llm for Llm {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, AgentError> {
        let messages: Vec<ChatCompletionRequestMessage> = messages
            .iter()
            .map(to_request_message)
            .collect::<Result<_, _>>()
            .map_err(|e| AgentError::Llm(e.to_string()))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .build()
            .map_err(|e| AgentError::Llm(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AgentError::Llm(e.to_string()))?;

        let reply = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| AgentError::Llm("completion had no text content".to_string()))?;
        debug!(model = %self.model, chars = reply.len(), "chat completion received");
        Ok(reply)
    }
}
