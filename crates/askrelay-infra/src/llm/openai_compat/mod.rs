//! OpenAI-compatible provider implementation.
//!
//! One [`OpenAiCompatibleProvider`] serves OpenAI and Google Gemini (through
//! Gemini's OpenAI-compatible endpoint) via configurable base URLs. Uses
//! [`async_openai`] for request/response types.

pub mod config;

use std::time::Duration;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use secrecy::ExposeSecret;
use tracing::Instrument;

use askrelay_core::provider::ProviderCall;
use askrelay_types::provider::{ProviderError, ProviderResponse};
use askrelay_types::question::Question;

use self::config::OpenAiCompatConfig;
use crate::llm::{CallParams, classify};

/// Appended to the question when `html_hint` is on.
const HTML_HINT: &str = "Answer the question using HTML5 tags to improve formatting. \
Do not break the 3rd wall and explicitly mention the HTML5 tags.";

/// Provider for any OpenAI chat-completions API.
///
/// Does not derive Debug: the async-openai client holds the API key.
pub struct OpenAiCompatibleProvider {
    client: Client<OpenAIConfig>,
    provider_name: String,
    params: CallParams,
    html_hint: bool,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: OpenAiCompatConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.api_key.expose_secret())
            .with_api_base(&config.base_url);

        Self {
            client: Client::with_config(openai_config).with_backoff(no_retry()),
            provider_name: config.provider_name,
            params: config.params,
            html_hint: config.html_hint,
        }
    }

    fn user_text(&self, question: &Question) -> String {
        if self.html_hint {
            format!("{}. {HTML_HINT}", question.text())
        } else {
            question.text().to_string()
        }
    }

    fn build_request(&self, question: &Question) -> CreateChatCompletionRequest {
        let messages = vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(
                    self.params.system_prompt(question).to_string(),
                ),
                name: None,
            }),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(self.user_text(question)),
                name: None,
            }),
        ];

        CreateChatCompletionRequest {
            model: self.params.model.clone(),
            messages,
            max_completion_tokens: Some(self.params.max_tokens),
            temperature: Some(self.params.temperature as f32),
            ..Default::default()
        }
    }

    async fn send(&self, question: &Question) -> Result<ProviderResponse, ProviderError> {
        let request = self.build_request(question);

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_openai_error)?;

        tracing::debug!(
            gen_ai.response.id = %response.id,
            gen_ai.response.model = %response.model,
            "Received chat completion"
        );

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        Ok(ProviderResponse::Text(content))
    }
}

impl ProviderCall for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn call(&self, question: &Question) -> Result<ProviderResponse, ProviderError> {
        let span = tracing::info_span!(
            "gen_ai.complete",
            gen_ai.system = %self.provider_name,
            gen_ai.request.model = %self.params.model,
            gen_ai.request.max_tokens = self.params.max_tokens,
            gen_ai.request.temperature = self.params.temperature,
        );
        self.send(question).instrument(span).await
    }
}

/// Retries belong to the dispatcher, so the client gives up after the first
/// transient failure instead of backing off on its own.
fn no_retry() -> backoff::ExponentialBackoff {
    backoff::ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

/// Map an [`OpenAIError`] to a [`ProviderError`].
fn map_openai_error(err: OpenAIError) -> ProviderError {
    match &err {
        OpenAIError::ApiError(api_err) => classify_api_error(
            api_err.code.as_deref(),
            api_err.r#type.as_deref(),
            &api_err.message,
        ),
        OpenAIError::Reqwest(reqwest_err) => match reqwest_err.status() {
            Some(status) => classify::from_status(status.as_u16(), None, &err.to_string(), None),
            None => ProviderError::Transport(err.to_string()),
        },
        // Gemini wraps its errors in a JSON array that async-openai cannot
        // parse; the status still shows up in the raw body.
        OpenAIError::JSONDeserialize(_, content) => match classify::from_message(content) {
            ProviderError::Provider { .. } => {
                ProviderError::Deserialization(format!("failed to parse response: {content}"))
            }
            classified => classified,
        },
        OpenAIError::InvalidArgument(msg) => ProviderError::InvalidRequest(msg.clone()),
        _ => classify::from_message(&err.to_string()),
    }
}

/// Code first, then type, then the message text.
fn classify_api_error(code: Option<&str>, error_type: Option<&str>, message: &str) -> ProviderError {
    code.and_then(|c| classify::from_code(c, message, None))
        .or_else(|| error_type.and_then(|t| classify::from_code(t, message, None)))
        .unwrap_or_else(|| classify::from_message(message))
}
