//! AnthropicProvider -- [`ProviderCall`] for the Anthropic Messages API.
//!
//! Sends one user message per call to `/v1/messages` and concatenates the
//! text blocks of the reply. The API key is a [`SecretString`] and is only
//! exposed while building the request headers.

use secrecy::{ExposeSecret, SecretString};
use tracing::Instrument;

use askrelay_core::provider::ProviderCall;
use askrelay_types::provider::{ProviderError, ProviderResponse};
use askrelay_types::question::Question;

use super::types::{
    AnthropicContentBlock, AnthropicErrorResponse, AnthropicMessage, AnthropicRequest,
    AnthropicResponse,
};
use crate::llm::classify;
use crate::llm::{CallParams, ProviderSetupError};

/// Anthropic Claude provider.
///
/// Does not derive Debug so the key cannot leak through `{:?}`.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    params: CallParams,
}

impl AnthropicProvider {
    const API_VERSION: &'static str = "2023-06-01";
    const DEFAULT_BASE_URL: &'static str = "https://api.anthropic.com";

    pub fn new(api_key: SecretString, params: CallParams) -> Result<Self, ProviderSetupError> {
        let client = reqwest::Client::builder()
            .timeout(params.timeout)
            .build()
            .map_err(|e| ProviderSetupError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            params,
        })
    }

    /// Override the base URL (proxies, tests).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn to_anthropic_request(&self, question: &Question) -> AnthropicRequest {
        AnthropicRequest {
            model: self.params.model.clone(),
            max_tokens: self.params.max_tokens,
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: question.text().to_string(),
            }],
            system: Some(self.params.system_prompt(question).to_string()),
            temperature: Some(self.params.temperature),
        }
    }

    async fn send(&self, question: &Question) -> Result<ProviderResponse, ProviderError> {
        let body = self.to_anthropic_request(question);

        let response = self
            .client
            .post(self.url("/v1/messages"))
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", Self::API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_ms = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(classify::parse_retry_after);
            let error_body = response.text().await.unwrap_or_default();
            return Err(classify_error_body(status.as_u16(), &error_body, retry_after_ms));
        }

        let anthropic_resp: AnthropicResponse = response.json().await.map_err(|e| {
            ProviderError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        tracing::debug!(
            gen_ai.response.id = %anthropic_resp.id,
            gen_ai.response.model = %anthropic_resp.model,
            gen_ai.response.finish_reason = ?anthropic_resp.stop_reason,
            "Received Anthropic response"
        );

        Ok(ProviderResponse::Text(collect_text(&anthropic_resp.content)))
    }
}

impl ProviderCall for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn call(&self, question: &Question) -> Result<ProviderResponse, ProviderError> {
        let span = tracing::info_span!(
            "gen_ai.complete",
            gen_ai.system = "anthropic",
            gen_ai.request.model = %self.params.model,
            gen_ai.request.max_tokens = self.params.max_tokens,
            gen_ai.request.temperature = self.params.temperature,
        );
        self.send(question).instrument(span).await
    }
}

fn collect_text(blocks: &[AnthropicContentBlock]) -> String {
    blocks
        .iter()
        .filter_map(|block| match block {
            AnthropicContentBlock::Text { text } => Some(text.as_str()),
            AnthropicContentBlock::Other => None,
        })
        .collect::<Vec<_>>()
        .join("")
}

/// Classify a non-2xx response from its status and error envelope.
fn classify_error_body(status: u16, body: &str, retry_after_ms: Option<u64>) -> ProviderError {
    match serde_json::from_str::<AnthropicErrorResponse>(body) {
        Ok(envelope) => classify::from_status(
            status,
            Some(envelope.error.error_type.as_str()),
            &envelope.error.message,
            retry_after_ms,
        ),
        Err(_) => classify::from_status(status, None, body, retry_after_ms),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use askrelay_types::config::DEFAULT_SYSTEM_PROMPT;

    use super::*;

    fn params() -> CallParams {
        CallParams {
            model: "claude-3-5-sonnet-20240620".to_string(),
            temperature: 0.2,
            max_tokens: 1024,
            default_system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    fn make_provider() -> AnthropicProvider {
        AnthropicProvider::new(SecretString::from("test-key-not-real"), params()).unwrap()
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(make_provider().name(), "anthropic");
    }

    #[test]
    fn test_request_uses_default_system_prompt() {
        let provider = make_provider();
        let question = Question::new("What is 2+2?", None).unwrap();
        let req = provider.to_anthropic_request(&question);

        assert_eq!(req.model, "claude-3-5-sonnet-20240620");
        assert_eq!(req.max_tokens, 1024);
        assert_eq!(req.temperature, Some(0.2));
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].role, "user");
        assert_eq!(req.messages[0].content, "What is 2+2?");
        assert_eq!(req.system.as_deref(), Some(DEFAULT_SYSTEM_PROMPT));
    }

    #[test]
    fn test_request_uses_caller_system_prompt() {
        let provider = make_provider();
        let question = Question::new("Q", Some("Reply in French.")).unwrap();
        let req = provider.to_anthropic_request(&question);
        assert_eq!(req.system.as_deref(), Some("Reply in French."));
    }

    #[test]
    fn test_base_url_override() {
        let provider = make_provider().with_base_url("http://localhost:8080/".to_string());
        assert_eq!(provider.url("/v1/messages"), "http://localhost:8080/v1/messages");
    }

    #[test]
    fn test_collect_text_skips_other_blocks() {
        let blocks = vec![
            AnthropicContentBlock::Text {
                text: "**4**".into(),
            },
            AnthropicContentBlock::Other,
            AnthropicContentBlock::Text { text: "!".into() },
        ];
        assert_eq!(collect_text(&blocks), "**4**!");
    }

    #[test]
    fn test_classify_rate_limit_envelope() {
        let body = r#"{"type":"error","error":{"type":"rate_limit_error","message":"Number of requests has exceeded your rate limit"}}"#;
        assert_eq!(
            classify_error_body(429, body, Some(1000)),
            ProviderError::RateLimited {
                retry_after_ms: Some(1000)
            }
        );
    }

    #[test]
    fn test_classify_low_credit_envelope() {
        let body = r#"{"type":"error","error":{"type":"invalid_request_error","message":"Your credit balance is too low to access the Anthropic API. Please go to Plans & Billing to upgrade or purchase credits."}}"#;
        assert!(matches!(
            classify_error_body(400, body, None),
            ProviderError::InsufficientCredits(_)
        ));
    }

    #[test]
    fn test_classify_overloaded_envelope() {
        let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        assert_eq!(
            classify_error_body(529, body, None),
            ProviderError::Overloaded("Overloaded".to_string())
        );
    }

    #[test]
    fn test_classify_non_json_body() {
        assert_eq!(
            classify_error_body(401, "<html>denied</html>", None),
            ProviderError::AuthenticationFailed
        );
        assert_eq!(
            classify_error_body(502, "bad gateway", None),
            ProviderError::Provider {
                message: "HTTP 502: bad gateway".to_string()
            }
        );
    }
}
