//! Provider payload and provider error types.
//!
//! A provider call yields either a [`ProviderResponse`] or a classified
//! [`ProviderError`]. The normalizer in askrelay-core reduces the response
//! to a single answer string; the dispatcher uses
//! [`ProviderError::is_retryable`] to decide whether to back off and retry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw payload returned by a provider call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ProviderResponse {
    /// Free text. May still carry a JSON contract, bare or inside a fenced
    /// code block.
    Text(String),
    /// A reply that already arrived as a structured record.
    Contract(AnswerContract),
}

impl From<String> for ProviderResponse {
    fn from(text: String) -> Self {
        ProviderResponse::Text(text)
    }
}

impl From<&str> for ProviderResponse {
    fn from(text: &str) -> Self {
        ProviderResponse::Text(text.to_string())
    }
}

impl From<AnswerContract> for ProviderResponse {
    fn from(contract: AnswerContract) -> Self {
        ProviderResponse::Contract(contract)
    }
}

/// Declared output format of an answer contract. Informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnswerFormat {
    Plain,
    Markdown,
    Html,
    Contract,
    /// Any value the provider sent that we do not recognise, kept verbatim.
    Other(String),
}

impl fmt::Display for AnswerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerFormat::Plain => write!(f, "plain"),
            AnswerFormat::Markdown => write!(f, "markdown"),
            AnswerFormat::Html => write!(f, "html"),
            AnswerFormat::Contract => write!(f, "contract"),
            AnswerFormat::Other(raw) => write!(f, "{raw}"),
        }
    }
}

impl From<&str> for AnswerFormat {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "plain" | "text" => AnswerFormat::Plain,
            "markdown" | "md" => AnswerFormat::Markdown,
            "html" => AnswerFormat::Html,
            "contract" => AnswerFormat::Contract,
            _ => AnswerFormat::Other(s.to_string()),
        }
    }
}

impl From<String> for AnswerFormat {
    fn from(s: String) -> Self {
        AnswerFormat::from(s.as_str())
    }
}

impl From<AnswerFormat> for String {
    fn from(format: AnswerFormat) -> Self {
        format.to_string()
    }
}

/// The `{format, content, brief}` record some providers are prompted to
/// reply with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerContract {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<AnswerFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brief: Option<String>,
}

impl AnswerContract {
    /// Read a contract out of an arbitrary JSON value.
    ///
    /// Returns `None` unless the value is a JSON object. Fields holding
    /// anything other than a string are treated as absent rather than
    /// failing the whole record.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let obj = value.as_object()?;
        let field = |key: &str| obj.get(key).and_then(|v| v.as_str()).map(str::to_string);

        Some(Self {
            format: field("format").map(AnswerFormat::from),
            content: field("content"),
            brief: field("brief"),
        })
    }
}

/// Classified failure of a single provider call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("insufficient credits: {0}")]
    InsufficientCredits(String),

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("provider error: {message}")]
    Provider { message: String },
}

impl ProviderError {
    /// Whether the dispatcher may back off and try again.
    ///
    /// Only rate limiting and quota exhaustion are transient; everything
    /// else (auth, credits, bad requests, transport) fails fast.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited { .. } | ProviderError::QuotaExhausted(_)
        )
    }
}
