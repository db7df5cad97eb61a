//! Configuration types for askrelay.
//!
//! `RelayConfig` represents `relay.toml`. Every field has a default so an
//! empty or missing file yields a working configuration; API keys are never
//! stored here, they come from the environment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// System prompt used when the caller supplies none.
pub const DEFAULT_SYSTEM_PROMPT: &str = "In all your responses, please focus on substance over praise. \
Skip unnecessary compliments, engage critically with my ideas, question my assumptions, \
identify my biases, and offer counterpoints when relevant. Don’t shy away from disagreement, \
and ensure that any agreements you have are grounded in reason and evidence.";

/// Which provider backend answers questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Gemini,
}

impl ProviderKind {
    /// Environment variables that may hold this provider's API key, in
    /// lookup order.
    pub fn key_vars(&self) -> &'static [&'static str] {
        match self {
            ProviderKind::OpenAi => &["OPENAI_API_KEY"],
            ProviderKind::Anthropic => &["CLAUDE_API_KEY", "ANTHROPIC_API_KEY"],
            ProviderKind::Gemini => &["GEMINI_API_KEY"],
        }
    }

    /// Model used when the config does not name one.
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "gpt-4-turbo-preview",
            ProviderKind::Anthropic => "claude-3-5-sonnet-20240620",
            ProviderKind::Gemini => "gemini-1.5-flash",
        }
    }

    /// Human-facing label, e.g. for page titles.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "ChatGPT",
            ProviderKind::Anthropic => "Claude",
            ProviderKind::Gemini => "Gemini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::OpenAi => write!(f, "openai"),
            ProviderKind::Anthropic => write!(f, "anthropic"),
            ProviderKind::Gemini => write!(f, "gemini"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "gemini" => Ok(ProviderKind::Gemini),
            other => Err(format!("invalid provider kind: '{other}'")),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub sanitizer: SanitizerSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

/// Provider selection and request parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Pin a backend. When absent, the first provider with a key in the
    /// environment wins (OpenAI, then Anthropic, then Gemini).
    #[serde(default)]
    pub kind: Option<ProviderKind>,
    /// Model override; defaults to [`ProviderKind::default_model`].
    #[serde(default)]
    pub model: Option<String>,
    /// Base URL override (proxies, tests).
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Append an "answer using HTML5 tags" hint to questions (OpenAI only).
    #[serde(default = "default_html_hint")]
    pub html_hint: bool,
    #[serde(default = "default_system_prompt")]
    pub default_system_prompt: String,
    /// Per-request HTTP timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_temperature() -> f64 {
    0.2
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_html_hint() -> bool {
    true
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: None,
            model: None,
            base_url: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            html_hint: default_html_hint(),
            default_system_prompt: default_system_prompt(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Backoff tuning. The attempt ceiling is fixed; only the base unit moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_base_delay_ms() -> u64 {
    1000
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

/// Optional sanitizer passes. Both are off unless configured.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SanitizerSettings {
    #[serde(default)]
    pub unwrap_document: bool,
    #[serde(default)]
    pub preserve_newlines: bool,
}

/// HTTP surface settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Hard ceiling for one `/ask` request, retries included.
    #[serde(default = "default_request_deadline_secs")]
    pub request_deadline_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    48080
}

fn default_request_deadline_secs() -> u64 {
    300
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_deadline_secs: default_request_deadline_secs(),
        }
    }
}
