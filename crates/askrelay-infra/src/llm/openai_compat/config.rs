//! Configuration and per-provider defaults for OpenAI-compatible providers.

use secrecy::SecretString;

use crate::llm::CallParams;

/// Configuration for an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Provider name reported in logs and health output ("openai", "gemini").
    pub provider_name: String,
    pub base_url: String,
    pub api_key: SecretString,
    pub params: CallParams,
    /// Append the "answer using HTML5 tags" instruction to each question.
    pub html_hint: bool,
}

/// OpenAI. Base URL: `https://api.openai.com/v1`
pub fn openai_defaults(api_key: SecretString, params: CallParams) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: "https://api.openai.com/v1".into(),
        api_key,
        params,
        html_hint: true,
    }
}

/// Google Gemini through its OpenAI-compatible endpoint.
/// Base URL: `https://generativelanguage.googleapis.com/v1beta/openai`
pub fn gemini_defaults(api_key: SecretString, params: CallParams) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "gemini".into(),
        base_url: "https://generativelanguage.googleapis.com/v1beta/openai".into(),
        api_key,
        params,
        html_hint: false,
    }
}

#[cfg(test)]
mod tests {
    use askrelay_types::config::{ProviderKind, ProviderSettings};

    use super::*;

    #[test]
    fn test_openai_defaults() {
        let params = CallParams::for_kind(ProviderKind::OpenAi, &ProviderSettings::default());
        let config = openai_defaults(SecretString::from("sk-test"), params);
        assert_eq!(config.provider_name, "openai");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.params.model, "gpt-4-turbo-preview");
        assert!(config.html_hint);
    }

    #[test]
    fn test_gemini_defaults() {
        let params = CallParams::for_kind(ProviderKind::Gemini, &ProviderSettings::default());
        let config = gemini_defaults(SecretString::from("g-test"), params);
        assert_eq!(config.provider_name, "gemini");
        assert_eq!(
            config.base_url,
            "https://generativelanguage.googleapis.com/v1beta/openai"
        );
        assert_eq!(config.params.model, "gemini-1.5-flash");
        assert!(!config.html_hint);
    }
}
