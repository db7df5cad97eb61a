//! LLM provider implementations.
//!
//! Concrete [`ProviderCall`](askrelay_core::provider::ProviderCall)
//! implementations for Anthropic and the OpenAI-compatible APIs (OpenAI,
//! Gemini), plus provider selection from the environment
//! ([`resolve_provider`]) and a factory ([`create_provider`]).

pub mod anthropic;
pub mod classify;
pub mod openai_compat;

use std::time::Duration;

use secrecy::SecretString;

use askrelay_core::provider::BoxProviderCall;
use askrelay_types::config::{ProviderKind, ProviderSettings};
use askrelay_types::question::Question;

use self::anthropic::AnthropicProvider;
use self::openai_compat::OpenAiCompatibleProvider;

/// Auto-detection order when no provider is pinned in config.
pub const DETECTION_ORDER: [ProviderKind; 3] = [
    ProviderKind::OpenAi,
    ProviderKind::Anthropic,
    ProviderKind::Gemini,
];

/// Failures while choosing or constructing a provider. All are startup
/// errors; none can happen per request.
#[derive(Debug, thiserror::Error)]
pub enum ProviderSetupError {
    #[error("no API key found; set one of OPENAI_API_KEY, CLAUDE_API_KEY, ANTHROPIC_API_KEY or GEMINI_API_KEY")]
    NoApiKey,

    #[error("provider '{kind}' is configured but none of {vars} is set")]
    MissingKey { kind: ProviderKind, vars: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Per-call request parameters shared by every provider client.
#[derive(Debug, Clone, PartialEq)]
pub struct CallParams {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub default_system_prompt: String,
    pub timeout: Duration,
}

impl CallParams {
    pub fn for_kind(kind: ProviderKind, settings: &ProviderSettings) -> Self {
        Self {
            model: settings
                .model
                .clone()
                .unwrap_or_else(|| kind.default_model().to_string()),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            default_system_prompt: settings.default_system_prompt.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    /// The caller's system prompt, or the configured default.
    pub fn system_prompt<'a>(&'a self, question: &'a Question) -> &'a str {
        question
            .system_prompt()
            .unwrap_or(&self.default_system_prompt)
    }
}

/// The provider chosen at startup and the key it will use.
pub struct ResolvedProvider {
    pub kind: ProviderKind,
    pub api_key: SecretString,
}

/// Pick a provider and its API key.
///
/// A pinned `settings.kind` must have its key present. Otherwise the first
/// provider in [`DETECTION_ORDER`] with a non-blank key wins. `lookup` reads
/// one environment variable; pass [`env_lookup`] in production.
pub fn resolve_provider<F>(
    settings: &ProviderSettings,
    lookup: F,
) -> Result<ResolvedProvider, ProviderSetupError>
where
    F: Fn(&str) -> Option<String>,
{
    let candidates: &[ProviderKind] = match &settings.kind {
        Some(kind) => std::slice::from_ref(kind),
        None => &DETECTION_ORDER,
    };

    for kind in candidates {
        if let Some(key) = find_key(*kind, &lookup) {
            tracing::debug!(provider = %kind, "Selected provider");
            return Ok(ResolvedProvider {
                kind: *kind,
                api_key: SecretString::from(key),
            });
        }
    }

    Err(match settings.kind {
        Some(kind) => ProviderSetupError::MissingKey {
            kind,
            vars: kind.key_vars().join(", "),
        },
        None => ProviderSetupError::NoApiKey,
    })
}

/// Whether `kind` still has a usable key. Used by the health check.
pub fn key_present<F>(kind: ProviderKind, lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    find_key(kind, &lookup).is_some()
}

/// Read a variable from the process environment.
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn find_key<F>(kind: ProviderKind, lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    kind.key_vars()
        .iter()
        .filter_map(|var| lookup(var))
        .find(|value| !value.trim().is_empty())
}

/// Build the boxed provider client for `resolved`.
pub fn create_provider(
    resolved: ResolvedProvider,
    settings: &ProviderSettings,
) -> Result<BoxProviderCall, ProviderSetupError> {
    let params = CallParams::for_kind(resolved.kind, settings);

    let provider = match resolved.kind {
        ProviderKind::Anthropic => {
            let mut provider = AnthropicProvider::new(resolved.api_key, params)?;
            if let Some(base_url) = &settings.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            BoxProviderCall::new(provider)
        }
        ProviderKind::OpenAi => {
            let mut config = openai_compat::config::openai_defaults(resolved.api_key, params);
            config.html_hint = settings.html_hint;
            if let Some(base_url) = &settings.base_url {
                config.base_url = base_url.clone();
            }
            BoxProviderCall::new(OpenAiCompatibleProvider::new(config))
        }
        ProviderKind::Gemini => {
            let mut config = openai_compat::config::gemini_defaults(resolved.api_key, params);
            if let Some(base_url) = &settings.base_url {
                config.base_url = base_url.clone();
            }
            BoxProviderCall::new(OpenAiCompatibleProvider::new(config))
        }
    };

    tracing::info!(provider = %resolved.kind, "Provider client ready");
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use askrelay_core::provider::ProviderCall;
    use secrecy::ExposeSecret;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_openai_wins_auto_detection() {
        let lookup = env(&[("GEMINI_API_KEY", "g"), ("OPENAI_API_KEY", "sk-o")]);
        let resolved = resolve_provider(&ProviderSettings::default(), lookup).unwrap();
        assert_eq!(resolved.kind, ProviderKind::OpenAi);
        assert_eq!(resolved.api_key.expose_secret(), "sk-o");
    }

    #[test]
    fn test_anthropic_from_either_variable() {
        let resolved =
            resolve_provider(&ProviderSettings::default(), env(&[("CLAUDE_API_KEY", "c")])).unwrap();
        assert_eq!(resolved.kind, ProviderKind::Anthropic);

        let resolved =
            resolve_provider(&ProviderSettings::default(), env(&[("ANTHROPIC_API_KEY", "a")]))
                .unwrap();
        assert_eq!(resolved.kind, ProviderKind::Anthropic);
        assert_eq!(resolved.api_key.expose_secret(), "a");
    }

    #[test]
    fn test_blank_key_is_ignored() {
        let lookup = env(&[("OPENAI_API_KEY", "  "), ("GEMINI_API_KEY", "g")]);
        let resolved = resolve_provider(&ProviderSettings::default(), lookup).unwrap();
        assert_eq!(resolved.kind, ProviderKind::Gemini);
    }

    #[test]
    fn test_no_key_is_an_error() {
        let err = resolve_provider(&ProviderSettings::default(), env(&[])).err().unwrap();
        assert!(matches!(err, ProviderSetupError::NoApiKey));
    }

    #[test]
    fn test_pinned_kind_requires_its_own_key() {
        let settings = ProviderSettings {
            kind: Some(ProviderKind::Gemini),
            ..Default::default()
        };
        let err = resolve_provider(&settings, env(&[("OPENAI_API_KEY", "sk")]))
            .err()
            .unwrap();
        match err {
            ProviderSetupError::MissingKey { kind, vars } => {
                assert_eq!(kind, ProviderKind::Gemini);
                assert_eq!(vars, "GEMINI_API_KEY");
            }
            other => panic!("expected MissingKey, got {other:?}"),
        }
    }

    #[test]
    fn test_key_present() {
        let lookup = env(&[("CLAUDE_API_KEY", "c")]);
        assert!(key_present(ProviderKind::Anthropic, &lookup));
        assert!(!key_present(ProviderKind::OpenAi, &lookup));
    }

    #[test]
    fn test_call_params_defaults_per_kind() {
        let settings = ProviderSettings::default();
        let params = CallParams::for_kind(ProviderKind::Gemini, &settings);
        assert_eq!(params.model, "gemini-1.5-flash");
        assert_eq!(params.max_tokens, 1024);
        assert_eq!(params.timeout, Duration::from_secs(120));

        let pinned = ProviderSettings {
            model: Some("gpt-4o".into()),
            ..Default::default()
        };
        assert_eq!(CallParams::for_kind(ProviderKind::OpenAi, &pinned).model, "gpt-4o");
    }

    #[test]
    fn test_system_prompt_fallback() {
        let params = CallParams::for_kind(ProviderKind::OpenAi, &ProviderSettings::default());
        let plain = Question::new("Q", None).unwrap();
        assert_eq!(params.system_prompt(&plain), params.default_system_prompt);

        let custom = Question::new("Q", Some("Be brief.")).unwrap();
        assert_eq!(params.system_prompt(&custom), "Be brief.");
    }

    #[test]
    fn test_create_provider_names() {
        let settings = ProviderSettings::default();
        for (kind, name) in [
            (ProviderKind::OpenAi, "openai"),
            (ProviderKind::Anthropic, "anthropic"),
            (ProviderKind::Gemini, "gemini"),
        ] {
            let resolved = ResolvedProvider {
                kind,
                api_key: SecretString::from("test-key-not-real"),
            };
            let provider = create_provider(resolved, &settings).unwrap();
            assert_eq!(provider.name(), name);
        }
    }
}
