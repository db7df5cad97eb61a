//! Application state shared by the CLI and the HTTP handlers.
//!
//! Pins the generic [`Relay`] to the boxed provider chosen at startup and
//! carries the loaded config plus the server-wide shutdown token.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use askrelay_core::dispatch::{Dispatcher, ExponentialBackoff, TokioSleeper};
use askrelay_core::provider::BoxProviderCall;
use askrelay_core::relay::Relay;
use askrelay_core::sanitize::SanitizeOptions;
use askrelay_infra::config::{apply_env_overrides, load_relay_config};
use askrelay_infra::filesystem::{config_path, resolve_data_dir};
use askrelay_infra::llm::{create_provider, env_lookup, key_present, resolve_provider};
use askrelay_types::config::{ProviderKind, RelayConfig};

pub type ConcreteRelay = Relay<BoxProviderCall>;

/// Checks whether a provider's API key is still available.
pub type KeyCheck = fn(ProviderKind) -> bool;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<ConcreteRelay>,
    pub provider_kind: ProviderKind,
    pub config: Arc<RelayConfig>,
    /// Cancelled on graceful shutdown; every request derives a child token.
    pub shutdown: CancellationToken,
    pub key_check: KeyCheck,
}

impl AppState {
    /// Load config, pick a provider from the environment and build the relay.
    pub async fn init(config_override: Option<&Path>) -> anyhow::Result<Self> {
        let path = match config_override {
            Some(path) => path.to_path_buf(),
            None => config_path(&resolve_data_dir()),
        };

        let mut config = load_relay_config(&path).await;
        apply_env_overrides(&mut config, env_lookup);

        let resolved = resolve_provider(&config.provider, env_lookup)
            .context("failed to select a provider")?;
        let kind = resolved.kind;
        let provider =
            create_provider(resolved, &config.provider).context("failed to create provider")?;

        tracing::info!(provider = %kind, config = %path.display(), "Relay initialized");
        Ok(Self::from_parts(provider, kind, config, |kind| {
            key_present(kind, env_lookup)
        }))
    }

    /// Assemble state from an already-built provider.
    pub fn from_parts(
        provider: BoxProviderCall,
        provider_kind: ProviderKind,
        config: RelayConfig,
        key_check: KeyCheck,
    ) -> Self {
        let dispatcher = Dispatcher::with_parts(
            ExponentialBackoff::from_millis(config.retry.base_delay_ms),
            TokioSleeper,
        );
        let relay = Relay::with_dispatcher(provider, dispatcher)
            .with_sanitize_options(SanitizeOptions::from(&config.sanitizer));

        Self {
            relay: Arc::new(relay),
            provider_kind,
            config: Arc::new(config),
            shutdown: CancellationToken::new(),
            key_check,
        }
    }
}
