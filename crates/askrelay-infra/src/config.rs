//! `relay.toml` loader.
//!
//! Reads the config file and deserializes it into [`RelayConfig`]. A
//! missing file is normal and yields defaults; an unreadable or malformed
//! file is logged and also yields defaults, so a bad edit never stops the
//! relay from starting.

use std::path::Path;

use askrelay_types::config::RelayConfig;

/// Overrides the default system prompt when set and non-blank.
pub const SYSTEM_PROMPT_VAR: &str = "DEFAULT_SYSTEM_PROMPT";

/// Load configuration from `path`.
pub async fn load_relay_config(path: &Path) -> RelayConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return RelayConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return RelayConfig::default();
        }
    };

    match toml::from_str::<RelayConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            RelayConfig::default()
        }
    }
}

/// Apply environment overrides on top of a loaded config.
pub fn apply_env_overrides<F>(config: &mut RelayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(prompt) = lookup(SYSTEM_PROMPT_VAR).filter(|p| !p.trim().is_empty()) {
        tracing::debug!("Default system prompt overridden from environment");
        config.provider.default_system_prompt = prompt;
    }
}
