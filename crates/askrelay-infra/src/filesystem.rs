//! Data directory layout.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_VAR: &str = "ASKRELAY_DATA_DIR";

/// Name of the config file inside the data directory.
pub const CONFIG_FILE: &str = "relay.toml";

/// Resolve the data directory from the process environment.
///
/// Priority:
/// 1. `ASKRELAY_DATA_DIR`
/// 2. `~/.askrelay`
/// 3. `./.askrelay` when no home directory is known
pub fn resolve_data_dir() -> PathBuf {
    resolve_data_dir_with(|name| std::env::var(name).ok())
}

/// [`resolve_data_dir`] with an injectable environment lookup.
pub fn resolve_data_dir_with<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = lookup(DATA_DIR_VAR).filter(|d| !d.trim().is_empty()) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".askrelay");
    }

    PathBuf::from(".askrelay")
}

/// `{data_dir}/relay.toml`.
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}
