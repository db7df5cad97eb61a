//! Infrastructure for askrelay: concrete provider clients, the provider
//! factory, `relay.toml` loading and data directory resolution.

pub mod config;
pub mod filesystem;
pub mod llm;
