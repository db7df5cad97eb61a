//! Anthropic Claude provider (Messages API over reqwest).

pub mod client;
pub mod types;

pub use client::AnthropicProvider;
