//! Provider-call pipeline for askrelay.
//!
//! This crate owns the parts with real invariants: the retrying
//! [`dispatch::Dispatcher`], the [`normalize`] step that reduces provider
//! payloads to one answer string, the allow-list [`sanitize`] pass, and the
//! [`relay::Relay`] that composes them. It depends only on `askrelay-types`
//! and never on an HTTP client; concrete providers live in askrelay-infra.

pub mod dispatch;
pub mod normalize;
pub mod provider;
pub mod relay;
pub mod sanitize;
