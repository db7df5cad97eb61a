//! Shared domain types for askrelay.
//!
//! Questions, provider payloads, relay answers, configuration, and the
//! error enums that flow between the core pipeline and its collaborators.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, thiserror.

pub mod config;
pub mod error;
pub mod provider;
pub mod question;
