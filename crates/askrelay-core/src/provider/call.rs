//! ProviderCall trait definition.
//!
//! The single capability the pipeline consumes: send one question to a
//! provider and get back either a raw payload or a classified error.

use std::future::Future;

use askrelay_types::provider::{ProviderError, ProviderResponse};
use askrelay_types::question::Question;

/// A provider backend (OpenAI, Anthropic, Gemini, or a test stub).
///
/// Implementations must be safe to share across concurrent `answer` calls;
/// the core never serializes access. Rate-limit and quota conditions must be
/// reported as errors for which [`ProviderError::is_retryable`] is true.
pub trait ProviderCall: Send + Sync {
    /// Short provider name for logs and health output (e.g. "openai").
    fn name(&self) -> &str;

    /// Ask one question. The system prompt travels inside `question`.
    fn call(
        &self,
        question: &Question,
    ) -> impl Future<Output = Result<ProviderResponse, ProviderError>> + Send;
}
