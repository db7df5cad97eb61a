use thiserror::Error;

use crate::provider::ProviderError;

/// Caller-input errors, rejected before any provider call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("question must not be empty")]
    EmptyQuestion,
}

/// Terminal outcomes of the provider-call pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RelayError {
    /// Every attempt failed with a rate-limit or quota error.
    #[error("rate limited after {attempts} attempts: {last_error}")]
    RateLimited { attempts: u32, last_error: ProviderError },

    /// The provider failed with an error that retrying cannot fix.
    #[error("provider failure: {0}")]
    ProviderFailure(ProviderError),

    /// The provider replied, but no answer could be extracted.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The caller aborted the call (cancellation or deadline).
    #[error("cancelled")]
    Cancelled,
}

impl RelayError {
    /// Stable machine-readable code, used by the HTTP and CLI surfaces.
    pub fn code(&self) -> &'static str {
        match self {
            RelayError::RateLimited { .. } => "RATE_LIMITED",
            RelayError::ProviderFailure(_) => "PROVIDER_FAILURE",
            RelayError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            RelayError::Cancelled => "CANCELLED",
        }
    }
}

/// Everything `Relay::answer` can fail with: bad input or a relay outcome.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnswerError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Relay(#[from] RelayError),
}
