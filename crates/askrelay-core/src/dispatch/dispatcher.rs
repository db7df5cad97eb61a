//! Bounded retry loop around a single provider.
//!
//! Retryable errors (rate limit, quota) back off on the configured schedule
//! and try again, up to [`MAX_ATTEMPTS`] total calls. Anything else fails
//! immediately. The cancellation token is checked before each attempt and
//! raced against both the in-flight call and the backoff wait.

use askrelay_types::error::RelayError;
use askrelay_types::provider::ProviderResponse;
use askrelay_types::question::Question;
use tokio_util::sync::CancellationToken;

use super::backoff::{Backoff, ExponentialBackoff};
use super::sleeper::{Sleeper, TokioSleeper};
use crate::provider::ProviderCall;

/// Total provider calls per dispatch, first attempt included.
pub const MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, Default)]
pub struct Dispatcher<B = ExponentialBackoff, S = TokioSleeper> {
    backoff: B,
    sleeper: S,
}

impl Dispatcher {
    /// Default schedule (1s, 2s, 4s, 8s) on the tokio timer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: Backoff, S: Sleeper> Dispatcher<B, S> {
    pub fn with_parts(backoff: B, sleeper: S) -> Self {
        Self { backoff, sleeper }
    }

    /// Call `provider` until it succeeds, fails terminally, exhausts the
    /// attempt budget, or `cancel` fires.
    pub async fn dispatch<P: ProviderCall>(
        &self,
        provider: &P,
        question: &Question,
        cancel: &CancellationToken,
    ) -> Result<ProviderResponse, RelayError> {
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                tracing::debug!(attempt, "Dispatch cancelled before attempt");
                return Err(RelayError::Cancelled);
            }

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(attempt, provider = provider.name(), "Dispatch cancelled mid-call");
                    return Err(RelayError::Cancelled);
                }
                outcome = provider.call(question) => outcome,
            };

            let err = match outcome {
                Ok(response) => {
                    if attempt > 0 {
                        tracing::info!(
                            provider = provider.name(),
                            attempts = attempt + 1,
                            "Provider call succeeded after retry"
                        );
                    }
                    return Ok(response);
                }
                Err(err) => err,
            };

            if !err.is_retryable() {
                tracing::error!(provider = provider.name(), error = %err, "Provider call failed");
                return Err(RelayError::ProviderFailure(err));
            }

            if attempt + 1 >= MAX_ATTEMPTS {
                tracing::warn!(
                    provider = provider.name(),
                    attempts = MAX_ATTEMPTS,
                    error = %err,
                    "Retry budget exhausted"
                );
                return Err(RelayError::RateLimited {
                    attempts: MAX_ATTEMPTS,
                    last_error: err,
                });
            }

            let delay = self.backoff.delay(attempt);
            tracing::warn!(
                provider = provider.name(),
                attempt = attempt + 1,
                max_attempts = MAX_ATTEMPTS,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Rate limited, backing off"
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(attempt, "Dispatch cancelled during backoff");
                    return Err(RelayError::Cancelled);
                }
                _ = self.sleeper.sleep(delay) => {}
            }

            attempt += 1;
        }
    }
}
