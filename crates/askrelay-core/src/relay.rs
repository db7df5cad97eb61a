//! Relay -- question in, sanitized answer out.
//!
//! Validate, dispatch, normalize, sanitize. The relay holds no mutable
//! state, so one instance serves any number of concurrent `answer` calls.

use askrelay_types::error::AnswerError;
use askrelay_types::question::{Question, RelayAnswer};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::dispatch::{Backoff, Dispatcher, ExponentialBackoff, Sleeper, TokioSleeper};
use crate::normalize::normalize;
use crate::provider::ProviderCall;
use crate::sanitize::{SanitizeOptions, sanitize_with};

pub struct Relay<P, B = ExponentialBackoff, S = TokioSleeper> {
    provider: P,
    dispatcher: Dispatcher<B, S>,
    sanitize: SanitizeOptions,
}

impl<P: ProviderCall> Relay<P> {
    /// Relay with the default retry schedule and sanitizer options.
    pub fn new(provider: P) -> Self {
        Self::with_dispatcher(provider, Dispatcher::new())
    }
}

impl<P: ProviderCall, B: Backoff, S: Sleeper> Relay<P, B, S> {
    pub fn with_dispatcher(provider: P, dispatcher: Dispatcher<B, S>) -> Self {
        Self {
            provider,
            dispatcher,
            sanitize: SanitizeOptions::default(),
        }
    }

    pub fn with_sanitize_options(mut self, options: SanitizeOptions) -> Self {
        self.sanitize = options;
        self
    }

    /// Answer one question. Never cancelled from outside.
    pub async fn answer(
        &self,
        question: &str,
        system_prompt: Option<&str>,
    ) -> Result<RelayAnswer, AnswerError> {
        self.answer_with_cancel(question, system_prompt, &CancellationToken::new())
            .await
    }

    /// Answer one question, aborting promptly once `cancel` fires.
    ///
    /// An empty question fails before any provider call. Dispatcher errors
    /// pass through unchanged; a reply with no extractable answer is
    /// `MalformedResponse`.
    pub async fn answer_with_cancel(
        &self,
        question: &str,
        system_prompt: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<RelayAnswer, AnswerError> {
        let question = Question::new(question, system_prompt)?;

        let span = tracing::info_span!(
            "relay.answer",
            provider = self.provider.name(),
            question.len = question.text().len(),
            custom_system_prompt = question.system_prompt().is_some(),
        );

        async {
            let raw = self
                .dispatcher
                .dispatch(&self.provider, &question, cancel)
                .await?;
            let normalized = normalize(&raw)?;
            let answer = sanitize_with(normalized.as_str(), self.sanitize);

            tracing::debug!(answer.len = answer.len(), "Answer ready");
            Ok::<_, AnswerError>(RelayAnswer {
                question: question.text().to_string(),
                answer,
            })
        }
        .instrument(span)
        .await
    }
}
