//! Question endpoint.
//!
//! POST /ask      - Answer one question through the configured provider.
//! POST /chat/ask - Alias kept for older clients.

use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;

use askrelay_types::error::RelayError;
use askrelay_types::question::RelayAnswer;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: Option<String>,
    pub system_prompt: Option<String>,
}

/// POST /ask - Relay a question and return the sanitized answer.
///
/// The request is cancelled when the server shuts down or when
/// `server.request_deadline_secs` elapses, whichever comes first.
pub async fn ask(
    State(state): State<AppState>,
    body: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<RelayAnswer>, AppError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected request body");
        AppError::MissingQuestion
    })?;
    let question = request.question.ok_or(AppError::MissingQuestion)?;

    let cancel = state.shutdown.child_token();
    let deadline = Duration::from_secs(state.config.server.request_deadline_secs);

    let answer = tokio::select! {
        biased;
        result = state.relay.answer_with_cancel(
            &question,
            request.system_prompt.as_deref(),
            &cancel,
        ) => result?,
        _ = tokio::time::sleep(deadline) => {
            cancel.cancel();
            tracing::warn!(deadline_secs = deadline.as_secs(), "Request deadline exceeded");
            return Err(RelayError::Cancelled.into());
        }
    };

    Ok(Json(answer))
}
