//! `askrelay ask` - one question, one answer, printed to stdout.

use anyhow::Result;
use serde_json::json;

use askrelay_types::error::AnswerError;

use crate::state::AppState;

/// Ask one question. Ctrl+C aborts the call, including any pending backoff.
pub async fn run_ask(
    state: &AppState,
    question: &str,
    system_prompt: Option<&str>,
    json: bool,
) -> Result<()> {
    let cancel = state.shutdown.child_token();
    let watcher = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupted, cancelling");
                cancel.cancel();
            }
        }
    });

    let result = state
        .relay
        .answer_with_cancel(question, system_prompt, &cancel)
        .await;
    watcher.abort();

    match result {
        Ok(answer) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&answer)?);
            } else {
                println!("{}", answer.answer);
            }
            Ok(())
        }
        Err(err) => {
            if json {
                let body = json!({ "error": err.to_string(), "code": error_code(&err) });
                println!("{}", serde_json::to_string_pretty(&body)?);
            }
            Err(err.into())
        }
    }
}

fn error_code(err: &AnswerError) -> &'static str {
    match err {
        AnswerError::Invalid(_) => "VALIDATION_ERROR",
        AnswerError::Relay(relay) => relay.code(),
    }
}
