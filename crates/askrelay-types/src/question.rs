//! Question and answer values exchanged with the relay.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A validated question bound for a provider.
///
/// `text` is guaranteed non-empty after trimming. A blank system prompt is
/// stored as `None` so providers fall back to their configured default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    text: String,
    system_prompt: Option<String>,
}

impl Question {
    /// Validate and build a question.
    ///
    /// The text is kept exactly as supplied (it is echoed back to the
    /// caller); only the emptiness check looks at the trimmed form.
    pub fn new(
        text: impl Into<String>,
        system_prompt: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyQuestion);
        }

        let system_prompt = system_prompt
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(Self {
            text,
            system_prompt,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }
}

/// The relay's successful outcome: the original question paired with the
/// sanitized answer, ready to be persisted or displayed by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayAnswer {
    pub question: String,
    pub answer: String,
}
