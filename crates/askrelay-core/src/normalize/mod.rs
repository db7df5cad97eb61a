//! Response normalization.
//!
//! Providers reply in one of three shapes: free text, a `{format, content,
//! brief}` record, or free text wrapping that record in a fenced code block.
//! [`classify`] picks the shape deterministically and [`normalize`] reduces
//! it to a single non-empty answer string.
//!
//! A fenced block that does not yield an answer falls back to the whole
//! original text, fence markers included. Callers will see the fences in
//! that case.

mod fence;

use std::borrow::Cow;

use askrelay_types::error::RelayError;
use askrelay_types::provider::{AnswerContract, ProviderResponse};

/// The recognized payload shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape<'a> {
    /// Free text, used verbatim.
    Plain(&'a str),
    /// A record, either delivered as one or parsed from a bare JSON object.
    Structured(Cow<'a, AnswerContract>),
    /// Free text containing a `json` (or unlabelled) fenced block.
    Fenced { raw: &'a str, body: &'a str },
}

/// A single, non-empty answer string extracted from a provider payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAnswer(String);

impl NormalizedAnswer {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Decide which shape a payload has. Never fails.
pub fn classify(response: &ProviderResponse) -> ResponseShape<'_> {
    match response {
        ProviderResponse::Contract(contract) => ResponseShape::Structured(Cow::Borrowed(contract)),
        ProviderResponse::Text(raw) => {
            if let Some(contract) = parse_contract(raw) {
                ResponseShape::Structured(Cow::Owned(contract))
            } else if let Some(body) = fence::json_fence_body(raw) {
                ResponseShape::Fenced { raw, body }
            } else {
                ResponseShape::Plain(raw)
            }
        }
    }
}

/// Reduce a provider payload to one answer string.
pub fn normalize(response: &ProviderResponse) -> Result<NormalizedAnswer, RelayError> {
    match classify(response) {
        ResponseShape::Plain(raw) => plain(raw),
        ResponseShape::Structured(contract) => preferred_text(&contract)
            .map(|text| NormalizedAnswer(text.to_string()))
            .ok_or_else(|| {
                RelayError::MalformedResponse("record has no content or brief".to_string())
            }),
        ResponseShape::Fenced { raw, body } => {
            let contract = parse_contract(body);
            match contract.as_ref().and_then(preferred_text) {
                Some(text) => Ok(NormalizedAnswer(text.to_string())),
                None => {
                    tracing::debug!("Fenced block held no usable record, using raw text");
                    plain(raw)
                }
            }
        }
    }
}

fn plain(raw: &str) -> Result<NormalizedAnswer, RelayError> {
    if raw.trim().is_empty() {
        return Err(RelayError::MalformedResponse(
            "provider returned an empty answer".to_string(),
        ));
    }
    Ok(NormalizedAnswer(raw.to_string()))
}

/// `content` if non-blank, otherwise `brief` if non-blank. `format` is
/// ignored.
fn preferred_text(contract: &AnswerContract) -> Option<&str> {
    non_blank(&contract.content).or_else(|| non_blank(&contract.brief))
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

/// Only a JSON object counts as a record.
fn parse_contract(text: &str) -> Option<AnswerContract> {
    let value: serde_json::Value = serde_json::from_str(text.trim()).ok()?;
    AnswerContract::from_json(&value)
}

#[cfg(test)]
mod tests {
    use askrelay_types::provider::AnswerFormat;

    use super::*;

    fn text(s: &str) -> ProviderResponse {
        ProviderResponse::Text(s.to_string())
    }

    fn answer(response: &ProviderResponse) -> String {
        normalize(response).unwrap().into_string()
    }

    #[test]
    fn test_plain_text_is_verbatim() {
        assert_eq!(answer(&text("hello")), "hello");
        assert_eq!(answer(&text("  **4**\n")), "  **4**\n");
    }

    #[test]
    fn test_record_prefers_content() {
        let response = ProviderResponse::Contract(AnswerContract {
            format: Some(AnswerFormat::Contract),
            content: Some("X".into()),
            brief: Some("Y".into()),
        });
        assert_eq!(answer(&response), "X");
    }

    #[test]
    fn test_record_falls_back_to_brief() {
        let response = ProviderResponse::Contract(AnswerContract {
            format: Some(AnswerFormat::Contract),
            content: None,
            brief: Some("Y".into()),
        });
        assert_eq!(answer(&response), "Y");

        let blank_content = ProviderResponse::Contract(AnswerContract {
            format: None,
            content: Some("   ".into()),
            brief: Some("Y".into()),
        });
        assert_eq!(answer(&blank_content), "Y");
    }

    #[test]
    fn test_format_does_not_gate_extraction() {
        let response = ProviderResponse::Contract(AnswerContract {
            format: Some(AnswerFormat::Other("latex".into())),
            content: Some("X".into()),
            brief: None,
        });
        assert_eq!(answer(&response), "X");
    }

    #[test]
    fn test_text_that_parses_as_record() {
        let response = text(r#"{"format": "contract", "content": "X", "brief": "Y"}"#);
        assert!(matches!(classify(&response), ResponseShape::Structured(_)));
        assert_eq!(answer(&response), "X");
    }

    #[test]
    fn test_fenced_record() {
        let response = text("```json\n{\"content\":\"Z\"}\n```");
        assert!(matches!(classify(&response), ResponseShape::Fenced { .. }));
        assert_eq!(answer(&response), "Z");
    }

    #[test]
    fn test_fenced_brief_with_surrounding_prose() {
        let response = text("Sure!\n```\n{\"brief\": \"short\"}\n```\nAnything else?");
        assert_eq!(answer(&response), "short");
    }

    #[test]
    fn test_fenced_non_json_falls_back_to_raw() {
        let raw = "```json\nnot json\n```";
        assert_eq!(answer(&text(raw)), raw);
    }

    #[test]
    fn test_fenced_whitespace_body_falls_back_to_raw() {
        let raw = "Look:\n```json\n  \n```";
        assert_eq!(answer(&text(raw)), raw);
    }

    #[test]
    fn test_fenced_record_without_fields_falls_back_to_raw() {
        let raw = "```json\n{\"format\": \"plain\"}\n```";
        assert_eq!(answer(&text(raw)), raw);
    }

    #[test]
    fn test_other_language_fence_is_plain() {
        let raw = "```rust\nfn main() {}\n```";
        assert_eq!(classify(&text(raw)), ResponseShape::Plain(raw));
        assert_eq!(answer(&text(raw)), raw);
    }

    #[test]
    fn test_empty_record_is_malformed() {
        let err = normalize(&text("{}")).unwrap_err();
        assert!(matches!(err, RelayError::MalformedResponse(_)));

        let err = normalize(&ProviderResponse::Contract(AnswerContract::default())).unwrap_err();
        assert!(matches!(err, RelayError::MalformedResponse(_)));
    }

    #[test]
    fn test_empty_text_is_malformed() {
        assert!(matches!(
            normalize(&text("")),
            Err(RelayError::MalformedResponse(_))
        ));
        assert!(matches!(
            normalize(&text(" \n\t")),
            Err(RelayError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_json_array_is_plain_text() {
        assert_eq!(answer(&text("[1, 2, 3]")), "[1, 2, 3]");
    }
}
