//! Provider failure classification.
//!
//! Maps HTTP status codes, provider error codes and (as a last resort)
//! message text onto [`ProviderError`]. Structured signals always win over
//! text matching; text is only consulted when nothing else is available or
//! when the provider reports a condition solely in prose (Anthropic's low
//! credit balance arrives as a plain 400 `invalid_request_error`).

use askrelay_types::provider::ProviderError;

/// Classify a failed HTTP response.
///
/// `code` is the provider's machine-readable error code or type, if the
/// body carried one. `retry_after_ms` comes from the `retry-after` header.
pub fn from_status(
    status: u16,
    code: Option<&str>,
    message: &str,
    retry_after_ms: Option<u64>,
) -> ProviderError {
    if let Some(err) = code.and_then(|c| from_code(c, message, retry_after_ms)) {
        return err;
    }

    match status {
        401 => ProviderError::AuthenticationFailed,
        429 => ProviderError::RateLimited { retry_after_ms },
        529 => ProviderError::Overloaded(message.to_string()),
        400..=499 if is_low_credit(message) => {
            ProviderError::InsufficientCredits(message.to_string())
        }
        400..=499 => ProviderError::InvalidRequest(message.to_string()),
        _ => ProviderError::Provider {
            message: format!("HTTP {status}: {message}"),
        },
    }
}

/// Classify a provider error code or type string, if it is one we know.
pub fn from_code(code: &str, message: &str, retry_after_ms: Option<u64>) -> Option<ProviderError> {
    let err = match code {
        "insufficient_quota" | "RESOURCE_EXHAUSTED" | "quota_exceeded" => {
            ProviderError::QuotaExhausted(message.to_string())
        }
        "rate_limit_exceeded" | "rate_limit_error" => ProviderError::RateLimited { retry_after_ms },
        "authentication_error" | "invalid_api_key" | "UNAUTHENTICATED" => {
            ProviderError::AuthenticationFailed
        }
        "overloaded_error" | "UNAVAILABLE" => ProviderError::Overloaded(message.to_string()),
        _ => return None,
    };
    Some(err)
}

/// Last-resort classification from free text.
pub fn from_message(message: &str) -> ProviderError {
    let lower = message.to_lowercase();

    if is_low_credit(&lower) {
        ProviderError::InsufficientCredits(message.to_string())
    } else if lower.contains("insufficient_quota") || lower.contains("resource_exhausted") {
        ProviderError::QuotaExhausted(message.to_string())
    } else if lower.contains("rate limit") || lower.contains("rate_limit") {
        ProviderError::RateLimited {
            retry_after_ms: None,
        }
    } else if lower.contains("incorrect api key") || lower.contains("invalid api key") {
        ProviderError::AuthenticationFailed
    } else if lower.contains("overloaded") {
        ProviderError::Overloaded(message.to_string())
    } else {
        ProviderError::Provider {
            message: message.to_string(),
        }
    }
}

/// Parse a `retry-after` header given in (possibly fractional) seconds.
/// HTTP-date values are ignored.
pub fn parse_retry_after(value: &str) -> Option<u64> {
    let secs: f64 = value.trim().parse().ok()?;
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    Some((secs * 1000.0).round() as u64)
}

fn is_low_credit(message: &str) -> bool {
    message.to_lowercase().contains("credit balance is too low")
}
