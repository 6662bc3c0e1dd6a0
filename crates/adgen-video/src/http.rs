//! Shared wire helpers for provider APIs.

use crate::error::VideoError;

/// Message fragments that indicate a credit/quota problem regardless of
/// the status code the provider chose to send.
const CREDIT_INDICATORS: &[&str] = &[
    "insufficient",
    "credit",
    "balance",
    "quota",
    "limit exceeded",
    "no remaining",
    "payment",
    "subscription",
    "top up",
    "recharge",
    "exhausted",
];

/// Check whether an error message indicates exhausted credits.
pub fn is_credit_error(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let lower = text.to_lowercase();
    CREDIT_INDICATORS.iter().any(|ind| lower.contains(ind))
}

/// Map a provider status code and message onto the error taxonomy.
///
/// Used both for HTTP status codes and for the numeric `code` field some
/// providers echo inside an HTTP 200 body.
pub fn classify_status(code: u16, message: &str) -> VideoError {
    if is_credit_error(message) {
        return VideoError::InsufficientCredits(describe(code, message));
    }
    match code {
        400 => VideoError::InvalidParameter(describe(code, message)),
        401 | 403 => VideoError::AuthenticationFailed(describe(code, message)),
        402 => VideoError::InsufficientCredits(describe(code, message)),
        429 => VideoError::RateLimited(describe(code, message)),
        500..=599 => VideoError::ProviderUnavailable(describe(code, message)),
        _ => VideoError::InvalidResponse(describe(code, message)),
    }
}

/// Build an error from a non-success HTTP response, extracting a
/// human-readable message from common JSON error shapes.
pub async fn error_for_response(response: reqwest::Response) -> VideoError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    classify_status(status, &extract_message(&body))
}

/// Pull a message out of `{"message": ...}`, `{"msg": ...}` or
/// `{"error": {"message": ...}}` bodies; fall back to truncated raw text.
fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "msg", "error"] {
            match value.get(key) {
                Some(serde_json::Value::String(s)) if !s.is_empty() => return s.clone(),
                Some(serde_json::Value::Object(obj)) => {
                    if let Some(serde_json::Value::String(s)) = obj.get("message") {
                        if !s.is_empty() {
                            return s.clone();
                        }
                    }
                }
                _ => {}
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.chars().count() > 200 {
        let head: String = trimmed.chars().take(200).collect();
        format!("{head}...")
    } else {
        trimmed.to_string()
    }
}

fn describe(code: u16, message: &str) -> String {
    if message.is_empty() {
        format!("API error ({code})")
    } else {
        format!("API error ({code}): {message}")
    }
}
