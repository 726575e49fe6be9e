//! Error taxonomy for backend calls.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Failure of a single backend request.
///
/// The variants map one-to-one onto how the UI reacts: `NotFound` degrades to
/// an empty/placeholder state, `ValidationRejected` is shown verbatim next to
/// the form that produced it, and `NetworkFailure`/`Decode` surface as a
/// generic, retry-able notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{what} not found")]
    NotFound { what: String },

    #[error("{message}")]
    ValidationRejected { message: String },

    #[error("Network failure: {message}")]
    NetworkFailure { message: String },

    #[error("Malformed response: {message}")]
    Decode { message: String },
}

impl ApiError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationRejected { message: message.into() }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkFailure { message: message.into() }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode { message: message.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return Self::decode(error.to_string());
        }
        Self::network(error.to_string())
    }
}

/// Classify a non-success HTTP response.
///
/// `what` names the resource for `NotFound` messages (e.g., "record 42").
pub fn error_for_status(status: StatusCode, body: &str, what: &str) -> ApiError {
    match status {
        StatusCode::NOT_FOUND => ApiError::not_found(what),
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            ApiError::validation(server_message(body).unwrap_or_else(|| status_text(status)))
        }
        _ => ApiError::network(match server_message(body) {
            Some(message) => format!("{} ({})", status_text(status), message),
            None => status_text(status),
        }),
    }
}

/// Extract the human-readable message a server put in an error body.
///
/// Recognizes `{"error": "..."}`, `{"message": "..."}` and
/// `{"errors": ["...", ...]}`; any other non-empty body is returned trimmed.
fn server_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) else {
        return Some(trimmed.to_string());
    };
    for key in ["error", "message", "detail"] {
        if let Some(Value::String(message)) = map.get(key)
            && !message.is_empty()
        {
            return Some(message.clone());
        }
    }
    if let Some(Value::Array(errors)) = map.get("errors") {
        let joined = errors
            .iter()
            .filter_map(|entry| match entry {
                Value::String(text) => Some(text.clone()),
                Value::Object(inner) => inner.get("message").and_then(Value::as_str).map(str::to_string),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("; ");
        if !joined.is_empty() {
            return Some(joined);
        }
    }
    Some(trimmed.to_string())
}

fn status_text(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}
