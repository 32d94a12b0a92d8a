//! Error types for the remote catalog API.

use serde_json::Value;
use thiserror::Error;

const MAX_MESSAGE_LEN: usize = 300;

/// Remote API failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The API rejected (or never received) a usable bearer token
    #[error("Not authenticated: the API rejected the session token")]
    Unauthorized,
    /// Non-success status other than 401
    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },
    /// Connection, TLS or timeout failure before a response arrived
    #[error("Transport error: {0}")]
    Transport(String),
    /// Response body did not match the expected shape
    #[error("Failed to decode API response: {0}")]
    Decode(String),
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// Build a status error from a response body, pulling out the message the
    /// backend put in `error`, `detail` or `message`, or flattening field errors.
    pub fn from_response(status: u16, body: &str) -> Self {
        ApiError::Status {
            status,
            message: error_message(body),
        }
    }
}

fn error_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }

    let message = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => ["error", "detail", "message"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| {
                map.iter()
                    .map(|(field, errors)| format!("{}: {}", field, flatten(errors)))
                    .collect::<Vec<_>>()
                    .join("; ")
            }),
        Ok(other) => flatten(&other),
        Err(_) => trimmed.to_string(),
    };

    truncate(message)
}

fn flatten(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(flatten).collect::<Vec<_>>().join(", "),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}: {}", k, flatten(v)))
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

fn truncate(message: String) -> String {
    if message.chars().count() <= MAX_MESSAGE_LEN {
        return message;
    }
    let cut: String = message.chars().take(MAX_MESSAGE_LEN).collect();
    format!("{}...", cut)
}
