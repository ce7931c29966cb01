//! # Collaborator Error Types Module
//!
//! Failure modes of the remote OCR, speech, product and profile services.
//! Each collaborator maps these onto the workflow's user-facing message.

use crate::errors::AppError;

/// Custom error types for collaborator round-trips
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// Non-2xx answer, with the body's `error` field when it had one
    Status { status: u16, message: Option<String> },
    /// Connection, DNS or body transfer failures
    Transport(String),
    /// 2xx answer whose body is not the expected shape
    Malformed(String),
    /// Request exceeded the configured timeout
    Timeout(String),
    /// Circuit breaker is open for this collaborator
    Unavailable(String),
}

impl ServiceError {
    /// Message supplied by the collaborator itself, if any
    pub fn collaborator_message(&self) -> Option<&str> {
        match self {
            ServiceError::Status {
                message: Some(msg), ..
            } if !msg.trim().is_empty() => Some(msg),
            _ => None,
        }
    }

    /// Convert into the workflow error, preferring the collaborator message over `fallback`
    pub fn into_app_error(self, fallback: &str) -> AppError {
        let message = self
            .collaborator_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string());
        AppError::Collaborator(message)
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Status { status, message } => write!(
                f,
                "[HTTP_STATUS] Collaborator answered {}: {}",
                status,
                message.as_deref().unwrap_or("no error message")
            ),
            ServiceError::Transport(msg) => write!(f, "[TRANSPORT] Request could not be completed: {}", msg),
            ServiceError::Malformed(msg) => write!(f, "[MALFORMED] Unexpected response body: {}", msg),
            ServiceError::Timeout(msg) => write!(f, "[TIMEOUT] Request timed out: {}", msg),
            ServiceError::Unavailable(msg) => write!(f, "[UNAVAILABLE] Service temporarily unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::Timeout(err.to_string())
        } else if err.is_decode() {
            ServiceError::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            ServiceError::Status {
                status: status.as_u16(),
                message: None,
            }
        } else {
            ServiceError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Malformed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_is_surfaced_verbatim() {
        let err = ServiceError::Status {
            status: 500,
            message: Some("service unavailable".to_string()),
        };
        assert_eq!(
            err.into_app_error("Something went wrong!"),
            AppError::Collaborator("service unavailable".to_string())
        );
    }

    #[test]
    fn test_missing_or_blank_message_uses_fallback() {
        let blank = ServiceError::Status {
            status: 502,
            message: Some("   ".to_string()),
        };
        assert_eq!(blank.into_app_error("generic").user_message(), "generic");

        let transport = ServiceError::Transport("connection refused".to_string());
        assert_eq!(transport.into_app_error("generic").user_message(), "generic");
    }
}
