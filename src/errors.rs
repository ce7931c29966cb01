//! # Application Error Types
//!
//! This module defines the error taxonomy shared by every step of the scan
//! workflow. Each variant carries the user-facing message that ends up in the
//! session's current error slot.

use std::fmt;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Rejected locally before any collaborator is contacted
    Validation(String),
    /// Non-2xx, malformed or unreachable collaborator response
    Collaborator(String),
    /// Configuration validation errors
    Config(String),
    /// Internal application errors
    Internal(String),
}

impl AppError {
    /// The bare message shown to the user, without the category tag
    pub fn user_message(&self) -> &str {
        match self {
            AppError::Validation(msg)
            | AppError::Collaborator(msg)
            | AppError::Config(msg)
            | AppError::Internal(msg) => msg,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    pub fn is_collaborator(&self) -> bool {
        matches!(self, AppError::Collaborator(_))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "[VALIDATION] {}", msg),
            AppError::Collaborator(msg) => write!(f, "[COLLABORATOR] {}", msg),
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Internal(msg) => write!(f, "[INTERNAL] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities for consistent error reporting across the application
pub mod error_logging {
    use tracing::{error, warn};

    /// Log a failed collaborator round-trip with endpoint context
    pub fn log_collaborator_error(
        error: &impl std::fmt::Display,
        service: &str,
        operation: &str,
        endpoint: Option<&str>,
        duration: Option<std::time::Duration>,
    ) {
        warn!(
            error = %error,
            service = %service,
            operation = %operation,
            endpoint = ?endpoint,
            duration_ms = ?duration.map(|d| d.as_millis()),
            "Collaborator request failed"
        );
    }

    /// Log validation errors with input context
    pub fn log_validation_error(
        error: &impl std::fmt::Display,
        operation: &str,
        input_value: Option<&str>,
    ) {
        warn!(
            error = %error,
            operation = %operation,
            input_value = ?input_value.map(|v| {
                if v.chars().count() > 100 {
                    format!("{}...", v.chars().take(100).collect::<String>())
                } else {
                    v.to_string()
                }
            }),
            "Validation failed"
        );
    }

    /// Log configuration errors during startup/initialization
    pub fn log_config_error(error: &impl std::fmt::Display, config_key: &str, operation: &str) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_category_tag() {
        let err = AppError::Collaborator("service unavailable".to_string());
        assert_eq!(err.to_string(), "[COLLABORATOR] service unavailable");
        assert_eq!(err.user_message(), "service unavailable");
    }

    #[test]
    fn test_category_predicates() {
        assert!(AppError::Validation("empty".to_string()).is_validation());
        assert!(!AppError::Validation("empty".to_string()).is_collaborator());
        assert!(AppError::Collaborator("down".to_string()).is_collaborator());
    }
}
