//! # Collaborator Configuration Module
//!
//! This module defines configuration structures for the remote services,
//! including recovery settings and image payload limits.

use crate::errors::{AppError, AppResult};

// Constants for collaborator configuration
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const MAX_TIMEOUT_SECS: u64 = 300;
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024; // 10MB limit for image payloads
pub const MIN_FORMAT_BYTES: usize = 8;

/// Recovery configuration for collaborator failures
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Timeout for a single request in seconds
    pub operation_timeout_secs: u64,
    /// Circuit breaker failure threshold
    pub circuit_breaker_threshold: u32,
    /// Circuit breaker reset timeout in seconds
    pub circuit_breaker_reset_secs: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            operation_timeout_secs: DEFAULT_TIMEOUT_SECS,
            circuit_breaker_threshold: 5,
            circuit_breaker_reset_secs: 60, // 1 minute
        }
    }
}

impl RecoveryConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.operation_timeout_secs == 0 {
            return Err(AppError::Config("HTTP timeout cannot be 0".to_string()));
        }

        if self.operation_timeout_secs > MAX_TIMEOUT_SECS {
            return Err(AppError::Config(format!(
                "HTTP timeout cannot be greater than {} seconds",
                MAX_TIMEOUT_SECS
            )));
        }

        if self.circuit_breaker_threshold == 0 {
            return Err(AppError::Config(
                "Circuit breaker threshold cannot be 0".to_string(),
            ));
        }

        if self.circuit_breaker_reset_secs == 0 {
            return Err(AppError::Config(
                "Circuit breaker reset timeout cannot be 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Limits applied to image payloads before they are forwarded to OCR
#[derive(Debug, Clone)]
pub struct ImageLimits {
    /// Largest decoded payload accepted, in bytes
    pub max_payload_bytes: u64,
    /// Bytes needed before format sniffing is attempted
    pub min_format_bytes: usize,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_payload_bytes: MAX_IMAGE_BYTES,
            min_format_bytes: MIN_FORMAT_BYTES,
        }
    }
}

impl ImageLimits {
    pub fn validate(&self) -> AppResult<()> {
        if self.max_payload_bytes == 0 {
            return Err(AppError::Config(
                "Maximum image size cannot be 0".to_string(),
            ));
        }
        Ok(())
    }
}
