//! # Unified Application Configuration
//!
//! This module consolidates every setting the scan workflow needs into a
//! single configuration object. It supports loading from environment
//! variables (after `.env` has been read by the host), validation, and a
//! redacted summary for start-up logging.

use crate::errors::{AppError, AppResult};
use crate::observability_config::ObservabilityConfig;
use crate::service_config::{ImageLimits, RecoveryConfig, DEFAULT_TIMEOUT_SECS, MAX_IMAGE_BYTES};
use std::env;

pub const DEFAULT_PROFILE_SERVICE_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_PRODUCT_SERVICE_URL: &str = "http://127.0.0.1:5000/api";
pub const DEFAULT_OCR_SERVICE_URL: &str = "http://127.0.0.1:5500";
pub const DEFAULT_SPEECH_SERVICE_URL: &str = "http://127.0.0.1:5002";

/// Base URLs of the four remote collaborators
#[derive(Debug, Clone)]
pub struct ServicesConfig {
    /// Serves `GET /user/profile/{id}`
    pub profile_url: String,
    /// Serves `GET /product?name=`
    pub product_url: String,
    /// Serves `POST /upload-image`
    pub ocr_url: String,
    /// Serves `POST /speech-to-text`
    pub speech_url: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            profile_url: DEFAULT_PROFILE_SERVICE_URL.to_string(),
            product_url: DEFAULT_PRODUCT_SERVICE_URL.to_string(),
            ocr_url: DEFAULT_OCR_SERVICE_URL.to_string(),
            speech_url: DEFAULT_SPEECH_SERVICE_URL.to_string(),
        }
    }
}

impl ServicesConfig {
    /// Validate service URLs
    pub fn validate(&self) -> AppResult<()> {
        for (name, url) in [
            ("PROFILE_SERVICE_URL", &self.profile_url),
            ("PRODUCT_SERVICE_URL", &self.product_url),
            ("OCR_SERVICE_URL", &self.ocr_url),
            ("SPEECH_SERVICE_URL", &self.speech_url),
        ] {
            if url.trim().is_empty() {
                return Err(AppError::Config(format!("{} cannot be empty", name)));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AppError::Config(format!(
                    "{} must start with 'http://' or 'https://'",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Unified application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Collaborator endpoints
    pub services: ServicesConfig,
    /// Timeouts and circuit breaker settings shared by all clients
    pub recovery: RecoveryConfig,
    /// Image payload limits
    pub images: ImageLimits,
    /// Logging and metrics
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        config.services.profile_url = env_or("PROFILE_SERVICE_URL", DEFAULT_PROFILE_SERVICE_URL);
        config.services.product_url = env_or("PRODUCT_SERVICE_URL", DEFAULT_PRODUCT_SERVICE_URL);
        config.services.ocr_url = env_or("OCR_SERVICE_URL", DEFAULT_OCR_SERVICE_URL);
        config.services.speech_url = env_or("SPEECH_SERVICE_URL", DEFAULT_SPEECH_SERVICE_URL);

        config.recovery.operation_timeout_secs =
            parse_env("HTTP_CLIENT_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        config.recovery.circuit_breaker_threshold = parse_env("CIRCUIT_BREAKER_THRESHOLD", 5)?;
        config.recovery.circuit_breaker_reset_secs = parse_env("CIRCUIT_BREAKER_RESET_SECS", 60)?;

        config.images.max_payload_bytes = parse_env("MAX_IMAGE_BYTES", MAX_IMAGE_BYTES)?;

        config.observability = ObservabilityConfig::from_env();

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.services.validate()?;
        self.recovery.validate()?;
        self.images.validate()?;
        self.observability.validate().map_err(AppError::Config)?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: profile_url={}, product_url={}, ocr_url={}, speech_url={}, timeout_secs={}, max_image_bytes={}, environment={}",
            redact_credentials(&self.services.profile_url),
            redact_credentials(&self.services.product_url),
            redact_credentials(&self.services.ocr_url),
            redact_credentials(&self.services.speech_url),
            self.recovery.operation_timeout_secs,
            self.images.max_payload_bytes,
            self.observability.environment
        )
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a valid number", key))),
        Err(_) => Ok(default),
    }
}

/// Replace `user:password@` in a URL with `[REDACTED]@`
fn redact_credentials(url: &str) -> String {
    match (url.find("://"), url.find('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}[REDACTED]{}", &url[..scheme_end + 3], &url[at..])
        }
        _ => url.to_string(),
    }
}
