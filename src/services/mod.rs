//! Remote collaborators consumed by the scan workflow.
//!
//! Each collaborator is a trait so the workflow can be driven by in-memory
//! fakes; the reqwest implementations live in the submodules and share the
//! [`HttpEndpoint`] plumbing below (timeouts, circuit breaker, error body
//! parsing, metrics).

pub mod ocr;
pub mod product;
pub mod profile;
pub mod speech;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::circuit_breaker::CircuitBreaker;
use crate::config::AppConfig;
use crate::errors::{error_logging, AppError, AppResult};
use crate::image_codec::ImagePayload;
use crate::nutrition::{NutritionRecord, UserProfile};
use crate::observability;
use crate::service_config::RecoveryConfig;
use crate::service_errors::ServiceError;

pub use ocr::OcrClient;
pub use product::ProductClient;
pub use profile::ProfileClient;
pub use speech::SpeechClient;

/// Image-to-text service
#[async_trait]
pub trait OcrService: Send + Sync {
    async fn extract_text(&self, image: ImagePayload) -> Result<String, ServiceError>;
}

/// Speech-to-text service; it captures audio itself
#[async_trait]
pub trait SpeechService: Send + Sync {
    async fn transcribe(&self) -> Result<String, ServiceError>;
}

/// Confirmed name to nutrition record
#[async_trait]
pub trait ProductLookup: Send + Sync {
    async fn lookup(&self, name: &str) -> Result<NutritionRecord, ServiceError>;
}

#[async_trait]
pub trait ProfileService: Send + Sync {
    async fn fetch_profile(&self, user_id: &str) -> Result<UserProfile, ServiceError>;
}

/// Live camera; yields a data URL screenshot when a frame is available
pub trait FrameSource: Send + Sync {
    fn screenshot(&self) -> Option<String>;
}

/// The full set of collaborators a workflow needs
#[derive(Clone)]
pub struct Collaborators {
    pub ocr: Arc<dyn OcrService>,
    pub speech: Arc<dyn SpeechService>,
    pub products: Arc<dyn ProductLookup>,
    pub profiles: Arc<dyn ProfileService>,
    pub camera: Arc<dyn FrameSource>,
}

impl Collaborators {
    /// HTTP collaborators for every remote service, sharing one connection pool
    pub fn http(config: &AppConfig, camera: Arc<dyn FrameSource>) -> AppResult<Self> {
        let client = build_http_client(&config.recovery)?;
        Ok(Self {
            ocr: Arc::new(OcrClient::new(client.clone(), &config.services.ocr_url, &config.recovery)),
            speech: Arc::new(SpeechClient::new(client.clone(), &config.services.speech_url, &config.recovery)),
            products: Arc::new(ProductClient::new(client.clone(), &config.services.product_url, &config.recovery)),
            profiles: Arc::new(ProfileClient::new(client, &config.services.profile_url, &config.recovery)),
            camera,
        })
    }
}

/// Build the shared HTTP client with the configured timeout
pub fn build_http_client(recovery: &RecoveryConfig) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(recovery.operation_timeout_secs))
        .build()
        .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// `{ "error": "..." }` body carried by failing responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// One remote service: base URL, shared client and its own circuit breaker
#[derive(Debug)]
pub struct HttpEndpoint {
    service: &'static str,
    base_url: String,
    client: reqwest::Client,
    breaker: CircuitBreaker,
}

impl HttpEndpoint {
    pub fn new(
        service: &'static str,
        client: reqwest::Client,
        base_url: &str,
        recovery: &RecoveryConfig,
    ) -> Self {
        Self {
            service,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            breaker: CircuitBreaker::new(recovery.clone()),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Send `request` and decode a JSON body of type `T`
    ///
    /// Non-2xx answers become [`ServiceError::Status`] with the body's `error`
    /// field. Server-side and transport failures count against the circuit
    /// breaker; client errors such as 404 do not.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ServiceError> {
        if self.breaker.is_open() {
            observability::record_circuit_breaker_open(self.service);
            return Err(ServiceError::Unavailable(format!(
                "{} circuit breaker is open",
                self.service
            )));
        }

        let start = Instant::now();
        let result = self.execute(request).await;
        let duration = start.elapsed();

        observability::record_collaborator_request(self.service, result.is_ok(), duration);
        match &result {
            Ok(_) => {
                self.breaker.record_success();
                debug!(service = self.service, operation, duration_ms = duration.as_millis(), "Collaborator request succeeded");
            }
            Err(err) => {
                if counts_against_breaker(err) {
                    self.breaker.record_failure();
                }
                error_logging::log_collaborator_error(err, self.service, operation, Some(&self.base_url), Some(duration));
            }
        }
        result
    }

    async fn execute<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ServiceError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error);
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

fn counts_against_breaker(err: &ServiceError) -> bool {
    match err {
        ServiceError::Status { status, .. } => *status >= 500,
        ServiceError::Unavailable(_) => false,
        _ => true,
    }
}

/// Treat missing and blank strings the same way
pub(crate) fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}
