//! Speech-to-text client: `POST /speech-to-text`, no payload.

use async_trait::async_trait;
use serde::Deserialize;

use super::{non_blank, HttpEndpoint, SpeechService};
use crate::service_config::RecoveryConfig;
use crate::service_errors::ServiceError;

#[derive(Debug, Deserialize)]
struct SpeechResponse {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug)]
pub struct SpeechClient {
    endpoint: HttpEndpoint,
}

impl SpeechClient {
    pub fn new(client: reqwest::Client, base_url: &str, recovery: &RecoveryConfig) -> Self {
        Self {
            endpoint: HttpEndpoint::new("speech", client, base_url, recovery),
        }
    }
}

#[async_trait]
impl SpeechService for SpeechClient {
    async fn transcribe(&self) -> Result<String, ServiceError> {
        let request = self
            .endpoint
            .client()
            .post(self.endpoint.url("/speech-to-text"));

        let response: SpeechResponse = self.endpoint.send_json("transcribe", request).await?;
        non_blank(response.text)
            .ok_or_else(|| ServiceError::Malformed("response has no text".to_string()))
    }
}
