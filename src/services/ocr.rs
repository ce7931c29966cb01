//! OCR service client: `POST /upload-image` with a multipart image.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::{non_blank, HttpEndpoint, OcrService};
use crate::image_codec::ImagePayload;
use crate::service_config::RecoveryConfig;
use crate::service_errors::ServiceError;

#[derive(Debug, Deserialize)]
struct OcrResponse {
    #[serde(default)]
    extracted_text: Option<String>,
}

#[derive(Debug)]
pub struct OcrClient {
    endpoint: HttpEndpoint,
}

impl OcrClient {
    pub fn new(client: reqwest::Client, base_url: &str, recovery: &RecoveryConfig) -> Self {
        Self {
            endpoint: HttpEndpoint::new("ocr", client, base_url, recovery),
        }
    }
}

#[async_trait]
impl OcrService for OcrClient {
    async fn extract_text(&self, image: ImagePayload) -> Result<String, ServiceError> {
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.mime_type)?;
        let form = Form::new().part("image", part);

        let request = self
            .endpoint
            .client()
            .post(self.endpoint.url("/upload-image"))
            .multipart(form);

        let response: OcrResponse = self.endpoint.send_json("extract_text", request).await?;
        non_blank(response.extracted_text)
            .ok_or_else(|| ServiceError::Malformed("response has no extracted_text".to_string()))
    }
}
