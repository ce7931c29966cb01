//! # Image Codec
//!
//! Converts between the data-URL form used for previews and the binary
//! payload forwarded to the OCR service. No image processing happens here;
//! bytes are only sniffed for their format and size-checked.
//!
//! ```rust
//! use nutricheck::image_codec::ImageCodec;
//! use nutricheck::service_config::ImageLimits;
//!
//! let codec = ImageCodec::new(ImageLimits::default());
//! let payload = codec.decode_data_url("data:image/jpeg;base64,/9j/4AAQSkZJRg==").unwrap();
//! assert_eq!(payload.mime_type, "image/jpeg");
//! assert_eq!(payload.file_name, "image.jpeg");
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::service_config::ImageLimits;

/// File name attached to every multipart upload
pub const UPLOAD_FILE_NAME: &str = "image.jpeg";
/// MIME type assumed when neither the data URL nor the bytes tell us
pub const FALLBACK_MIME_TYPE: &str = "image/jpeg";

/// Binary image ready for the OCR upload
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: &'static str,
}

impl ImagePayload {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImageCodec {
    limits: ImageLimits,
}

impl ImageCodec {
    pub fn new(limits: ImageLimits) -> Self {
        Self { limits }
    }

    /// Decode a `data:<mime>;base64,<data>` URL into an upload payload
    pub fn decode_data_url(&self, data_url: &str) -> AppResult<ImagePayload> {
        let (header, data) = data_url
            .split_once(',')
            .ok_or_else(|| AppError::Validation("Image data is not a data URL".to_string()))?;

        let meta = header
            .strip_prefix("data:")
            .ok_or_else(|| AppError::Validation("Image data is not a data URL".to_string()))?;

        let mut parts = meta.split(';');
        let declared_mime = parts.next().unwrap_or_default().trim();
        if !parts.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(AppError::Validation(
                "Image data URL must be base64 encoded".to_string(),
            ));
        }

        let bytes = STANDARD
            .decode(data.trim())
            .map_err(|e| AppError::Validation(format!("Image data is not valid base64: {}", e)))?;
        self.check_size(bytes.len())?;

        let mime_type = if declared_mime.is_empty() {
            self.sniff_mime(&bytes).to_string()
        } else {
            declared_mime.to_string()
        };

        debug!(mime_type = %mime_type, size_bytes = bytes.len(), "Decoded image data URL");
        Ok(ImagePayload {
            bytes,
            mime_type,
            file_name: UPLOAD_FILE_NAME,
        })
    }

    /// Encode raw file bytes as a data URL, sniffing the MIME type
    pub fn encode_data_url(&self, bytes: &[u8]) -> AppResult<String> {
        self.check_size(bytes.len())?;
        Ok(self.preview_url(bytes))
    }

    /// Data URL for display only; size limits are not applied
    pub fn preview_url(&self, bytes: &[u8]) -> String {
        format!("data:{};base64,{}", self.sniff_mime(bytes), STANDARD.encode(bytes))
    }

    /// Best-effort MIME type from magic bytes
    pub fn sniff_mime(&self, bytes: &[u8]) -> &'static str {
        if bytes.len() < self.limits.min_format_bytes {
            return FALLBACK_MIME_TYPE;
        }
        image::guess_format(bytes)
            .map(|format| format.to_mime_type())
            .unwrap_or(FALLBACK_MIME_TYPE)
    }

    fn check_size(&self, size: usize) -> AppResult<()> {
        if size == 0 {
            return Err(AppError::Validation("Image is empty".to_string()));
        }
        if size as u64 > self.limits.max_payload_bytes {
            return Err(AppError::Validation(format!(
                "Image too large: {} bytes (maximum allowed: {} bytes)",
                size, self.limits.max_payload_bytes
            )));
        }
        Ok(())
    }
}
