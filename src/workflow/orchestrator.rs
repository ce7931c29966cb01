//! Async driver for one scan session.
//!
//! `Workflow` owns the session behind a mutex and the collaborators behind
//! trait objects. Each operation takes the lock only to run a synchronous
//! transition, never across a collaborator call, so several acquisitions can
//! be in flight at once and settle in any order.

use parking_lot::Mutex;
use std::time::Instant;
use tracing::{debug, info, instrument};

use super::acquisition::{AcquisitionMode, Channel, Ticket};
use super::lookup::SEARCH_FAILED;
use super::session::{Outcome, Phase, Session, UPLOAD_MODE_REQUIRED};
use crate::analysis::AnalysisView;
use crate::errors::{error_logging, AppError, AppResult};
use crate::image_codec::{ImageCodec, ImagePayload};
use crate::nutrition::UserProfile;
use crate::observability;
use crate::service_errors::ServiceError;
use crate::services::Collaborators;

pub const OCR_NO_TEXT: &str = "Failed to extract text from the image.";
pub const OCR_FAILED: &str = "Error occurred during image processing.";
pub const SPEECH_NO_TEXT: &str = "Speech recognition failed. Please try again.";
pub const SPEECH_FAILED: &str = "Error during speech recognition.";
pub const USER_NOT_FOUND: &str = "User not found";
pub const PROFILE_FAILED: &str = "Could not load the user profile.";

pub struct Workflow {
    session: Mutex<Session>,
    services: Collaborators,
    codec: ImageCodec,
}

impl Workflow {
    pub fn new(services: Collaborators, codec: ImageCodec) -> Self {
        Self {
            session: Mutex::new(Session::new()),
            services,
            codec,
        }
    }

    /// Copy of the current session state
    pub fn snapshot(&self) -> Session {
        self.session.lock().clone()
    }

    pub fn phase(&self) -> Phase {
        self.session.lock().phase()
    }

    pub fn view(&self) -> Option<AnalysisView> {
        self.session.lock().view()
    }

    pub fn set_mode(&self, mode: AcquisitionMode) {
        let state = {
            let mut session = self.session.lock();
            session.set_mode(mode);
            session.capture_state()
        };
        debug!(?mode, ?state, "Acquisition mode changed");
    }

    pub fn toggle_camera(&self) {
        let state = {
            let mut session = self.session.lock();
            session.toggle_camera();
            session.capture_state()
        };
        debug!(?state, "Camera toggled");
    }

    /// Grab a camera frame and run it through OCR
    ///
    /// Does nothing unless scan mode is active with the camera on and the
    /// camera actually yields a frame.
    pub async fn capture_frame(&self) -> AppResult<Outcome> {
        let accepted = self.session.lock().accepts(Channel::Camera);
        if !accepted {
            debug!("Capture ignored: camera is not scanning");
            observability::record_acquisition(Channel::Camera.as_str(), "ignored");
            return Ok(Outcome::Ignored);
        }
        let Some(frame) = self.services.camera.screenshot() else {
            debug!("Capture ignored: no frame available");
            observability::record_acquisition(Channel::Camera.as_str(), "ignored");
            return Ok(Outcome::Ignored);
        };

        let payload = self.codec.decode_data_url(&frame);
        let ticket = self.session.lock().begin_image(Channel::Camera, frame);
        self.run_ocr(ticket, payload).await
    }

    /// Run uploaded file bytes through OCR; only valid in upload mode
    pub async fn upload_file(&self, bytes: Vec<u8>) -> AppResult<Outcome> {
        let accepted = self.session.lock().accepts(Channel::Upload);
        if !accepted {
            let err = AppError::Validation(UPLOAD_MODE_REQUIRED.to_string());
            error_logging::log_validation_error(&err, "upload_file", None);
            return Err(err);
        }

        let preview = self.codec.preview_url(&bytes);
        let payload = self
            .codec
            .decode_data_url(&preview)
            .inspect_err(|e| error_logging::log_validation_error(e, "upload_file", None));
        let ticket = self.session.lock().begin_image(Channel::Upload, preview);
        self.run_ocr(ticket, payload).await
    }

    #[instrument(skip(self, payload), fields(generation = ticket.generation, channel = %ticket.channel))]
    async fn run_ocr(&self, ticket: Ticket, payload: AppResult<ImagePayload>) -> AppResult<Outcome> {
        let text = match payload {
            Ok(payload) => {
                debug!(bytes = payload.len(), mime = %payload.mime_type, "Submitting image to OCR");
                self.services
                    .ocr
                    .extract_text(payload)
                    .await
                    .map_err(|e| acquisition_error(e, OCR_NO_TEXT, OCR_FAILED))
            }
            Err(err) => Err(err),
        };

        let outcome = self.session.lock().finish_image(ticket, text);
        record_acquisition_outcome(ticket, &outcome);
        outcome
    }

    pub fn open_speech_dialog(&self) {
        self.session.lock().open_speech_dialog();
        debug!("Speech dialog opened");
    }

    /// Start transcription from the open speech dialog
    pub async fn confirm_speech(&self) -> AppResult<Outcome> {
        let begun = self
            .session
            .lock()
            .begin_speech()
            .inspect_err(|e| error_logging::log_validation_error(e, "confirm_speech", None))?;
        let Some(ticket) = begun else {
            debug!("Speech ignored: dialog is not open");
            return Ok(Outcome::Ignored);
        };

        debug!(generation = ticket.generation, "Listening");
        let text = self
            .services
            .speech
            .transcribe()
            .await
            .map_err(|e| acquisition_error(e, SPEECH_NO_TEXT, SPEECH_FAILED));

        let outcome = self.session.lock().finish_speech(ticket, text);
        record_acquisition_outcome(ticket, &outcome);
        outcome
    }

    pub fn cancel_speech(&self) {
        let abandoned = self.session.lock().cancel_speech();
        debug!(abandoned = ?abandoned.map(|t| t.generation), "Speech dialog cancelled");
    }

    /// Manual edit of the name field; ignored while the name is confirmed
    pub fn set_draft(&self, text: &str) -> bool {
        self.session.lock().set_draft(text)
    }

    pub fn confirm(&self) -> AppResult<String> {
        let name = self
            .session
            .lock()
            .confirm()
            .inspect_err(|e| error_logging::log_validation_error(e, "confirm", None))?;
        info!(product = %name, "Product name confirmed");
        Ok(name)
    }

    pub fn edit(&self) -> AppResult<()> {
        self.session
            .lock()
            .edit()
            .inspect_err(|e| error_logging::log_validation_error(e, "edit", None))
    }

    /// Look up the confirmed name; a failure clears the previous record
    pub async fn search(&self) -> AppResult<Outcome> {
        let (ticket, name) = self
            .session
            .lock()
            .begin_search()
            .inspect_err(|e| error_logging::log_validation_error(e, "search", None))?;

        info!(product = %name, "Looking up product");
        let start = Instant::now();
        let result = self
            .services
            .products
            .lookup(&name)
            .await
            .map_err(|e| e.into_app_error(SEARCH_FAILED));
        observability::record_lookup(result.is_ok(), start.elapsed());

        let outcome = self.session.lock().finish_search(ticket, result);
        match &outcome {
            Ok(Outcome::Discarded) => debug!(?ticket, "Lookup result discarded after reset"),
            Ok(_) => info!(product = %name, "Product analysis ready"),
            Err(err) => debug!(error = %err, "Lookup failed"),
        }
        outcome
    }

    pub async fn load_profile(&self, user_id: &str) -> AppResult<UserProfile> {
        self.session.lock().begin_profile();

        let result = if user_id.trim().is_empty() {
            Err(AppError::Validation(USER_NOT_FOUND.to_string()))
        } else {
            self.services
                .profiles
                .fetch_profile(user_id)
                .await
                .map_err(profile_error)
        };

        let profile = self.session.lock().finish_profile(result)?;
        info!(user_id, "User profile loaded");
        Ok(profile)
    }

    pub fn reset(&self) {
        self.session.lock().reset();
        info!("Session reset");
    }

    /// Dropping the preview starts over
    pub fn remove_image(&self) {
        self.reset();
    }
}

/// Map an OCR or speech failure onto its user message
fn acquisition_error(err: ServiceError, no_text: &str, failed: &str) -> AppError {
    match err {
        ServiceError::Malformed(_) => AppError::Collaborator(no_text.to_string()),
        other => other.into_app_error(failed),
    }
}

fn profile_error(err: ServiceError) -> AppError {
    match err {
        ServiceError::Status { .. } => err.into_app_error(USER_NOT_FOUND),
        other => other.into_app_error(PROFILE_FAILED),
    }
}

fn record_acquisition_outcome(ticket: Ticket, outcome: &AppResult<Outcome>) {
    let label = match outcome {
        Ok(Outcome::Applied) => "applied",
        Ok(Outcome::Ignored) => "ignored",
        Ok(Outcome::Discarded) => {
            debug!(generation = ticket.generation, channel = %ticket.channel, "Superseded acquisition result discarded");
            "discarded"
        }
        Err(_) => "failed",
    };
    observability::record_acquisition(ticket.channel.as_str(), label);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_acquisition_reads_as_no_text() {
        let err = acquisition_error(ServiceError::Malformed("no field".to_string()), OCR_NO_TEXT, OCR_FAILED);
        assert_eq!(err.user_message(), OCR_NO_TEXT);

        let err = acquisition_error(ServiceError::Transport("refused".to_string()), SPEECH_NO_TEXT, SPEECH_FAILED);
        assert_eq!(err.user_message(), SPEECH_FAILED);
    }

    #[test]
    fn test_collaborator_message_wins() {
        let err = acquisition_error(
            ServiceError::Status {
                status: 400,
                message: Some("No image uploaded".to_string()),
            },
            OCR_NO_TEXT,
            OCR_FAILED,
        );
        assert_eq!(err.user_message(), "No image uploaded");
    }

    #[test]
    fn test_profile_status_means_not_found() {
        let err = profile_error(ServiceError::Status { status: 404, message: None });
        assert_eq!(err.user_message(), USER_NOT_FOUND);

        let err = profile_error(ServiceError::Timeout("slow".to_string()));
        assert_eq!(err.user_message(), PROFILE_FAILED);
    }
}
