//! One scan session as an explicit state record.
//!
//! Every mutation goes through a transition method here. The async driver in
//! `orchestrator` splits each remote operation into a `begin_*` call that
//! hands out a ticket and a `finish_*` call that applies the completion only
//! if that ticket is still the current one.

use std::fmt;

use super::acquisition::{AcquisitionController, AcquisitionMode, CaptureState, Channel, SpeechDialog, Ticket};
use super::confirmation::ConfirmationGate;
use super::lookup::{LookupTicket, ProductLookupController, SEARCH_IN_PROGRESS};
use crate::analysis::AnalysisView;
use crate::errors::{AppError, AppResult};
use crate::nutrition::{NutritionRecord, UserProfile};

pub const UPLOAD_MODE_REQUIRED: &str = "Switch to upload mode before uploading an image.";

/// Which kind of step produced the current error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Acquisition,
    Confirmation,
    Lookup,
    Profile,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowError {
    pub category: ErrorCategory,
    pub message: String,
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// The remote round-trip the loading flag is raised for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingOp {
    Speech(Ticket),
    Lookup(LookupTicket),
}

/// User-visible workflow state, derived from the session fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Acquiring(AcquisitionMode),
    NameDrafted,
    NameConfirmed,
    Loading,
    Analyzed,
    Failed,
}

/// What happened to a request once it settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The result (or its error) was written to the session
    Applied,
    /// Preconditions were not met; nothing was sent
    Ignored,
    /// Superseded, cancelled or reset while in flight; dropped silently
    Discarded,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    acquisition: AcquisitionController,
    gate: ConfirmationGate,
    lookup: ProductLookupController,
    error: Option<WorkflowError>,
    preview: Option<String>,
    loading: Option<LoadingOp>,
    profile: Option<UserProfile>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        if matches!(self.loading, Some(LoadingOp::Lookup(_))) {
            Phase::Loading
        } else if self.lookup.record().is_some() {
            Phase::Analyzed
        } else if self.error.is_some() {
            Phase::Failed
        } else if self.gate.is_confirmed() {
            Phase::NameConfirmed
        } else if !self.gate.draft().is_empty() {
            Phase::NameDrafted
        } else if let Some(mode) = self.acquisition.capture_state().mode() {
            Phase::Acquiring(mode)
        } else {
            Phase::Idle
        }
    }

    pub fn draft(&self) -> &str {
        self.gate.draft()
    }

    pub fn confirmed_name(&self) -> Option<&str> {
        self.gate.confirmed()
    }

    pub fn record(&self) -> Option<&NutritionRecord> {
        self.lookup.record()
    }

    pub fn error(&self) -> Option<&WorkflowError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }

    /// Data URL of the last captured or uploaded image
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    pub fn loading(&self) -> Option<LoadingOp> {
        self.loading
    }

    pub fn capture_state(&self) -> CaptureState {
        self.acquisition.capture_state()
    }

    pub fn speech_dialog(&self) -> SpeechDialog {
        self.acquisition.speech_dialog()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Render-ready analysis of the current record
    pub fn view(&self) -> Option<AnalysisView> {
        self.lookup.record().map(AnalysisView::from_record)
    }

    pub fn set_mode(&mut self, mode: AcquisitionMode) {
        self.acquisition.set_mode(mode);
    }

    pub fn toggle_camera(&mut self) {
        self.acquisition.toggle_camera();
    }

    pub fn accepts(&self, channel: Channel) -> bool {
        self.acquisition.accepts(channel)
    }

    /// Manual typing into the name field
    pub fn set_draft(&mut self, text: &str) -> bool {
        self.gate.set_draft(text)
    }

    /// Show `preview` and supersede every outstanding acquisition
    pub fn begin_image(&mut self, channel: Channel, preview: String) -> Ticket {
        self.clear_error(ErrorCategory::Acquisition);
        self.preview = Some(preview);
        self.acquisition.issue(channel)
    }

    pub fn finish_image(&mut self, ticket: Ticket, result: AppResult<String>) -> AppResult<Outcome> {
        if !self.acquisition.is_current(ticket) {
            return Ok(Outcome::Discarded);
        }
        self.apply_acquired(result)
    }

    /// `None` when the speech dialog is not waiting for a start
    pub fn begin_speech(&mut self) -> AppResult<Option<Ticket>> {
        if !self.acquisition.accepts(Channel::Speech) {
            return Ok(None);
        }
        if self.loading.is_some() {
            return Err(self.fail(
                ErrorCategory::Acquisition,
                AppError::Validation(SEARCH_IN_PROGRESS.to_string()),
            ));
        }
        self.clear_error(ErrorCategory::Acquisition);
        let ticket = self.acquisition.issue(Channel::Speech);
        self.loading = Some(LoadingOp::Speech(ticket));
        Ok(Some(ticket))
    }

    pub fn finish_speech(&mut self, ticket: Ticket, result: AppResult<String>) -> AppResult<Outcome> {
        if self.loading == Some(LoadingOp::Speech(ticket)) {
            self.loading = None;
        }
        let listening = self.acquisition.finish_speech(ticket);
        if !listening || !self.acquisition.is_current(ticket) {
            return Ok(Outcome::Discarded);
        }
        self.apply_acquired(result)
    }

    /// Close the speech dialog; an outstanding transcription is abandoned
    pub fn cancel_speech(&mut self) -> Option<Ticket> {
        let abandoned = self.acquisition.cancel_speech();
        if let Some(ticket) = abandoned {
            if self.loading == Some(LoadingOp::Speech(ticket)) {
                self.loading = None;
            }
        }
        abandoned
    }

    pub fn open_speech_dialog(&mut self) {
        self.acquisition.open_speech_dialog();
    }

    pub fn confirm(&mut self) -> AppResult<String> {
        self.clear_error(ErrorCategory::Confirmation);
        match self.gate.confirm() {
            Ok(name) => Ok(name.to_string()),
            Err(err) => Err(self.fail(ErrorCategory::Confirmation, err)),
        }
    }

    pub fn edit(&mut self) -> AppResult<()> {
        if self.lookup.in_flight() {
            return Err(self.fail(
                ErrorCategory::Confirmation,
                AppError::Validation(SEARCH_IN_PROGRESS.to_string()),
            ));
        }
        self.gate.edit();
        Ok(())
    }

    pub fn begin_search(&mut self) -> AppResult<(LookupTicket, String)> {
        self.clear_error(ErrorCategory::Lookup);
        let busy = self.loading.is_some();
        match self.lookup.begin(self.gate.confirmed(), busy) {
            Ok((ticket, name)) => {
                self.loading = Some(LoadingOp::Lookup(ticket));
                Ok((ticket, name))
            }
            Err(err) => Err(self.fail(ErrorCategory::Lookup, err)),
        }
    }

    pub fn finish_search(&mut self, ticket: LookupTicket, result: AppResult<NutritionRecord>) -> AppResult<Outcome> {
        if self.loading == Some(LoadingOp::Lookup(ticket)) {
            self.loading = None;
        }
        match result {
            Ok(record) => {
                if !self.lookup.finish(ticket, Some(record)) {
                    return Ok(Outcome::Discarded);
                }
                // The analysis view replaces the capture view
                self.error = None;
                self.preview = None;
                Ok(Outcome::Applied)
            }
            Err(err) => {
                if !self.lookup.finish(ticket, None) {
                    return Ok(Outcome::Discarded);
                }
                Err(self.fail(ErrorCategory::Lookup, err))
            }
        }
    }

    pub fn begin_profile(&mut self) {
        self.clear_error(ErrorCategory::Profile);
    }

    pub fn finish_profile(&mut self, result: AppResult<UserProfile>) -> AppResult<UserProfile> {
        match result {
            Ok(profile) => {
                self.profile = Some(profile.clone());
                Ok(profile)
            }
            Err(err) => Err(self.fail(ErrorCategory::Profile, err)),
        }
    }

    /// Back to `Idle`; the signed-in user's profile survives
    pub fn reset(&mut self) {
        self.acquisition.reset();
        self.gate.reset();
        self.lookup.reset();
        self.error = None;
        self.preview = None;
        self.loading = None;
    }

    fn apply_acquired(&mut self, result: AppResult<String>) -> AppResult<Outcome> {
        match result {
            Ok(text) => {
                self.gate.accept_acquired(text);
                Ok(Outcome::Applied)
            }
            Err(err) => Err(self.fail(ErrorCategory::Acquisition, err)),
        }
    }

    fn fail(&mut self, category: ErrorCategory, err: AppError) -> AppError {
        self.error = Some(WorkflowError {
            category,
            message: err.user_message().to_string(),
        });
        err
    }

    fn clear_error(&mut self, category: ErrorCategory) {
        if self.error.as_ref().is_some_and(|e| e.category == category) {
            self.error = None;
        }
    }
}
