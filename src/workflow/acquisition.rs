//! Acquisition controls: camera/upload mode, the speech dialog and the
//! request tickets that decide which acquisition result may land.
//!
//! Every acquisition attempt (camera frame, upload, speech) draws a ticket
//! from one shared counter. Only a completion carrying the most recently
//! issued ticket is applied; anything older was superseded and is dropped.

use std::fmt;

/// Which input panel the user selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionMode {
    Scan,
    Upload,
}

/// Mode and camera power as one value, so "camera on while uploading" cannot exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    ScanOn,
    ScanOff,
    UploadActive,
}

impl CaptureState {
    pub fn mode(self) -> Option<AcquisitionMode> {
        match self {
            CaptureState::Idle => None,
            CaptureState::ScanOn | CaptureState::ScanOff => Some(AcquisitionMode::Scan),
            CaptureState::UploadActive => Some(AcquisitionMode::Upload),
        }
    }

    pub fn camera_on(self) -> bool {
        self == CaptureState::ScanOn
    }

    /// Leaving scan mode turns the camera off; entering it keeps the current power
    pub fn with_mode(self, mode: AcquisitionMode) -> Self {
        match (mode, self) {
            (AcquisitionMode::Scan, CaptureState::ScanOn) => CaptureState::ScanOn,
            (AcquisitionMode::Scan, _) => CaptureState::ScanOff,
            (AcquisitionMode::Upload, _) => CaptureState::UploadActive,
        }
    }

    /// The camera button also selects scan mode
    pub fn toggled(self) -> Self {
        match self {
            CaptureState::ScanOn => CaptureState::ScanOff,
            _ => CaptureState::ScanOn,
        }
    }
}

/// Acquisition channel, used for tickets, logs and metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Camera,
    Upload,
    Speech,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Camera => "camera",
            Channel::Upload => "upload",
            Channel::Speech => "speech",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one acquisition attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub channel: Channel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeechDialog {
    #[default]
    Closed,
    /// Waiting for the user to start
    Open,
    /// Transcription outstanding for this ticket
    Listening(Ticket),
}

#[derive(Debug, Clone, Default)]
pub struct AcquisitionController {
    capture: CaptureState,
    speech: SpeechDialog,
    // Never rewound, so tickets from before a reset stay stale
    generation: u64,
}

impl AcquisitionController {
    pub fn capture_state(&self) -> CaptureState {
        self.capture
    }

    pub fn speech_dialog(&self) -> SpeechDialog {
        self.speech
    }

    pub fn set_mode(&mut self, mode: AcquisitionMode) {
        self.capture = self.capture.with_mode(mode);
    }

    pub fn toggle_camera(&mut self) {
        self.capture = self.capture.toggled();
    }

    /// Whether a frame may be taken for `channel` right now
    pub fn accepts(&self, channel: Channel) -> bool {
        match channel {
            Channel::Camera => self.capture.camera_on(),
            Channel::Upload => self.capture.mode() == Some(AcquisitionMode::Upload),
            Channel::Speech => self.speech == SpeechDialog::Open,
        }
    }

    /// Draw a new ticket, superseding every outstanding attempt
    pub fn issue(&mut self, channel: Channel) -> Ticket {
        self.generation += 1;
        let ticket = Ticket {
            generation: self.generation,
            channel,
        };
        if channel == Channel::Speech {
            self.speech = SpeechDialog::Listening(ticket);
        }
        ticket
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation
    }

    pub fn open_speech_dialog(&mut self) {
        if self.speech == SpeechDialog::Closed {
            self.speech = SpeechDialog::Open;
        }
    }

    /// Close the dialog; returns the ticket whose transcription is now abandoned
    pub fn cancel_speech(&mut self) -> Option<Ticket> {
        let abandoned = match self.speech {
            SpeechDialog::Listening(ticket) => Some(ticket),
            _ => None,
        };
        self.speech = SpeechDialog::Closed;
        abandoned
    }

    /// Close the dialog for a finished transcription
    ///
    /// Returns `false` when the dialog was cancelled or reset meanwhile, in
    /// which case the result must not be applied.
    pub fn finish_speech(&mut self, ticket: Ticket) -> bool {
        if self.speech == SpeechDialog::Listening(ticket) {
            self.speech = SpeechDialog::Closed;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.capture = CaptureState::Idle;
        self.speech = SpeechDialog::Closed;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaving_scan_turns_camera_off() {
        let state = CaptureState::Idle.toggled();
        assert_eq!(state, CaptureState::ScanOn);
        assert!(state.camera_on());

        let state = state.with_mode(AcquisitionMode::Upload);
        assert_eq!(state, CaptureState::UploadActive);
        assert!(!state.camera_on());

        let state = state.with_mode(AcquisitionMode::Scan);
        assert_eq!(state, CaptureState::ScanOff);
    }

    #[test]
    fn test_camera_button_selects_scan_mode() {
        let state = CaptureState::UploadActive.toggled();
        assert_eq!(state, CaptureState::ScanOn);
        assert_eq!(state.with_mode(AcquisitionMode::Scan), CaptureState::ScanOn);
        assert_eq!(state.toggled(), CaptureState::ScanOff);
    }

    #[test]
    fn test_channel_acceptance_follows_mode() {
        let mut controller = AcquisitionController::default();
        assert!(!controller.accepts(Channel::Camera));
        assert!(!controller.accepts(Channel::Upload));

        controller.set_mode(AcquisitionMode::Upload);
        assert!(controller.accepts(Channel::Upload));
        assert!(!controller.accepts(Channel::Camera));

        controller.toggle_camera();
        assert!(controller.accepts(Channel::Camera));
        assert!(!controller.accepts(Channel::Upload));
    }

    #[test]
    fn test_later_ticket_supersedes_earlier() {
        let mut controller = AcquisitionController::default();
        let first = controller.issue(Channel::Upload);
        let second = controller.issue(Channel::Camera);
        assert!(!controller.is_current(first));
        assert!(controller.is_current(second));
    }

    #[test]
    fn test_reset_invalidates_outstanding_tickets() {
        let mut controller = AcquisitionController::default();
        let ticket = controller.issue(Channel::Upload);
        controller.reset();
        assert!(!controller.is_current(ticket));
        assert_eq!(controller.capture_state(), CaptureState::Idle);
    }

    #[test]
    fn test_speech_dialog_lifecycle() {
        let mut controller = AcquisitionController::default();
        assert!(!controller.accepts(Channel::Speech));

        controller.open_speech_dialog();
        assert!(controller.accepts(Channel::Speech));

        let ticket = controller.issue(Channel::Speech);
        assert_eq!(controller.speech_dialog(), SpeechDialog::Listening(ticket));
        assert!(controller.finish_speech(ticket));
        assert_eq!(controller.speech_dialog(), SpeechDialog::Closed);
    }

    #[test]
    fn test_cancelled_speech_is_not_finished() {
        let mut controller = AcquisitionController::default();
        controller.open_speech_dialog();
        let ticket = controller.issue(Channel::Speech);
        assert_eq!(controller.cancel_speech(), Some(ticket));
        assert!(!controller.finish_speech(ticket));
    }
}
