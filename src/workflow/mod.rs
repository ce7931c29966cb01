//! The scan workflow: acquisition, confirmation, lookup and the session
//! state machine composing them.

pub mod acquisition;
pub mod confirmation;
pub mod lookup;
pub mod orchestrator;
pub mod session;

pub use acquisition::{AcquisitionMode, CaptureState, Channel, SpeechDialog, Ticket};
pub use confirmation::{ConfirmationGate, EMPTY_CONFIRMATION};
pub use lookup::{LookupTicket, ProductLookupController, CONFIRM_BEFORE_SEARCH, SEARCH_FAILED, SEARCH_IN_PROGRESS};
pub use orchestrator::{
    Workflow, OCR_FAILED, OCR_NO_TEXT, PROFILE_FAILED, SPEECH_FAILED, SPEECH_NO_TEXT, USER_NOT_FOUND,
};
pub use session::{ErrorCategory, LoadingOp, Outcome, Phase, Session, WorkflowError, UPLOAD_MODE_REQUIRED};
