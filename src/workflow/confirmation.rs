//! Draft name vs. confirmed name.
//!
//! The confirmed name is the only input the product lookup accepts. It is
//! created by an explicit confirmation of a non-blank draft and dropped by
//! `edit` or by any new acquisition result.

use crate::errors::{AppError, AppResult};

pub const EMPTY_CONFIRMATION: &str = "Please enter a product name before confirming.";

#[derive(Debug, Clone, Default)]
pub struct ConfirmationGate {
    draft: String,
    confirmed: Option<String>,
}

impl ConfirmationGate {
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Present and non-blank whenever set
    pub fn confirmed(&self) -> Option<&str> {
        self.confirmed.as_deref()
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed.is_some()
    }

    /// Manual edit of the draft field; the field is locked while confirmed
    pub fn set_draft(&mut self, text: &str) -> bool {
        if self.is_confirmed() {
            return false;
        }
        self.draft = text.to_string();
        true
    }

    /// Replace the draft with an acquisition result, forcing re-confirmation
    pub fn accept_acquired(&mut self, text: String) {
        self.draft = text;
        self.confirmed = None;
    }

    /// Confirm the current draft as the trimmed product name
    pub fn confirm(&mut self) -> AppResult<&str> {
        let trimmed = self.draft.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(EMPTY_CONFIRMATION.to_string()));
        }
        let trimmed = trimmed.to_string();
        Ok(self.confirmed.insert(trimmed).as_str())
    }

    /// Unlock the draft; it still holds the text the user confirmed, since
    /// `set_draft` is refused while confirmed
    pub fn edit(&mut self) {
        self.confirmed = None;
    }

    pub fn reset(&mut self) {
        self.draft.clear();
        self.confirmed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_trims_draft() {
        let mut gate = ConfirmationGate::default();
        gate.set_draft("  Nutella 400g \n");
        assert_eq!(gate.confirm().unwrap(), "Nutella 400g");
        assert_eq!(gate.confirmed(), Some("Nutella 400g"));
    }

    #[test]
    fn test_blank_drafts_are_rejected() {
        for blank in ["", " ", "\t\n", "   \r\n  "] {
            let mut gate = ConfirmationGate::default();
            gate.set_draft(blank);
            let err = gate.confirm().unwrap_err();
            assert!(err.is_validation());
            assert_eq!(err.user_message(), EMPTY_CONFIRMATION);
            assert!(gate.confirmed().is_none());
        }
    }

    #[test]
    fn test_draft_is_locked_while_confirmed() {
        let mut gate = ConfirmationGate::default();
        gate.set_draft("Oreo");
        gate.confirm().unwrap();
        assert!(!gate.set_draft("Something else"));
        assert_eq!(gate.draft(), "Oreo");
    }

    #[test]
    fn test_edit_keeps_last_text() {
        let mut gate = ConfirmationGate::default();
        gate.set_draft(" Oreo ");
        gate.confirm().unwrap();
        gate.edit();
        assert!(!gate.is_confirmed());
        assert_eq!(gate.draft(), " Oreo ");
        assert!(gate.set_draft("Oreo Double"));
    }

    #[test]
    fn test_edit_without_confirmation_keeps_draft() {
        let mut gate = ConfirmationGate::default();
        gate.set_draft("Ore");
        gate.edit();
        assert_eq!(gate.draft(), "Ore");
        assert!(!gate.is_confirmed());
    }

    #[test]
    fn test_acquisition_result_forces_reconfirmation() {
        let mut gate = ConfirmationGate::default();
        gate.set_draft("Oreo");
        gate.confirm().unwrap();
        gate.accept_acquired("Nutella".to_string());
        assert_eq!(gate.draft(), "Nutella");
        assert!(gate.confirmed().is_none());
    }
}
