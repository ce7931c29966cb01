//! Confirmed name to nutrition record.
//!
//! Holds the current record and the identity of the one lookup that may be
//! in flight. A completion whose ticket no longer matches (because the
//! session was reset meanwhile) is dropped.

use crate::errors::{AppError, AppResult};
use crate::nutrition::NutritionRecord;

pub const CONFIRM_BEFORE_SEARCH: &str = "Please confirm the product name before searching.";
pub const SEARCH_IN_PROGRESS: &str = "A request is already in progress. Please wait.";
pub const SEARCH_FAILED: &str = "Something went wrong!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupTicket(u64);

#[derive(Debug, Clone, Default)]
pub struct ProductLookupController {
    record: Option<NutritionRecord>,
    in_flight: Option<LookupTicket>,
    issued: u64,
}

impl ProductLookupController {
    pub fn record(&self) -> Option<&NutritionRecord> {
        self.record.as_ref()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start a lookup for `confirmed`; `busy` is the session-wide loading flag
    pub fn begin(&mut self, confirmed: Option<&str>, busy: bool) -> AppResult<(LookupTicket, String)> {
        let name = confirmed
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::Validation(CONFIRM_BEFORE_SEARCH.to_string()))?;
        if busy {
            return Err(AppError::Validation(SEARCH_IN_PROGRESS.to_string()));
        }

        self.issued += 1;
        let ticket = LookupTicket(self.issued);
        self.in_flight = Some(ticket);
        Ok((ticket, name.to_string()))
    }

    /// Settle a lookup; returns `false` when the ticket is stale
    pub fn finish(&mut self, ticket: LookupTicket, result: Option<NutritionRecord>) -> bool {
        if self.in_flight != Some(ticket) {
            return false;
        }
        self.in_flight = None;
        self.record = result;
        true
    }

    pub fn reset(&mut self) {
        self.record = None;
        self.in_flight = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_confirmed_name() {
        let mut lookup = ProductLookupController::default();
        let err = lookup.begin(None, false).unwrap_err();
        assert_eq!(err.user_message(), CONFIRM_BEFORE_SEARCH);
        assert!(lookup.begin(Some("  "), false).is_err());
        assert!(!lookup.in_flight());
    }

    #[test]
    fn test_rejects_while_busy() {
        let mut lookup = ProductLookupController::default();
        let err = lookup.begin(Some("Oreo"), true).unwrap_err();
        assert!(err.is_validation());
        assert!(!lookup.in_flight());
    }

    #[test]
    fn test_finish_replaces_record() {
        let mut lookup = ProductLookupController::default();
        let (ticket, name) = lookup.begin(Some("Oreo"), false).unwrap();
        assert_eq!(name, "Oreo");
        assert!(lookup.in_flight());

        assert!(lookup.finish(ticket, Some(NutritionRecord::default())));
        assert!(lookup.record().is_some());
        assert!(!lookup.in_flight());
    }

    #[test]
    fn test_stale_ticket_after_reset_is_dropped() {
        let mut lookup = ProductLookupController::default();
        let (ticket, _) = lookup.begin(Some("Oreo"), false).unwrap();
        lookup.reset();
        assert!(!lookup.finish(ticket, Some(NutritionRecord::default())));
        assert!(lookup.record().is_none());

        let (next, _) = lookup.begin(Some("Oreo"), false).unwrap();
        assert_ne!(next, ticket);
    }
}
