//! Confirmation dialog for the signature flow.
//!
//! `Closed --open--> Open --cancel--> Closed`
//! `Open --confirm--> Closed` + place the signature.
//!
//! Cancel and confirm are ignored while closed; open is idempotent.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DialogState {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEvent {
    Open,
    Cancel,
    Confirm,
}

/// What the caller must do after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEffect {
    None,
    /// The dialog just opened; start with a blank pad
    ResetPad,
    /// The user confirmed; run the insert placement
    PlaceSignature,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureDialog {
    state: DialogState,
}

impl SignatureDialog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> DialogState {
        self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == DialogState::Open
    }

    pub fn handle(&mut self, event: DialogEvent) -> DialogEffect {
        match (self.state, event) {
            (DialogState::Closed, DialogEvent::Open) => {
                self.state = DialogState::Open;
                DialogEffect::ResetPad
            }
            (DialogState::Open, DialogEvent::Cancel) => {
                self.state = DialogState::Closed;
                DialogEffect::None
            }
            (DialogState::Open, DialogEvent::Confirm) => {
                self.state = DialogState::Closed;
                DialogEffect::PlaceSignature
            }
            (DialogState::Open, DialogEvent::Open)
            | (DialogState::Closed, DialogEvent::Cancel | DialogEvent::Confirm) => {
                DialogEffect::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_closed() {
        assert_eq!(SignatureDialog::new().state(), DialogState::Closed);
    }

    #[test]
    fn test_confirm_places_and_closes() {
        let mut dialog = SignatureDialog::new();
        assert_eq!(dialog.handle(DialogEvent::Open), DialogEffect::ResetPad);
        assert!(dialog.is_open());
        assert_eq!(
            dialog.handle(DialogEvent::Confirm),
            DialogEffect::PlaceSignature
        );
        assert!(!dialog.is_open());
    }

    #[test]
    fn test_cancel_closes_without_placing() {
        let mut dialog = SignatureDialog::new();
        dialog.handle(DialogEvent::Open);
        assert_eq!(dialog.handle(DialogEvent::Cancel), DialogEffect::None);
        assert_eq!(dialog.state(), DialogState::Closed);
    }

    #[test]
    fn test_events_out_of_state_are_ignored() {
        let mut dialog = SignatureDialog::new();
        assert_eq!(dialog.handle(DialogEvent::Confirm), DialogEffect::None);
        assert_eq!(dialog.handle(DialogEvent::Cancel), DialogEffect::None);
        assert_eq!(dialog.state(), DialogState::Closed);

        dialog.handle(DialogEvent::Open);
        // Re-opening keeps the drawing in progress
        assert_eq!(dialog.handle(DialogEvent::Open), DialogEffect::None);
        assert!(dialog.is_open());
    }

    #[test]
    fn test_cycles() {
        let mut dialog = SignatureDialog::new();
        for _ in 0..3 {
            dialog.handle(DialogEvent::Open);
            dialog.handle(DialogEvent::Confirm);
        }
        assert_eq!(dialog.state(), DialogState::Closed);
    }
}
