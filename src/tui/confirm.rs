//! Yes/no confirmation around a single pending side effect.

use super::machine::InteractionState;

/// Side-effecting action waiting on confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    DeleteTask,
    ResetTimer,
}

impl PendingAction {
    /// The state the action was armed from.
    pub fn origin(self) -> InteractionState {
        match self {
            PendingAction::DeleteTask => InteractionState::NotRunning,
            PendingAction::ResetTimer => InteractionState::Running,
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            PendingAction::DeleteTask => "Delete this task?",
            PendingAction::ResetTimer => "Discard this session as entropy?",
        }
    }
}

/// The user's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

/// What resolving the gate decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Run the action's side effect
    Confirmed(PendingAction),
    /// Drop the action without side effect
    Declined(PendingAction),
}

/// Holds at most one pending action.
#[derive(Debug, Clone, Default)]
pub struct ConfirmationGate {
    pending: Option<PendingAction>,
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the action. Must happen right before entering Confirming.
    pub fn arm(&mut self, action: PendingAction) {
        debug_assert!(self.pending.is_none(), "gate armed twice");
        self.pending = Some(action);
    }

    pub fn pending(&self) -> Option<PendingAction> {
        self.pending
    }

    /// Clear the slot and report what to do. `None` means the gate was never
    /// armed, which the transition table rules out.
    pub fn resolve(&mut self, answer: Answer) -> Option<Resolution> {
        let action = self.pending.take()?;
        Some(match answer {
            Answer::Yes => Resolution::Confirmed(action),
            Answer::No => Resolution::Declined(action),
        })
    }

    /// Drop any pending action (used when quitting from Confirming).
    pub fn disarm(&mut self) {
        self.pending = None;
    }
}
