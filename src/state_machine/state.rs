//! Dialogue state types

use serde::{Deserialize, Serialize};

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No opening question yet
    #[default]
    NotStarted,
    /// Dialogue underway, no article produced
    Active,
    /// An article exists. Not terminal: the dialogue can continue.
    Finalized,
}

/// Which completion is currently in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingRequest {
    /// Next assistant turn for the main conversation
    Reply,
    /// Article synthesized from the user's answers
    Article,
}

/// Full orchestration state. `pending` is the in-flight flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DialogueState {
    pub phase: Phase,
    pub pending: Option<PendingRequest>,
}

impl DialogueState {
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            pending: None,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.pending.is_some()
    }

    pub(crate) fn with_pending(self, pending: PendingRequest) -> Self {
        Self {
            pending: Some(pending),
            ..self
        }
    }

    pub(crate) fn settled(self) -> Self {
        Self {
            pending: None,
            ..self
        }
    }
}
