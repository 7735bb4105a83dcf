//! Effects produced by state transitions

use super::PendingRequest;

/// Effects to be executed after a state transition, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append the fixed opening question to the conversation
    SeedOpening,

    /// Append a user turn
    AppendUser { text: String },

    /// Append an assistant turn
    AppendAssistant { text: String },

    /// Issue a completion request
    RequestCompletion(PendingRequest),

    /// Replace the final article
    StoreArticle { text: String },

    /// Remember a failed completion for the failure notification channel
    RecordFailure {
        request: PendingRequest,
        message: String,
    },

    /// Forget the last recorded failure
    ClearFailure,
}

impl Effect {
    pub fn append_user(text: impl Into<String>) -> Self {
        Effect::AppendUser { text: text.into() }
    }

    pub fn append_assistant(text: impl Into<String>) -> Self {
        Effect::AppendAssistant { text: text.into() }
    }
}
