//! Pure state transition function
//!
//! Guards:
//! - start only once
//! - send needs a started session, non-blank text and nothing in flight
//! - finalize needs a started session and nothing in flight

use super::{DialogueState, Effect, Event, PendingRequest, Phase};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: DialogueState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: DialogueState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Rejected events. A rejected event never changes state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Conversation has already started")]
    AlreadyStarted,
    #[error("Conversation has not started yet")]
    NotStarted,
    #[error("Message text is empty")]
    EmptyMessage,
    #[error("A request is already in flight")]
    Busy,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs, with no I/O.
pub fn transition(
    state: &DialogueState,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state.phase, state.pending, event) {
        // ============================================================
        // Start
        // ============================================================
        (Phase::NotStarted, None, Event::Start) => {
            Ok(TransitionResult::new(DialogueState::new(Phase::Active))
                .with_effect(Effect::SeedOpening))
        }

        (_, _, Event::Start) => Err(TransitionError::AlreadyStarted),

        // ============================================================
        // User actions
        // ============================================================
        (Phase::NotStarted, _, Event::UserMessage { .. } | Event::Finalize) => {
            Err(TransitionError::NotStarted)
        }

        (_, Some(_), Event::UserMessage { .. } | Event::Finalize) => Err(TransitionError::Busy),

        (_, None, Event::UserMessage { text }) if text.trim().is_empty() => {
            Err(TransitionError::EmptyMessage)
        }

        (_, None, Event::UserMessage { text }) => Ok(TransitionResult::new(
            state.with_pending(PendingRequest::Reply),
        )
        .with_effect(Effect::append_user(text))
        .with_effect(Effect::RequestCompletion(PendingRequest::Reply))),

        (_, None, Event::Finalize) => Ok(TransitionResult::new(
            state.with_pending(PendingRequest::Article),
        )
        .with_effect(Effect::RequestCompletion(PendingRequest::Article))),

        // ============================================================
        // Completion outcomes
        // ============================================================
        (_, Some(PendingRequest::Reply), Event::CompletionSucceeded { text }) => {
            Ok(TransitionResult::new(state.settled())
                .with_effect(Effect::append_assistant(text))
                .with_effect(Effect::ClearFailure))
        }

        (_, Some(PendingRequest::Article), Event::CompletionSucceeded { text }) => {
            Ok(TransitionResult::new(DialogueState::new(Phase::Finalized))
                .with_effect(Effect::StoreArticle { text })
                .with_effect(Effect::ClearFailure))
        }

        // Failure leaves the transcript one-sided and the article untouched
        (_, Some(request), Event::CompletionFailed { message }) => {
            Ok(TransitionResult::new(state.settled())
                .with_effect(Effect::RecordFailure { request, message }))
        }

        (_, None, event @ (Event::CompletionSucceeded { .. } | Event::CompletionFailed { .. })) => {
            Err(TransitionError::InvalidTransition(format!(
                "{} with no request in flight",
                event.name()
            )))
        }
    }
}
