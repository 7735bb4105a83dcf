//! Session state and effect execution
//!
//! All mutation of the conversation, article and error slot goes through
//! [`Session::handle`].

use super::SessionEvent;
use crate::conversation::{Conversation, DisplayMessage, Message};
use crate::state_machine::{
    transition, DialogueState, Effect, Event, PendingRequest, Phase, TransitionError,
};
use crate::system_prompt::{article_request, SOCRATIC_PERSONA};
use serde::Serialize;

/// A completion the runtime must issue
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub kind: PendingRequest,
    pub messages: Vec<Message>,
}

/// What handling one event produced
#[derive(Debug, Default)]
pub struct Outcome {
    pub request: Option<CompletionRequest>,
    pub notifications: Vec<SessionEvent>,
}

/// Read-only view handed to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub in_flight: bool,
    pub messages: Vec<DisplayMessage>,
    pub final_article: Option<String>,
    pub last_error: Option<String>,
}

/// The single dialogue session
#[derive(Debug, Clone)]
pub struct Session {
    state: DialogueState,
    conversation: Conversation,
    final_article: Option<String>,
    last_error: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_persona(SOCRATIC_PERSONA)
    }

    pub fn with_persona(persona: impl Into<String>) -> Self {
        Self {
            state: DialogueState::default(),
            conversation: Conversation::new(persona),
            final_article: None,
            last_error: None,
        }
    }

    /// Run one event through the state machine and execute its effects.
    ///
    /// A rejected event leaves the session untouched.
    pub fn handle(&mut self, event: Event) -> Result<Outcome, TransitionError> {
        let before = self.state;
        let result = transition(&self.state, event)?;
        self.state = result.new_state;

        let mut outcome = Outcome::default();
        for effect in result.effects {
            self.apply(effect, &mut outcome);
        }

        if self.state != before {
            outcome.notifications.push(SessionEvent::StateChange {
                phase: self.state.phase,
                in_flight: self.state.is_in_flight(),
            });
        }
        Ok(outcome)
    }

    fn apply(&mut self, effect: Effect, outcome: &mut Outcome) {
        match effect {
            Effect::SeedOpening => {
                self.conversation.start();
                self.notify_last_message(outcome);
            }
            Effect::AppendUser { text } => {
                if self.conversation.append_user(&text) {
                    self.notify_last_message(outcome);
                }
            }
            Effect::AppendAssistant { text } => {
                self.conversation.append_assistant(text);
                self.notify_last_message(outcome);
            }
            Effect::RequestCompletion(kind) => {
                let messages = match kind {
                    PendingRequest::Reply => self.conversation.messages().to_vec(),
                    PendingRequest::Article => {
                        article_request(self.conversation.extract_user_content())
                    }
                };
                outcome.request = Some(CompletionRequest { kind, messages });
            }
            Effect::StoreArticle { text } => {
                tracing::info!(chars = text.chars().count(), "Article updated");
                self.final_article = Some(text.clone());
                outcome.notifications.push(SessionEvent::Article { text });
            }
            Effect::RecordFailure { request, message } => {
                tracing::warn!(request = ?request, error = %message, "Completion produced no result");
                self.last_error = Some(message.clone());
                outcome.notifications.push(SessionEvent::Error { message });
            }
            Effect::ClearFailure => {
                self.last_error = None;
            }
        }
    }

    fn notify_last_message(&self, outcome: &mut Outcome) {
        let Some(last) = self.conversation.messages().last() else {
            return;
        };
        if let Some(message) = DisplayMessage::from_message(last) {
            outcome.notifications.push(SessionEvent::Message {
                sequence: self.conversation.len() - 1,
                message,
            });
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.state.phase,
            in_flight: self.state.is_in_flight(),
            messages: self.conversation.display_messages(),
            final_article: self.final_article.clone(),
            last_error: self.last_error.clone(),
        }
    }
}

#[cfg(test)]
impl Session {
    pub fn state(&self) -> DialogueState {
        self.state
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn final_article(&self) -> Option<&str> {
        self.final_article.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
