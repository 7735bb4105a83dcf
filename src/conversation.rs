//! Conversation transcript
//!
//! An append-only, ordered sequence of role-tagged messages. This is the
//! single source of truth sent to the completion service. The first message
//! is always the system persona prompt; nothing is ever reordered, edited or
//! removed.

use crate::system_prompt::OPENING_QUESTION;
use serde::{Deserialize, Serialize};

/// Separator placed between user answers when they are extracted
pub const USER_CONTENT_SEPARATOR: &str = "\n\n";

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire name used by chat-completion APIs
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Speaker attribution for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

/// Rendering projection of a [`Message`]. System messages have no projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayMessage {
    pub speaker: Speaker,
    pub content: String,
}

impl DisplayMessage {
    pub fn from_message(message: &Message) -> Option<Self> {
        let speaker = match message.role {
            Role::System => return None,
            Role::User => Speaker::User,
            Role::Assistant => Speaker::Assistant,
        };
        Some(Self {
            speaker,
            content: message.content.clone(),
        })
    }
}

/// Ordered transcript seeded with a persona prompt
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    /// Append the fixed opening question.
    ///
    /// Does not deduplicate; callers guard against starting twice.
    pub fn start(&mut self) {
        self.messages.push(Message::assistant(OPENING_QUESTION));
    }

    /// Append a user turn. Blank text is ignored and `false` is returned.
    pub fn append_user(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.messages.push(Message::user(text));
        true
    }

    pub fn append_assistant(&mut self, text: impl Into<String>) {
        self.messages.push(Message::assistant(text));
    }

    /// All user answers in transcript order, separated by a blank line
    pub fn extract_user_content(&self) -> String {
        self.messages
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join(USER_CONTENT_SEPARATOR)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn display_messages(&self) -> Vec<DisplayMessage> {
        self.messages
            .iter()
            .filter_map(DisplayMessage::from_message)
            .collect()
    }
}
