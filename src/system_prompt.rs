//! Prompts for the dialogue and article phases
//!
//! The persona prompt seeds every session. The editor prompt is used only
//! for the one-shot article request built at finalize time.

use crate::conversation::Message;

/// Persona prompt that opens every conversation
pub const SOCRATIC_PERSONA: &str = r"You are a Socratic dialogue partner. You will engage the user in a thoughtful exploration of their worldview.

Ask one probing question at a time. Build each question on the user's previous answer: clarify their terms, surface the assumptions behind a claim, and test it against counterexamples or consequences they may not have considered.

Do not lecture and do not argue for your own position. Keep replies short, warm, and curious.";

/// Fixed assistant turn that opens the dialogue
pub const OPENING_QUESTION: &str = "What is one view you hold strongly?";

/// System prompt for synthesizing the final article
pub const EDITOR_PROMPT: &str = r"You are an editor. Take all the user's responses from a Socratic dialogue and turn them into a cohesive, well-structured article written in the user's own voice.

Preserve the user's positions and reasoning. Do not introduce new arguments, and do not mention the dialogue or the questions that prompted the answers. Only produce the article text.";

/// Build the two-message conversation sent when finalizing.
///
/// Independent of the main transcript: the editor prompt followed by the
/// concatenated user answers as a single user turn.
pub fn article_request(user_content: impl Into<String>) -> Vec<Message> {
    vec![
        Message::system(EDITOR_PROMPT),
        Message::user(user_content),
    ]
}
