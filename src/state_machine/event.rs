//! Events that drive the dialogue

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // User events
    Start,
    UserMessage { text: String },
    Finalize,

    // Completion events, always for the request recorded in `pending`
    CompletionSucceeded { text: String },
    CompletionFailed { message: String },
}

impl Event {
    pub fn user_message(text: impl Into<String>) -> Self {
        Event::UserMessage { text: text.into() }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Event::Start => "start",
            Event::UserMessage { .. } => "user_message",
            Event::Finalize => "finalize",
            Event::CompletionSucceeded { .. } => "completion_succeeded",
            Event::CompletionFailed { .. } => "completion_failed",
        }
    }
}
