//! Runtime for executing the dialogue
//!
//! Owns the single session, runs completions and publishes session events
//! to connected clients.

mod session;


pub use session::{CompletionRequest, Session, SessionSnapshot};

use crate::conversation::DisplayMessage;
use crate::llm::CompletionService;
use crate::state_machine::{Event, Phase, TransitionError};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

/// Events sent to streaming clients
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A message was appended at `sequence` in the transcript
    Message {
        sequence: usize,
        message: DisplayMessage,
    },
    StateChange {
        phase: Phase,
        in_flight: bool,
    },
    Article {
        text: String,
    },
    Error {
        message: String,
    },
}

/// Handle to the dialogue session. Cheap to clone.
#[derive(Clone)]
pub struct DialogueRuntime {
    service: Arc<dyn CompletionService>,
    session: Arc<Mutex<Session>>,
    broadcast_tx: broadcast::Sender<SessionEvent>,
}

impl DialogueRuntime {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self::with_session(service, Session::new())
    }

    pub fn with_session(service: Arc<dyn CompletionService>, session: Session) -> Self {
        let (broadcast_tx, _) = broadcast::channel(128);
        Self {
            service,
            session: Arc::new(Mutex::new(session)),
            broadcast_tx,
        }
    }

    pub fn model_id(&self) -> &str {
        self.service.model_id()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    /// Subscribe to session events along with the state they start from.
    ///
    /// Both are taken under the session lock so no event falls between them.
    pub async fn subscribe(&self) -> (SessionSnapshot, broadcast::Receiver<SessionEvent>) {
        let session = self.session.lock().await;
        (session.snapshot(), self.broadcast_tx.subscribe())
    }

    /// Open the dialogue with the fixed opening question
    pub async fn start(&self) -> Result<SessionSnapshot, TransitionError> {
        self.dispatch(Event::Start).await?;
        Ok(self.snapshot().await)
    }

    /// Append a user turn and wait for the assistant reply.
    ///
    /// A failed completion is not an error here: the user turn stays in the
    /// transcript without a reply and `last_error` is set.
    pub async fn send(&self, text: impl Into<String>) -> Result<SessionSnapshot, TransitionError> {
        if let Some(request) = self.dispatch(Event::user_message(text)).await? {
            self.run_completion(request).await;
        }
        Ok(self.snapshot().await)
    }

    /// Synthesize the article from the user's answers
    pub async fn finalize(&self) -> Result<SessionSnapshot, TransitionError> {
        if let Some(request) = self.dispatch(Event::Finalize).await? {
            self.run_completion(request).await;
        }
        Ok(self.snapshot().await)
    }

    async fn dispatch(&self, event: Event) -> Result<Option<CompletionRequest>, TransitionError> {
        let name = event.name();
        let mut session = self.session.lock().await;
        let outcome = session.handle(event).inspect_err(|e| {
            tracing::debug!(event = name, error = %e, "Event rejected");
        })?;

        for notification in outcome.notifications {
            // No subscribers is fine
            let _ = self.broadcast_tx.send(notification);
        }
        Ok(outcome.request)
    }

    /// Run the completion on its own task.
    ///
    /// The task always dispatches a completion event, so the in-flight flag
    /// is released even when the service errors, panics, or the caller stops
    /// waiting.
    async fn run_completion(&self, request: CompletionRequest) {
        let runtime = self.clone();
        let task = tokio::spawn(async move {
            let CompletionRequest { kind, messages } = request;
            tracing::debug!(request = ?kind, messages = messages.len(), "Issuing completion");

            let result = AssertUnwindSafe(runtime.service.complete(&messages))
                .catch_unwind()
                .await;

            let event = match result {
                Ok(Ok(text)) => Event::CompletionSucceeded { text },
                Ok(Err(e)) => Event::CompletionFailed {
                    message: e.to_string(),
                },
                Err(_) => Event::CompletionFailed {
                    message: "Completion service panicked".to_string(),
                },
            };

            if let Err(e) = runtime.dispatch(event).await {
                tracing::error!(error = %e, "Failed to settle completion");
            }
        });

        if let Err(e) = task.await {
            tracing::error!(error = %e, "Completion task did not finish");
        }
    }
}
