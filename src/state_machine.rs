//! Dialogue state machine
//!
//! Pure state transitions: the runtime feeds events in and executes the
//! returned effects. Nothing in here performs I/O.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{DialogueState, PendingRequest, Phase};
pub use transition::{transition, TransitionError, TransitionResult};
