//! HTTP API for the dialogue session

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
pub use types::ModelInfo;

use crate::runtime::DialogueRuntime;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: DialogueRuntime,
    pub model: ModelInfo,
}

impl AppState {
    pub fn new(runtime: DialogueRuntime, model: ModelInfo) -> Self {
        Self { runtime, model }
    }
}
