//! Socratic Dialogue - guided self-inquiry backed by a chat-completion API
//!
//! A single dialogue session driven by a pure state machine. The assistant
//! asks probing questions; on request the user's answers are synthesized
//! into an article.

mod api;
mod conversation;
mod llm;
mod runtime;
mod state_machine;
mod system_prompt;

use api::{create_router, AppState, ModelInfo};
use llm::LlmConfig;
use runtime::DialogueRuntime;
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "socratic_dialogue=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let port: u16 = std::env::var("SOCRATIC_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    let llm_config = LlmConfig::from_env();
    if !llm_config.has_api_key() {
        tracing::warn!("OPENAI_API_KEY is not set. Completions will fail until it is configured.");
    }

    let completion = llm_config.completion_config()?;
    let service = llm_config.build_service()?;
    let runtime = DialogueRuntime::new(service);

    tracing::info!(
        model = %runtime.model_id(),
        temperature = completion.temperature,
        endpoint = %llm_config.api_url(),
        "Completion service initialized"
    );

    // Create application state
    let state = AppState::new(runtime, ModelInfo::from(&completion));

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Socratic Dialogue server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
