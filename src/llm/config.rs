//! Completion configuration
//!
//! Values are read from the environment once at startup and then passed
//! explicitly to the completion service. The service itself never touches
//! the environment.

use super::{CompletionService, LlmError, LoggingService, OpenAIService};
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Errors raised while turning raw settings into a usable service
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SOCRATIC_TEMPERATURE must be a number, got {0:?}")]
    InvalidTemperature(String),
    #[error("temperature must be within [0, 1], got {0}")]
    TemperatureOutOfRange(f32),
    #[error("model identifier must not be empty")]
    EmptyModel,
    #[error("failed to build completion client: {0}")]
    Client(#[from] LlmError),
}

/// Options recognized by the completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionConfig {
    pub model: String,
    pub temperature: f32,
}

impl CompletionConfig {
    pub fn new(model: impl Into<String>, temperature: f32) -> Result<Self, ConfigError> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        if !(0.0..=1.0).contains(&temperature) {
            return Err(ConfigError::TemperatureOutOfRange(temperature));
        }
        Ok(Self { model, temperature })
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Raw provider settings as found in the environment
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    /// Completions endpoint override
    pub api_url: Option<String>,
    pub model: Option<String>,
    /// Unparsed so that bad values are reported instead of silently ignored
    pub temperature: Option<String>,
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            api_url: std::env::var("SOCRATIC_API_URL").ok(),
            model: std::env::var("SOCRATIC_MODEL").ok(),
            temperature: std::env::var("SOCRATIC_TEMPERATURE").ok(),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    pub fn completion_config(&self) -> Result<CompletionConfig, ConfigError> {
        let model = self.model.as_deref().unwrap_or(DEFAULT_MODEL);
        let temperature = match self.temperature.as_deref() {
            Some(raw) => raw
                .trim()
                .parse::<f32>()
                .map_err(|_| ConfigError::InvalidTemperature(raw.to_string()))?,
            None => DEFAULT_TEMPERATURE,
        };
        CompletionConfig::new(model, temperature)
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Build the production service, wrapped with logging.
    ///
    /// A missing key is not an error here: requests will fail with an
    /// authentication error and go through the normal failure path.
    pub fn build_service(&self) -> Result<Arc<dyn CompletionService>, ConfigError> {
        let completion = self.completion_config()?;
        let api_key = self.api_key.clone().unwrap_or_default();
        let service = OpenAIService::new(api_key, completion, self.api_url())?;
        Ok(Arc::new(LoggingService::new(Arc::new(service))))
    }
}
