//! Remote text-generation provider used by assisted ranking and the chat assistant.
//!
//! The core talks to the provider strictly request/response: one call, no
//! retries, no streaming. [`RemoteProvider`] bounds every call with a timeout.

pub mod config;
pub mod error;
pub mod remote;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use config::AssistConfig;
pub use error::ProviderError;
pub use remote::RemoteProvider;

#[cfg(any(test, feature = "mock"))]
pub use mock::ScriptedProvider;

use async_trait::async_trait;

/// A single prompt/response exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            max_tokens: config::DEFAULT_MAX_TOKENS,
            temperature: config::DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
/// Text-generation backend.
pub trait CompletionProvider: Send + Sync {
    /// Sends the request and returns the first text block of the reply.
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;
}
