//! LLM Gateway port
//!
//! Defines the interface for communicating with the language-model service.

use async_trait::async_trait;
use pyhc_domain::{Message, Model, ModelTier};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Timeout")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// One chat-completion request.
///
/// `tier` tells the adapter which budget the call belongs to; `model` is
/// already resolved from the tier by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub tier: ModelTier,
    pub model: Model,
    pub messages: Vec<Message>,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(tier: ModelTier, model: Model, messages: Vec<Message>) -> Self {
        Self {
            tier,
            model,
            messages,
            temperature: 0.7,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Content of the last user message, if any.
    pub fn last_user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == pyhc_domain::Role::User)
            .map(|m| m.content.as_str())
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer talks to the language-model
/// service. Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send a conversation and return the completion text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError>;
}
