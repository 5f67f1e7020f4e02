//! Infrastructure layer for pyhc-chat
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod openai;
pub mod retrieval;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig, FileOpenAiConfig, FileRetrievalConfig};
pub use logging::JsonlConversationLogger;
pub use openai::{OpenAiConfigError, OpenAiLlmGateway};
pub use retrieval::HttpSourceRetriever;
