//! OpenAI-compatible language-model adapter
//!
//! Works with the OpenAI API and with any server exposing the same
//! chat-completions endpoint (Azure OpenAI proxies, vLLM, Ollama, ...).

pub mod gateway;
mod protocol;

pub use gateway::{OpenAiConfigError, OpenAiLlmGateway};
