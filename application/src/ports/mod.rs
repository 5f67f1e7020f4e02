//! Port definitions (interfaces) for the application layer

pub mod conversation_logger;
pub mod llm_gateway;
pub mod progress;
pub mod retriever;
