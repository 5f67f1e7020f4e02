//! Application layer for pyhc-chat
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{CompletionRequest, GatewayError, LlmGateway},
    progress::{NoProgress, ProgressNotifier},
    retriever::{RetrievalError, SourceRetriever},
};
pub use use_cases::decompose_query::{DecomposeQueryError, DecomposeQueryUseCase};
pub use use_cases::recover_output::{RecoveryError, StructuredOutputRecovery};
pub use use_cases::run_chat::{ChatError, ChatOrchestrator, UpstreamError};
pub use use_cases::select_sources::{SelectSourcesError, SelectSourcesUseCase};
pub use use_cases::synthesize_answer::{SynthesizeAnswerError, SynthesizeAnswerUseCase};
