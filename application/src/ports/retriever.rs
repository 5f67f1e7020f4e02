//! Source retrieval port
//!
//! Per-source retrieval (similarity search plus a grounded completion) is an
//! external service. The orchestrator only needs one call per source.

use async_trait::async_trait;
use pyhc_domain::{ConversationTurn, SourceId};
use thiserror::Error;

/// Errors that can occur while retrieving from a source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetrievalError {
    #[error("Unknown source: {0}")]
    UnknownSource(SourceId),

    #[error("Retrieval from '{source_id}' failed: {message}")]
    RequestFailed { source_id: SourceId, message: String },

    #[error("Retrieval from '{0}' timed out")]
    Timeout(SourceId),

    #[error("Invalid response from '{source_id}': {message}")]
    InvalidResponse { source_id: SourceId, message: String },
}

impl RetrievalError {
    pub fn source_id(&self) -> &SourceId {
        match self {
            RetrievalError::UnknownSource(id) | RetrievalError::Timeout(id) => id,
            RetrievalError::RequestFailed { source_id, .. }
            | RetrievalError::InvalidResponse { source_id, .. } => source_id,
        }
    }
}

/// Retrieves a context-grounded answer from one source's corpus
#[async_trait]
pub trait SourceRetriever: Send + Sync {
    /// Ask `question` against `source`, with read-only conversation context.
    async fn retrieve(
        &self,
        source: &SourceId,
        question: &str,
        history: &[ConversationTurn],
    ) -> Result<String, RetrievalError>;
}
