//! Shared utilities for use cases.
//!
//! Timeout-bounded remote calls and conversation assembly used by the
//! selection, decomposition, synthesis and recovery use cases.

use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::ports::retriever::{RetrievalError, SourceRetriever};
use pyhc_domain::{ConversationTurn, Message, SourceId, turns_to_messages};
use std::time::Duration;

/// Send a completion request, failing with [`GatewayError::Timeout`] when
/// `timeout` elapses first.
pub(crate) async fn complete_with_timeout(
    gateway: &dyn LlmGateway,
    request: &CompletionRequest,
    timeout: Duration,
) -> Result<String, GatewayError> {
    match tokio::time::timeout(timeout, gateway.complete(request)).await {
        Ok(result) => result,
        Err(_) => Err(GatewayError::Timeout),
    }
}

/// Retrieve from one source, failing with [`RetrievalError::Timeout`] when
/// `timeout` elapses first.
pub(crate) async fn retrieve_with_timeout(
    retriever: &dyn SourceRetriever,
    source: &SourceId,
    question: &str,
    history: &[ConversationTurn],
    timeout: Duration,
) -> Result<String, RetrievalError> {
    match tokio::time::timeout(timeout, retriever.retrieve(source, question, history)).await {
        Ok(result) => result,
        Err(_) => Err(RetrievalError::Timeout(source.clone())),
    }
}

/// `[system] + history + [user]`
pub(crate) fn conversation(
    system: String,
    history: &[ConversationTurn],
    user: impl Into<String>,
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(system));
    messages.extend(turns_to_messages(history));
    messages.push(Message::user(user));
    messages
}
