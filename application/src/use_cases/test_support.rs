//! Scripted gateway and retriever used by use case tests.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::ports::retriever::{RetrievalError, SourceRetriever};
use async_trait::async_trait;
use pyhc_domain::{ConversationTurn, ModelTier, SourceId};
use std::collections::{BTreeSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Gateway that replays scripted replies per tier and counts calls.
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    primary: Mutex<VecDeque<Result<String, GatewayError>>>,
    recovery: Mutex<VecDeque<Result<String, GatewayError>>>,
    primary_calls: AtomicUsize,
    recovery_calls: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>,
    delay: Option<Duration>,
}

impl ScriptedGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn primary(self, reply: &str) -> Self {
        self.primary_result(Ok(reply.to_string()))
    }

    pub(crate) fn primary_result(self, reply: Result<String, GatewayError>) -> Self {
        self.primary.lock().unwrap().push_back(reply);
        self
    }

    pub(crate) fn recovery(self, reply: &str) -> Self {
        self.recovery_result(Ok(reply.to_string()))
    }

    pub(crate) fn recovery_result(self, reply: Result<String, GatewayError>) -> Self {
        self.recovery.lock().unwrap().push_back(reply);
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn primary_calls(&self) -> usize {
        self.primary_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn recovery_calls(&self) -> usize {
        self.recovery_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let (queue, counter) = match request.tier {
            ModelTier::Primary => (&self.primary, &self.primary_calls),
            ModelTier::Recovery => (&self.recovery, &self.recovery_calls),
        };
        counter.fetch_add(1, Ordering::SeqCst);
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Other("no scripted reply".to_string())))
    }
}

/// Retriever that answers `"<source> says: <question>"` and records calls.
#[derive(Default)]
pub(crate) struct RecordingRetriever {
    calls: Mutex<Vec<(SourceId, String, usize)>>,
    failing: BTreeSet<SourceId>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingRetriever {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_on(mut self, source: &str) -> Self {
        self.failing.insert(SourceId::new(source).unwrap());
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// `(source, question, history length)` per call.
    pub(crate) fn calls(&self) -> Vec<(SourceId, String, usize)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceRetriever for RecordingRetriever {
    async fn retrieve(
        &self,
        source: &SourceId,
        question: &str,
        history: &[ConversationTurn],
    ) -> Result<String, RetrievalError> {
        self.calls
            .lock()
            .unwrap()
            .push((source.clone(), question.to_string(), history.len()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(source) {
            return Err(RetrievalError::RequestFailed {
                source_id: source.clone(),
                message: "index unavailable".to_string(),
            });
        }
        Ok(format!("{} says: {}", source, question))
    }
}

/// Logger that keeps event types in memory.
#[derive(Default)]
pub(crate) struct MemoryLogger {
    events: Mutex<Vec<(String, serde_json::Value)>>,
}

impl MemoryLogger {
    pub(crate) fn event_types(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(t, _)| t.clone())
            .collect()
    }

    pub(crate) fn payloads(&self, event_type: &str) -> Vec<serde_json::Value> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == event_type)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

impl ConversationLogger for MemoryLogger {
    fn log(&self, event: ConversationEvent) {
        self.events
            .lock()
            .unwrap()
            .push((event.event_type.to_string(), event.payload));
    }
}
