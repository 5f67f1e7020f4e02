//! HTTP client for the per-source retrieval service.
//!
//! The service owns the embedded corpora. For each source it runs a
//! similarity search and a grounded completion, and answers
//!
//! ```text
//! POST {base_url}/sources/{id}/query
//! {"question": "...", "chat_history": [{"role": "user", "text": "..."}]}
//! -> {"answer": "..."}
//! ```

use crate::config::FileRetrievalConfig;
use async_trait::async_trait;
use pyhc_application::ports::retriever::{RetrievalError, SourceRetriever};
use pyhc_domain::{ConversationTurn, SourceId};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    question: &'a str,
    chat_history: &'a [ConversationTurn],
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    answer: String,
}

/// [`SourceRetriever`] backed by the retrieval service's HTTP API.
pub struct HttpSourceRetriever {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpSourceRetriever {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_config(config: &FileRetrievalConfig) -> Self {
        Self::new(&config.base_url, config.api_key())
    }

    fn endpoint(&self, source: &SourceId) -> String {
        format!("{}/sources/{}/query", self.base_url, source)
    }
}

#[async_trait]
impl SourceRetriever for HttpSourceRetriever {
    async fn retrieve(
        &self,
        source: &SourceId,
        question: &str,
        history: &[ConversationTurn],
    ) -> Result<String, RetrievalError> {
        let url = self.endpoint(source);
        debug!("POST {} ({} history turns)", url, history.len());

        let mut request = self.client.post(&url).json(&QueryRequest {
            question,
            chat_history: history,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let failed = |message: String| RetrievalError::RequestFailed {
            source_id: source.clone(),
            message,
        };

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                RetrievalError::Timeout(source.clone())
            } else {
                failed(e.to_string())
            }
        })?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(RetrievalError::UnknownSource(source.clone())),
            status => {
                let body = response.text().await.unwrap_or_default();
                return Err(failed(format!("HTTP {}: {}", status.as_u16(), body.trim())));
            }
        }

        let body: QueryResponse =
            response
                .json()
                .await
                .map_err(|e| RetrievalError::InvalidResponse {
                    source_id: source.clone(),
                    message: e.to_string(),
                })?;

        if body.answer.trim().is_empty() {
            return Err(RetrievalError::InvalidResponse {
                source_id: source.clone(),
                message: "empty answer".to_string(),
            });
        }
        Ok(body.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sid(s: &str) -> SourceId {
        SourceId::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_retrieve_sends_question_and_history() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sources/sunpy/query"))
            .and(body_json(serde_json::json!({
                "question": "How do I load an AIA map?",
                "chat_history": [
                    {"role": "user", "text": "Hi"},
                    {"role": "assistant", "text": "Hello!"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "answer": "Use sunpy.map.Map(path)."
            })))
            .expect(1)
            .mount(&server)
            .await;

        let retriever = HttpSourceRetriever::new(&server.uri(), None);
        let history = [
            ConversationTurn::User("Hi".into()),
            ConversationTurn::Assistant("Hello!".into()),
        ];
        let answer = retriever
            .retrieve(&sid("sunpy"), "How do I load an AIA map?", &history)
            .await
            .unwrap();
        assert_eq!(answer, "Use sunpy.map.Map(path).");
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "answer": "ok"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let retriever = HttpSourceRetriever::new(&server.uri(), Some("secret".into()));
        assert_eq!(retriever.retrieve(&sid("pysat"), "q", &[]).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_not_found_is_unknown_source() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let retriever = HttpSourceRetriever::new(&server.uri(), None);
        let err = retriever.retrieve(&sid("kamodo"), "q", &[]).await.unwrap_err();
        assert_eq!(err, RetrievalError::UnknownSource(sid("kamodo")));
    }

    #[tokio::test]
    async fn test_server_error_is_request_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("index loading"))
            .mount(&server)
            .await;

        let retriever = HttpSourceRetriever::new(&server.uri(), None);
        let err = retriever.retrieve(&sid("sunpy"), "q", &[]).await.unwrap_err();
        assert_eq!(
            err,
            RetrievalError::RequestFailed {
                source_id: sid("sunpy"),
                message: "HTTP 503: index loading".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_blank_answer_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "answer": "   "
            })))
            .mount(&server)
            .await;

        let retriever = HttpSourceRetriever::new(&server.uri(), None);
        let err = retriever.retrieve(&sid("sunpy"), "q", &[]).await.unwrap_err();
        assert!(matches!(err, RetrievalError::InvalidResponse { .. }));
        assert_eq!(err.source_id(), &sid("sunpy"));
    }

    #[test]
    fn test_endpoint() {
        let retriever = HttpSourceRetriever::new("http://127.0.0.1:8700/", None);
        assert_eq!(
            retriever.endpoint(&sid("pyhc")),
            "http://127.0.0.1:8700/sources/pyhc/query"
        );
    }
}
