//! OpenAI-compatible chat-completions gateway

use super::protocol::{ChatCompletionRequest, ChatCompletionResponse, WireMessage, error_message};
use crate::config::FileOpenAiConfig;
use async_trait::async_trait;
use pyhc_application::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

/// Problems building the gateway from configuration
#[derive(Error, Debug)]
pub enum OpenAiConfigError {
    #[error("No API key: set {0} or providers.openai.api_key")]
    MissingApiKey(String),

    #[error("Could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// [`LlmGateway`] over any server that speaks `POST /v1/chat/completions`.
pub struct OpenAiLlmGateway {
    client: Client,
    api_key: String,
    endpoint: String,
    max_tokens: Option<u32>,
}

impl OpenAiLlmGateway {
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        max_tokens: Option<u32>,
    ) -> Result<Self, OpenAiConfigError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: format!("{}/v1/chat/completions", base_url.trim_end_matches('/')),
            max_tokens,
        })
    }

    /// Resolve the API key (explicit key first, then the named env var).
    pub fn from_config(config: &FileOpenAiConfig) -> Result<Self, OpenAiConfigError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(&config.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| OpenAiConfigError::MissingApiKey(config.api_key_env.clone()))?;

        Self::new(api_key, &config.base_url, Some(config.max_tokens))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn status_error(status: StatusCode, body: &str, model: &str) -> GatewayError {
    let message = error_message(body);
    match status {
        StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited(message),
        StatusCode::NOT_FOUND => GatewayError::ModelNotAvailable(format!("{}: {}", model, message)),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GatewayError::Timeout,
        _ => GatewayError::RequestFailed(format!("HTTP {}: {}", status.as_u16(), message)),
    }
}

#[async_trait]
impl LlmGateway for OpenAiLlmGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        let body = ChatCompletionRequest {
            model: request.model.as_str(),
            messages: request.messages.iter().map(WireMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: self.max_tokens,
        };
        debug!(
            "POST {} ({} tier, model {}, {} messages)",
            self.endpoint,
            request.tier,
            request.model,
            body.messages.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else if e.is_connect() {
                    GatewayError::ConnectionError(e.to_string())
                } else {
                    GatewayError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        if !status.is_success() {
            return Err(status_error(status, &text, request.model.as_str()));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| GatewayError::InvalidResponse(format!("{}: {}", e, text)))?;
        parsed
            .into_text()
            .ok_or_else(|| GatewayError::InvalidResponse("response has no message content".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyhc_domain::{Message, Model, ModelTier};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> CompletionRequest {
        CompletionRequest::new(
            ModelTier::Recovery,
            Model::Gpt4oMini,
            vec![Message::system("reformat"), Message::user("sunpy")],
        )
        .with_temperature(0.0)
    }

    #[tokio::test]
    async fn test_complete_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "temperature": 0.0,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "sunpy"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = OpenAiLlmGateway::new("test-key", &server.uri(), None).unwrap();
        let text = gateway.complete(&request()).await.unwrap();
        assert_eq!(text, "sunpy");
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"message": "Rate limit reached"}
            })))
            .mount(&server)
            .await;

        let gateway = OpenAiLlmGateway::new("k", &server.uri(), None).unwrap();
        let err = gateway.complete(&request()).await.unwrap_err();
        assert_eq!(err, GatewayError::RateLimited("Rate limit reached".into()));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_request_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let gateway = OpenAiLlmGateway::new("k", &server.uri(), None).unwrap();
        let err = gateway.complete(&request()).await.unwrap_err();
        assert_eq!(err, GatewayError::RequestFailed("HTTP 500: boom".into()));
    }

    #[tokio::test]
    async fn test_missing_content_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": []
            })))
            .mount(&server)
            .await;

        let gateway = OpenAiLlmGateway::new("k", &server.uri(), None).unwrap();
        let err = gateway.complete(&request()).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let gateway = OpenAiLlmGateway::new("k", "http://localhost:8080/", None).unwrap();
        assert_eq!(gateway.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_from_config_prefers_explicit_key() {
        let config = FileOpenAiConfig {
            api_key: Some("explicit".into()),
            api_key_env: "PYHC_CHAT_TEST_UNSET_KEY_VAR".into(),
            ..FileOpenAiConfig::default()
        };
        assert!(OpenAiLlmGateway::from_config(&config).is_ok());
    }

    #[test]
    fn test_from_config_without_key_fails() {
        let config = FileOpenAiConfig {
            api_key: None,
            api_key_env: "PYHC_CHAT_TEST_UNSET_KEY_VAR".into(),
            ..FileOpenAiConfig::default()
        };
        let err = OpenAiLlmGateway::from_config(&config).err().unwrap();
        assert!(err.to_string().contains("PYHC_CHAT_TEST_UNSET_KEY_VAR"));
    }
}
