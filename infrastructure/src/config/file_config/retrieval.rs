//! Retrieval backend configuration from TOML (`[retrieval]` section)

use serde::{Deserialize, Serialize};

/// Where per-source semantic search lives.
///
/// ```toml
/// [retrieval]
/// base_url = "http://127.0.0.1:8700"
/// api_key_env = "PYHC_RETRIEVAL_KEY"   # optional bearer token
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetrievalConfig {
    pub base_url: String,
    /// Environment variable holding a bearer token, if the backend needs one
    pub api_key_env: Option<String>,
}

impl Default for FileRetrievalConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8700".to_string(),
            api_key_env: None,
        }
    }
}

impl FileRetrievalConfig {
    /// Bearer token from the configured env var (unset or blank means none).
    pub fn api_key(&self) -> Option<String> {
        self.api_key_env
            .as_ref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.trim().is_empty())
    }
}
