//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of every exchange (disabled when unset)
    pub conversation_log: Option<PathBuf>,
    /// Directory for daily-rolling diagnostic logs (stderr only when unset)
    pub dir: Option<PathBuf>,
}
