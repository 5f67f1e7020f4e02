//! Configuration file loading for pyhc-chat
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PYHC_CHAT_*` environment variables (`__` separates nesting)
//! 2. `--config <path>` specified file
//! 3. Project root: `./pyhc-chat.toml` or `./.pyhc-chat.toml`
//! 4. Global: `$XDG_CONFIG_HOME/pyhc-chat/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileExecutionConfig, FileLoggingConfig, FileModelsConfig, FileOpenAiConfig,
    FileOutputConfig, FileProvidersConfig, FileReplConfig, FileRetrievalConfig, FileSourceConfig,
};
pub use loader::ConfigLoader;
