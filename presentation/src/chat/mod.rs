//! Interactive chat module
//!
//! Provides a reedline-based interactive chat interface and the shared
//! exchange runner used by single-shot mode.

mod exchange;
mod repl;

pub use exchange::{progress_for, run_exchange};
pub use repl::{ChatRepl, ReplCommand};
