//! Prompt domain
//!
//! Templates for the selector, decomposer, synthesizer and the
//! reformatting calls of the recovery pipeline.

mod template;

pub use template::PromptTemplate;
