//! Use cases for the application layer

pub mod decompose_query;
pub mod recover_output;
pub mod run_chat;
pub mod select_sources;
pub(crate) mod shared;
pub mod synthesize_answer;

#[cfg(test)]
pub(crate) mod test_support;
