//! Structured output recovery, deterministic tier.
//!
//! - [`parsing`]: pure text parsers for the two target shapes
//! - [`attempt`]: per-call attempt bookkeeping used to bound escalation
//!
//! The model-assisted tier lives in the application layer because it needs
//! a language-model gateway.

pub mod attempt;
pub mod parsing;
