//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: chat-completion models
//! - [`query::Query`]: a validated user query
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
pub mod query;
pub mod string;
