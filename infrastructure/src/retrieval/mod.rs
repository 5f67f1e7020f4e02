//! Retrieval service adapter

mod http;

pub use http::HttpSourceRetriever;
