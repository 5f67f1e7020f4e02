//! Progress display for running exchanges

pub mod reporter;
