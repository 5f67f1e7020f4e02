//! Application-level configuration.
//!
//! - [`ExecutionParams`]: timeouts, retrieval concurrency, recovery bound, temperatures

pub mod execution_params;

pub use execution_params::{ExecutionParams, MAX_RECOVERY_ATTEMPTS, RECOVERY_TEMPERATURE};
