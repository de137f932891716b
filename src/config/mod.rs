//! Configuration model for stagetime.
//!
//! This module defines the Config struct that represents `stagetime.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! defaults for every field, an environment override for the deployment
//! namespace, and validation of config values.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Config;
pub use types::NAMESPACE_ENV;
