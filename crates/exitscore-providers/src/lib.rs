//! exitscore-providers — LLM narrative providers.
//!
//! Implements the `NarrativeGenerator` trait for the Anthropic Messages API,
//! wraps any generator in a model fallback chain, and loads provider
//! configuration.

pub mod anthropic;
pub mod config;
pub mod error;
pub mod fallback;
pub mod mock;

pub use config::{
    create_narrator, create_provider, load_config, load_config_from, ExitScoreConfig,
    ProviderConfig,
};
pub use error::ProviderError;
pub use fallback::ModelFallback;
