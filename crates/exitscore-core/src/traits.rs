//! Narrative generator trait.
//!
//! Implemented by the `exitscore-providers` crate. The assessment pipeline only
//! depends on this trait, so any LLM backend (or a mock) can draft the
//! advisory report.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Trait for LLM backends that draft the written advisory report.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// Human-readable provider name (e.g. "anthropic").
    fn name(&self) -> &str;

    /// Draft a narrative from a prompt.
    async fn generate(&self, request: &NarrativeRequest) -> anyhow::Result<NarrativeResponse>;

    /// List available models for this provider.
    fn available_models(&self) -> Vec<ModelInfo>;
}

/// Request to draft a narrative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeRequest {
    /// Model identifier (e.g. "claude-sonnet-4-20250514").
    pub model: String,
    /// The main prompt.
    pub prompt: String,
    /// Optional system prompt override.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

/// A drafted narrative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeResponse {
    /// The generated text.
    pub content: String,
    /// Model that actually generated the response.
    pub model: String,
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token accounting for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    pub estimated_cost_usd: f64,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
    /// Cost per 1K input tokens in USD.
    pub cost_per_1k_input: f64,
    /// Cost per 1K output tokens in USD.
    pub cost_per_1k_output: f64,
}

/// Default system prompt for narrative generation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an experienced M&A advisor who prepares business owners for the sale of their company. Write clear, specific and encouraging advice grounded only in the assessment data you are given. Do not invent financial figures.";
