//! Configuration loading and provider factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use exitscore_core::pipeline::{PipelineConfig, DEFAULT_NARRATIVE_MODEL};
use exitscore_core::submission::IntakePolicy;
use exitscore_core::traits::NarrativeGenerator;

use crate::anthropic::AnthropicProvider;
use crate::fallback::{ModelFallback, DEFAULT_FALLBACK_MODELS};
use crate::mock::MockProvider;

/// Configuration for a single narrative provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Anthropic {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    /// Offline provider that always returns `response`.
    Mock {
        #[serde(default = "default_mock_response")]
        response: String,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Anthropic {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Anthropic")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Mock { response } => f
                .debug_struct("Mock")
                .field("response", response)
                .finish(),
        }
    }
}

fn default_mock_response() -> String {
    "This is a placeholder advisory report.".to_string()
}

/// Top-level exitscore configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitScoreConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider used for narratives.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Model tried first.
    #[serde(default = "default_model")]
    pub preferred_model: String,
    /// Models tried, in order, when the preferred one is unavailable.
    #[serde(default = "default_fallback_models")]
    pub fallback_models: Vec<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Retries per model on transient provider errors.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Initial delay between retries in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Submissions completed faster than this are rejected.
    #[serde(default = "default_min_time_spent")]
    pub min_time_spent_secs: u64,
    /// Question schema; `questions.json` or the built-in schema when unset.
    #[serde(default)]
    pub schema_path: Option<PathBuf>,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_provider() -> String {
    "anthropic".to_string()
}
fn default_model() -> String {
    DEFAULT_NARRATIVE_MODEL.to_string()
}
fn default_fallback_models() -> Vec<String> {
    DEFAULT_FALLBACK_MODELS.iter().map(|m| m.to_string()).collect()
}
fn default_max_tokens() -> u32 {
    4000
}
fn default_temperature() -> f64 {
    0.7
}
fn default_retries() -> u32 {
    2
}
fn default_retry_delay() -> u64 {
    1000
}
fn default_min_time_spent() -> u64 {
    IntakePolicy::default().min_time_spent_secs
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./exitscore-reports")
}

impl Default for ExitScoreConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            preferred_model: default_model(),
            fallback_models: default_fallback_models(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            min_time_spent_secs: default_min_time_spent(),
            schema_path: None,
            output_dir: default_output_dir(),
        }
    }
}

impl ExitScoreConfig {
    /// Pipeline settings derived from this configuration.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            model: self.preferred_model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system_prompt: None,
            policy: IntakePolicy {
                min_time_spent_secs: self.min_time_spent_secs,
            },
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Anthropic { api_key, base_url } => ProviderConfig::Anthropic {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::Mock { response } => ProviderConfig::Mock {
            response: response.clone(),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `exitscore.toml` in the current directory
/// 2. `~/.config/exitscore/config.toml`
///
/// Environment variable overrides: `EXITSCORE_ANTHROPIC_KEY` (or
/// `CLAUDE_API_KEY`) and `AI_MODEL`.
pub fn load_config() -> Result<ExitScoreConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ExitScoreConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("exitscore.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ExitScoreConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ExitScoreConfig::default(),
    };

    // Apply env var overrides
    let key = std::env::var("EXITSCORE_ANTHROPIC_KEY").or_else(|_| std::env::var("CLAUDE_API_KEY"));
    if let Ok(key) = key {
        config
            .providers
            .entry("anthropic".into())
            .or_insert(ProviderConfig::Anthropic {
                api_key: String::new(),
                base_url: None,
            });
        if let Some(ProviderConfig::Anthropic { api_key, .. }) =
            config.providers.get_mut("anthropic")
        {
            *api_key = key;
        }
    }

    if let Ok(model) = std::env::var("AI_MODEL") {
        if !model.trim().is_empty() {
            config.preferred_model = model.trim().to_string();
        }
    }

    // Resolve env vars in all provider configs
    let resolved: HashMap<String, ProviderConfig> = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();
    config.providers = resolved;

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("exitscore"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(name: &str, config: &ProviderConfig) -> Result<Arc<dyn NarrativeGenerator>> {
    match config {
        ProviderConfig::Anthropic { api_key, base_url } => {
            if api_key.trim().is_empty() {
                anyhow::bail!(
                    "provider '{name}' has no API key (set EXITSCORE_ANTHROPIC_KEY or CLAUDE_API_KEY)"
                );
            }
            Ok(Arc::new(AnthropicProvider::new(api_key, base_url.clone())?))
        }
        ProviderConfig::Mock { response } => Ok(Arc::new(MockProvider::with_fixed_response(response))),
    }
}

/// Build the narrative generator for `provider` (or the default provider),
/// wrapped in the configured model fallback chain.
pub fn create_narrator(
    config: &ExitScoreConfig,
    provider: Option<&str>,
) -> Result<Arc<dyn NarrativeGenerator>> {
    let name = provider.unwrap_or(&config.default_provider);
    let provider_config = config
        .providers
        .get(name)
        .with_context(|| format!("provider '{name}' is not configured"))?;

    let inner = create_provider(name, provider_config)?;
    let chain = ModelFallback::new(inner)
        .with_fallback_models(config.fallback_models.clone())
        .with_max_retries(config.max_retries)
        .with_retry_delay(Duration::from_millis(config.retry_delay_ms));

    Ok(Arc::new(chain))
}
