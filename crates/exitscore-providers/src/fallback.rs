//! Model fallback chain.
//!
//! Wraps a provider and walks a list of models: a retired or unknown model is
//! skipped, transient failures are retried on the same model with exponential
//! backoff, and an authentication failure stops the chain at once.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use exitscore_core::traits::{ModelInfo, NarrativeGenerator, NarrativeRequest, NarrativeResponse};

use crate::error::ProviderError;

/// Models tried after the preferred one, newest first.
pub const DEFAULT_FALLBACK_MODELS: &[&str] = &[
    "claude-sonnet-4-20250514",
    "claude-3-5-sonnet-20241022",
    "claude-3-5-haiku-20241022",
];

const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// A provider that falls back across models.
pub struct ModelFallback {
    inner: Arc<dyn NarrativeGenerator>,
    fallback_models: Vec<String>,
    max_retries: u32,
    retry_delay: Duration,
}

impl ModelFallback {
    pub fn new(inner: Arc<dyn NarrativeGenerator>) -> Self {
        Self {
            inner,
            fallback_models: DEFAULT_FALLBACK_MODELS.iter().map(|m| m.to_string()).collect(),
            max_retries: 2,
            retry_delay: Duration::from_millis(1000),
        }
    }

    pub fn with_fallback_models(mut self, models: Vec<String>) -> Self {
        self.fallback_models = models;
        self
    }

    /// Retries per model for transient failures, after the first attempt.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Initial backoff delay, doubled after each retry. Capped at 60 s.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay.min(MAX_RETRY_DELAY);
        self
    }

    /// The preferred model followed by every fallback not equal to it.
    pub fn sequence(&self, preferred: &str) -> Vec<String> {
        let mut models = vec![preferred.to_string()];
        for model in &self.fallback_models {
            if !models.contains(model) {
                models.push(model.clone());
            }
        }
        models
    }
}

/// What to do after a failed attempt.
enum Next {
    Retry(Option<Duration>),
    NextModel,
    Abort,
}

fn classify(err: &anyhow::Error) -> Next {
    match err.downcast_ref::<ProviderError>() {
        Some(ProviderError::ModelNotFound(_)) => Next::NextModel,
        Some(e) if e.is_permanent() => Next::Abort,
        Some(e) => Next::Retry(e.retry_after_ms().map(Duration::from_millis)),
        None => Next::Retry(None),
    }
}

#[async_trait]
impl NarrativeGenerator for ModelFallback {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate(&self, request: &NarrativeRequest) -> anyhow::Result<NarrativeResponse> {
        let mut tried = Vec::new();
        let mut last_error = String::new();

        for model in self.sequence(&request.model) {
            tried.push(model.clone());
            let attempt_request = NarrativeRequest {
                model: model.clone(),
                ..request.clone()
            };

            let mut retry_delay = self.retry_delay;
            for retry in 0..=self.max_retries {
                if retry > 0 {
                    tokio::time::sleep(retry_delay).await;
                    retry_delay = retry_delay.saturating_mul(2).min(MAX_RETRY_DELAY);
                }

                match self.inner.generate(&attempt_request).await {
                    Ok(response) => {
                        if model != request.model {
                            tracing::info!(
                                preferred = %request.model,
                                used = %model,
                                "narrative drafted with fallback model"
                            );
                        }
                        return Ok(response);
                    }
                    Err(e) => {
                        last_error = format!("{e:#}");
                        match classify(&e) {
                            Next::Abort => return Err(e),
                            Next::NextModel => {
                                tracing::warn!(model = %model, "model unavailable, trying next");
                                break;
                            }
                            Next::Retry(hint) => {
                                tracing::warn!(
                                    model = %model,
                                    attempt = retry + 1,
                                    "transient provider error: {last_error}"
                                );
                                if let Some(hint) = hint {
                                    retry_delay = hint.min(MAX_RETRY_DELAY);
                                }
                            }
                        }
                    }
                }
            }
        }

        Err(ProviderError::AllModelsFailed { tried, last_error }.into())
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        self.inner.available_models()
    }
}
