//! Mock provider for testing.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use exitscore_core::traits::{
    ModelInfo, NarrativeGenerator, NarrativeRequest, NarrativeResponse, TokenUsage,
};

use crate::error::ProviderError;

/// A mock narrative provider for exercising the pipeline without API calls.
///
/// Returns a fixed narrative, reports selected models as missing, and can be
/// scripted to fail a number of times before succeeding.
pub struct MockProvider {
    response: String,
    missing_models: HashSet<String>,
    scripted_failures: Mutex<VecDeque<ProviderError>>,
    call_count: AtomicU32,
    models_requested: Mutex<Vec<String>>,
    last_request: Mutex<Option<NarrativeRequest>>,
}

impl MockProvider {
    /// Create a mock that always returns `response`.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            response: response.to_string(),
            missing_models: HashSet::new(),
            scripted_failures: Mutex::new(VecDeque::new()),
            call_count: AtomicU32::new(0),
            models_requested: Mutex::new(Vec::new()),
            last_request: Mutex::new(None),
        }
    }

    /// Answer requests for these models with `ModelNotFound`.
    pub fn with_missing_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing_models = models.into_iter().map(Into::into).collect();
        self
    }

    /// Fail the next calls with `errors`, in order, before succeeding.
    pub fn with_failures(self, errors: Vec<ProviderError>) -> Self {
        *lock(&self.scripted_failures) = errors.into();
        self
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Models requested so far, in call order.
    pub fn models_requested(&self) -> Vec<String> {
        lock(&self.models_requested).clone()
    }

    /// Get the last request made to this provider.
    pub fn last_request(&self) -> Option<NarrativeRequest> {
        lock(&self.last_request).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl NarrativeGenerator for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &NarrativeRequest) -> anyhow::Result<NarrativeResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        lock(&self.models_requested).push(request.model.clone());
        *lock(&self.last_request) = Some(request.clone());

        if self.missing_models.contains(&request.model) {
            return Err(ProviderError::ModelNotFound(request.model.clone()).into());
        }
        if let Some(err) = lock(&self.scripted_failures).pop_front() {
            return Err(err.into());
        }

        let prompt_tokens = (request.prompt.len() / 4) as u32;
        let completion_tokens = (self.response.len() / 4) as u32; // Rough estimate

        Ok(NarrativeResponse {
            content: self.response.clone(),
            model: request.model.clone(),
            token_usage: TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
                estimated_cost_usd: 0.0,
            },
            latency_ms: 1,
        })
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![ModelInfo {
            id: "mock-model".into(),
            name: "Mock Model".into(),
            provider: "mock".into(),
            max_context: 100_000,
            cost_per_1k_input: 0.0,
            cost_per_1k_output: 0.0,
        }]
    }
}
