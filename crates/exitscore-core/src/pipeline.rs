//! Assessment pipeline: intake, scoring, report assembly and narrative.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::engine::{score_overall, OverallScore};
use crate::error::PipelineError;
use crate::model::{AssessmentSchema, SharedSchema};
use crate::prompt::build_narrative_prompt;
use crate::report::AssessmentReport;
use crate::submission::{IntakePolicy, Submission};
use crate::traits::{NarrativeGenerator, NarrativeRequest, DEFAULT_SYSTEM_PROMPT};

/// Default model for the advisory narrative.
pub const DEFAULT_NARRATIVE_MODEL: &str = "claude-sonnet-4-20250514";

/// Configuration for an assessment pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Model requested for the narrative.
    pub model: String,
    /// Maximum tokens for the narrative.
    pub max_tokens: u32,
    /// Sampling temperature for the narrative.
    pub temperature: f64,
    /// Optional system prompt override.
    pub system_prompt: Option<String>,
    /// Intake rules.
    pub policy: IntakePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_NARRATIVE_MODEL.to_string(),
            max_tokens: 4000,
            temperature: 0.7,
            system_prompt: None,
            policy: IntakePolicy::default(),
        }
    }
}

/// Processes quiz submissions into assessment reports.
pub struct AssessmentPipeline {
    schema: Arc<SharedSchema>,
    narrator: Option<Arc<dyn NarrativeGenerator>>,
    config: PipelineConfig,
}

impl AssessmentPipeline {
    pub fn new(schema: AssessmentSchema, config: PipelineConfig) -> Self {
        Self::with_shared_schema(Arc::new(SharedSchema::new(schema)), config)
    }

    /// Build a pipeline around a schema handle that may be swapped at runtime.
    pub fn with_shared_schema(schema: Arc<SharedSchema>, config: PipelineConfig) -> Self {
        Self {
            schema,
            narrator: None,
            config,
        }
    }

    /// Draft narratives with `narrator`.
    pub fn with_narrator(mut self, narrator: Arc<dyn NarrativeGenerator>) -> Self {
        self.narrator = Some(narrator);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The schema new submissions will be scored against.
    pub fn schema(&self) -> Arc<AssessmentSchema> {
        self.schema.current()
    }

    /// Install a new schema. Submissions already in flight keep the old one.
    pub fn reload_schema(&self, schema: AssessmentSchema) {
        self.schema.replace(schema);
        tracing::info!("assessment schema reloaded");
    }

    /// Validate, sanitize and score a submission, then draft its narrative.
    ///
    /// A narrative failure is logged and the report is returned without one.
    pub async fn process(&self, mut submission: Submission) -> Result<AssessmentReport, PipelineError> {
        submission.validate(&self.config.policy)?;
        submission.sanitize();

        let schema = self.schema.current();
        let card = score_overall(&schema, &submission.responses)?;

        if let Some(client_score) = submission.score {
            let client = OverallScore::from_fraction(client_score / 100.0);
            if client != card.overall {
                tracing::warn!(
                    client = %client,
                    server = %card.overall,
                    "client-reported score differs from recomputed score"
                );
            }
        }

        tracing::info!(
            overall = card.overall.value(),
            answers = submission.responses.len(),
            "scored submission"
        );

        let report = AssessmentReport::build(
            &schema,
            &card,
            &submission.responses,
            submission.business_summary(),
        );

        Ok(self.narrate(report).await)
    }

    /// Attach a narrative to `report` if a narrator is configured.
    pub async fn narrate(&self, report: AssessmentReport) -> AssessmentReport {
        let Some(narrator) = &self.narrator else {
            return report;
        };

        let request = NarrativeRequest {
            model: self.config.model.clone(),
            prompt: build_narrative_prompt(&report),
            system_prompt: Some(
                self.config
                    .system_prompt
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            ),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let start = Instant::now();
        match narrator.generate(&request).await {
            Ok(response) => {
                tracing::info!(
                    model = %response.model,
                    latency_ms = start.elapsed().as_millis() as u64,
                    tokens = response.token_usage.total_tokens,
                    "narrative drafted"
                );
                report.with_narrative(response.content, response.model)
            }
            Err(e) => {
                tracing::error!("narrative generation failed via {}: {e:#}", narrator.name());
                report
            }
        }
    }
}
