//! Assessment report types with JSON persistence and progress tracking.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::{OverallScore, ScoreCard};
use crate::model::{AnswerValue, AssessmentSchema, ResponseSet};
use crate::readiness::{ReadinessTier, Standing};

/// A complete sale-readiness assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// The business that was assessed.
    pub business: BusinessSummary,
    /// Rounded overall percentage.
    pub overall: OverallScore,
    /// Readiness band for `overall`.
    pub tier: ReadinessTier,
    /// Per-category breakdown, in schema order.
    pub categories: Vec<CategoryReport>,
    /// Written advisory report, when one was drafted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    /// Model that drafted `narrative`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_model: Option<String>,
}

/// Business details carried into reports. Contact details are never included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessSummary {
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees: Option<String>,
}

/// One category of an assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub name: String,
    pub weight: f64,
    /// Earned fraction of the category's weight, in [0, 1].
    pub score: f64,
    /// `score` as a whole percentage.
    pub percent: u32,
    pub standing: Standing,
    pub answered: usize,
    pub total: usize,
    pub questions: Vec<QuestionOutcome>,
}

/// How one question was answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOutcome {
    /// Zero-based index within the category.
    pub index: usize,
    pub text: String,
    pub weight: f64,
    /// `None` when the question was left unanswered.
    pub answer: Option<AnswerValue>,
}

impl AssessmentReport {
    /// Assemble a report from a scored response set.
    ///
    /// `card` must have been produced by scoring `responses` against `schema`.
    pub fn build(
        schema: &AssessmentSchema,
        card: &ScoreCard,
        responses: &ResponseSet,
        business: BusinessSummary,
    ) -> Self {
        let categories = schema
            .categories()
            .iter()
            .zip(&card.categories)
            .enumerate()
            .map(|(ci, (definition, scored))| {
                let questions = definition
                    .questions
                    .iter()
                    .enumerate()
                    .map(|(qi, q)| QuestionOutcome {
                        index: qi,
                        text: q.display_text(qi),
                        weight: q.weight,
                        answer: responses.lookup(ci, qi).map(|a| a.answer),
                    })
                    .collect();

                let percent = scored.percent();
                CategoryReport {
                    name: definition.name.clone(),
                    weight: definition.weight,
                    score: scored.score,
                    percent,
                    standing: Standing::from_percent(percent),
                    answered: scored.answered,
                    total: scored.total,
                    questions,
                }
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            business,
            overall: card.overall,
            tier: ReadinessTier::from_score(card.overall),
            categories,
            narrative: None,
            narrative_model: None,
        }
    }

    /// Attach a drafted narrative.
    pub fn with_narrative(mut self, narrative: impl Into<String>, model: impl Into<String>) -> Self {
        self.narrative = Some(narrative.into());
        self.narrative_model = Some(model.into());
        self
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AssessmentReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("# Exit Score: {}\n\n", self.business.company));
        md.push_str(&format!(
            "**Overall:** {} ({})\n\n{}\n\n",
            self.overall,
            self.tier,
            self.tier.guidance()
        ));

        md.push_str("| Category | Weight | Score | Answered | Standing |\n");
        md.push_str("|----------|--------|-------|----------|----------|\n");
        for c in &self.categories {
            md.push_str(&format!(
                "| {} | {:.0}% | {}% | {}/{} | {} |\n",
                table_cell(&c.name),
                c.weight * 100.0,
                c.percent,
                c.answered,
                c.total,
                c.standing
            ));
        }
        md.push('\n');

        for c in &self.categories {
            md.push_str(&format!("## {}\n\n", c.name));
            for q in &c.questions {
                let answer = q.answer.map(AnswerValue::label).unwrap_or("—");
                md.push_str(&format!("- {}: {}\n", q.text, answer));
            }
            md.push('\n');
        }

        if let Some(narrative) = &self.narrative {
            md.push_str("## Advisory Report\n\n");
            md.push_str(narrative.trim());
            md.push('\n');
        }

        md
    }

    /// Compare this assessment against an earlier one of the same business.
    ///
    /// Categories are matched by name.
    pub fn compare(&self, baseline: &AssessmentReport) -> ProgressReport {
        let mut categories = Vec::new();
        let mut new_categories = Vec::new();

        for current in &self.categories {
            match baseline.categories.iter().find(|b| b.name == current.name) {
                Some(before) => categories.push(CategoryDelta {
                    name: current.name.clone(),
                    baseline_percent: before.percent,
                    current_percent: current.percent,
                    delta: i64::from(current.percent) - i64::from(before.percent),
                }),
                None => new_categories.push(current.name.clone()),
            }
        }

        let removed_categories = baseline
            .categories
            .iter()
            .filter(|b| !self.categories.iter().any(|c| c.name == b.name))
            .map(|b| b.name.clone())
            .collect();

        ProgressReport {
            baseline_overall: baseline.overall,
            current_overall: self.overall,
            overall_delta: i64::from(self.overall.value()) - i64::from(baseline.overall.value()),
            baseline_tier: baseline.tier,
            current_tier: self.tier,
            categories,
            new_categories,
            removed_categories,
        }
    }
}

/// Change between two assessments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    pub baseline_overall: OverallScore,
    pub current_overall: OverallScore,
    /// Percentage points gained (negative when the score dropped).
    pub overall_delta: i64,
    pub baseline_tier: ReadinessTier,
    pub current_tier: ReadinessTier,
    /// Categories present in both assessments.
    pub categories: Vec<CategoryDelta>,
    /// Categories only in the current assessment.
    pub new_categories: Vec<String>,
    /// Categories only in the baseline.
    pub removed_categories: Vec<String>,
}

/// Change in one category's percentage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDelta {
    pub name: String,
    pub baseline_percent: u32,
    pub current_percent: u32,
    pub delta: i64,
}

/// Escape text for a markdown table cell.
fn table_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn signed(delta: i64) -> String {
    if delta > 0 {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}

impl ProgressReport {
    /// Format the progress report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Overall:** {} → {} ({} pts), {} → {}\n\n",
            self.baseline_overall,
            self.current_overall,
            signed(self.overall_delta),
            self.baseline_tier,
            self.current_tier
        ));

        if !self.categories.is_empty() {
            md.push_str("| Category | Baseline | Current | Delta |\n");
            md.push_str("|----------|----------|---------|-------|\n");
            for c in &self.categories {
                md.push_str(&format!(
                    "| {} | {}% | {}% | {} |\n",
                    table_cell(&c.name),
                    c.baseline_percent,
                    c.current_percent,
                    signed(c.delta)
                ));
            }
            md.push('\n');
        }

        if !self.new_categories.is_empty() {
            md.push_str(&format!("New categories: {}\n", self.new_categories.join(", ")));
        }
        if !self.removed_categories.is_empty() {
            md.push_str(&format!(
                "Removed categories: {}\n",
                self.removed_categories.join(", ")
            ));
        }

        md
    }

    /// Categories whose percentage went down.
    pub fn declines(&self) -> impl Iterator<Item = &CategoryDelta> {
        self.categories.iter().filter(|c| c.delta < 0)
    }

    /// Returns true if the overall score or any category went down.
    pub fn has_declines(&self) -> bool {
        self.overall_delta < 0 || self.declines().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::score_overall;
    use crate::model::{Answer, CategoryDefinition, QuestionDefinition};

    fn schema() -> AssessmentSchema {
        AssessmentSchema::new(vec![
            CategoryDefinition::new(
                "Company Growth",
                0.6,
                vec![
                    QuestionDefinition::new(0.5, "Has revenue grown?"),
                    QuestionDefinition::new(0.5, ""),
                ],
            ),
            CategoryDefinition::new(
                "Market Demand",
                0.4,
                vec![QuestionDefinition::new(1.0, "Is demand steady?")],
            ),
        ])
        .unwrap()
    }

    fn make_report(answers: Vec<Answer>) -> AssessmentReport {
        let schema = schema();
        let responses = ResponseSet::new(answers);
        let card = score_overall(&schema, &responses).unwrap();
        AssessmentReport::build(
            &schema,
            &card,
            &responses,
            BusinessSummary {
                company: "Acme".into(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn build_populates_breakdown() {
        let report = make_report(vec![
            Answer::new(0, 0, AnswerValue::Yes),
            Answer::new(1, 0, AnswerValue::Unknown),
        ]);

        // 0.6 × 0.5 + 0.4 × 0.15 = 0.36
        assert_eq!(report.overall.value(), 36);
        assert_eq!(report.tier, ReadinessTier::Critical);
        assert_eq!(report.categories.len(), 2);

        let growth = &report.categories[0];
        assert_eq!(growth.percent, 50);
        assert_eq!(growth.standing, Standing::Moderate);
        assert_eq!(growth.answered, 1);
        assert_eq!(growth.questions[0].answer, Some(AnswerValue::Yes));
        assert_eq!(growth.questions[1].answer, None);
        assert_eq!(growth.questions[1].text, "Question 2");

        assert_eq!(report.categories[1].percent, 15);
        assert_eq!(report.categories[1].standing, Standing::NeedsAttention);
    }

    #[test]
    fn json_roundtrip() {
        let report = make_report(vec![Answer::new(0, 0, AnswerValue::Yes)])
            .with_narrative("Strong growth story.", "claude-sonnet-4-20250514");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = AssessmentReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.overall, report.overall);
        assert_eq!(loaded.narrative_model.as_deref(), Some("claude-sonnet-4-20250514"));
    }

    #[test]
    fn load_json_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(AssessmentReport::load_json(&path).is_err());
    }

    #[test]
    fn markdown_output() {
        let report = make_report(vec![Answer::new(1, 0, AnswerValue::No)]);
        let md = report.to_markdown();
        assert!(md.contains("# Exit Score: Acme"));
        assert!(md.contains("| Company Growth | 60% | 0% | 0/2 | Needs Attention |"));
        assert!(md.contains("- Is demand steady?: No"));
        assert!(md.contains("- Has revenue grown?: —"));
        assert!(!md.contains("Advisory Report"));
    }

    #[test]
    fn compare_tracks_progress() {
        let baseline = make_report(vec![Answer::new(0, 0, AnswerValue::Yes)]);
        let current = make_report(vec![
            Answer::new(0, 0, AnswerValue::Yes),
            Answer::new(0, 1, AnswerValue::Yes),
            Answer::new(1, 0, AnswerValue::Yes),
        ]);

        let progress = current.compare(&baseline);
        assert_eq!(progress.overall_delta, 70);
        assert_eq!(progress.categories[0].delta, 50);
        assert_eq!(progress.categories[1].delta, 100);
        assert!(!progress.has_declines());
        assert_eq!(progress.current_tier, ReadinessTier::Premium);
    }

    #[test]
    fn compare_detects_declines_and_renamed_categories() {
        let baseline = make_report(vec![Answer::new(1, 0, AnswerValue::Yes)]);
        let mut current = make_report(vec![]);
        current.categories[0].name = "Revenue Growth".into();

        let progress = current.compare(&baseline);
        assert!(progress.has_declines());
        assert_eq!(progress.declines().count(), 1);
        assert_eq!(progress.new_categories, vec!["Revenue Growth"]);
        assert_eq!(progress.removed_categories, vec!["Company Growth"]);

        let md = progress.to_markdown();
        assert!(md.contains("-40 pts"));
        assert!(md.contains("| Market Demand | 100% | 0% | -100 |"));
    }

    #[test]
    fn markdown_escapes_pipes_in_category_names() {
        let schema = AssessmentSchema::new(vec![CategoryDefinition::new(
            "Sales | Marketing",
            1.0,
            vec![QuestionDefinition::new(1.0, "Is there a sales pipeline?")],
        )])
        .unwrap();
        let responses = ResponseSet::new(vec![Answer::new(0, 0, AnswerValue::Yes)]);
        let card = score_overall(&schema, &responses).unwrap();
        let report = AssessmentReport::build(&schema, &card, &responses, BusinessSummary::default());

        let md = report.to_markdown();
        assert!(md.contains("| Sales \\| Marketing | 100% | 100% | 1/1 | Strong |"), "{md}");

        let progress = report.compare(&report).to_markdown();
        assert!(progress.contains("| Sales \\| Marketing | 100% | 100% | 0 |"), "{progress}");
    }
}
