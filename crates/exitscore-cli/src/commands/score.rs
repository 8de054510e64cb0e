//! The `exitscore score` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use exitscore_core::engine::score_overall;
use exitscore_core::model::ResponseSet;
use exitscore_core::parser::resolve_schema;
use exitscore_core::readiness::{ReadinessTier, Standing};
use exitscore_core::submission::Submission;

pub fn execute(responses_path: PathBuf, schema_path: Option<PathBuf>, format: String) -> Result<()> {
    let content = std::fs::read_to_string(&responses_path)
        .with_context(|| format!("failed to read responses: {}", responses_path.display()))?;
    let responses = parse_responses(&content)
        .with_context(|| format!("invalid responses file: {}", responses_path.display()))?;

    let (schema, source) = resolve_schema(schema_path.as_deref())?;
    tracing::debug!(schema = %source, answers = responses.len(), "scoring responses");

    let card = score_overall(&schema, &responses)?;
    let tier = ReadinessTier::from_score(card.overall);

    match format.as_str() {
        "json" => {
            let categories: Vec<_> = card
                .categories
                .iter()
                .zip(schema.categories())
                .map(|(score, def)| {
                    serde_json::json!({
                        "name": score.name,
                        "weight": def.weight,
                        "score": score.score,
                        "percent": score.percent(),
                        "standing": Standing::from_percent(score.percent()),
                        "answered": score.answered,
                        "total": score.total,
                    })
                })
                .collect();
            let output = serde_json::json!({
                "overall": card.overall,
                "tier": tier,
                "weighted_fraction": card.weighted_fraction,
                "categories": categories,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            let mut table = Table::new();
            table.set_header(vec!["Category", "Weight", "Score", "Answered", "Standing"]);

            for (score, def) in card.categories.iter().zip(schema.categories()) {
                table.add_row(vec![
                    Cell::new(&score.name),
                    Cell::new(format!("{:.0}%", def.weight * 100.0)),
                    Cell::new(format!("{}%", score.percent())),
                    Cell::new(format!("{}/{}", score.answered, score.total)),
                    Cell::new(Standing::from_percent(score.percent())),
                ]);
            }

            println!("{table}");
            println!("\nOverall: {} ({})", card.overall, tier);
        }
    }

    Ok(())
}

/// Accept either a bare array of answers or a full submission object.
fn parse_responses(content: &str) -> Result<ResponseSet> {
    let value: serde_json::Value = serde_json::from_str(content).context("failed to parse JSON")?;
    match value {
        serde_json::Value::Array(_) => Ok(serde_json::from_value(value)?),
        serde_json::Value::Object(_) => {
            let submission: Submission = serde_json::from_value(value)?;
            Ok(submission.responses)
        }
        _ => anyhow::bail!("expected an array of answers or a submission object"),
    }
}
