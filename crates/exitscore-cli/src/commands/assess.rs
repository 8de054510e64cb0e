//! The `exitscore assess` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use exitscore_core::parser::resolve_schema;
use exitscore_core::pipeline::AssessmentPipeline;
use exitscore_core::report::AssessmentReport;
use exitscore_core::submission::Submission;
use exitscore_providers::{create_narrator, load_config_from};
use exitscore_report::write_html_report;

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    submission_path: PathBuf,
    schema_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
    format: String,
    provider: Option<String>,
    no_narrative: bool,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let schema_path = schema_path.or_else(|| config.schema_path.clone());
    let (schema, source) = resolve_schema(schema_path.as_deref())?;
    tracing::info!(schema = %source, categories = schema.len(), "loaded assessment schema");

    let content = std::fs::read_to_string(&submission_path)
        .with_context(|| format!("failed to read submission: {}", submission_path.display()))?;
    let submission: Submission = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse submission: {}", submission_path.display()))?;

    let mut pipeline = AssessmentPipeline::new(schema, config.pipeline_config());

    if !no_narrative {
        match create_narrator(&config, provider.as_deref()) {
            Ok(narrator) => pipeline = pipeline.with_narrator(narrator),
            Err(e) => tracing::warn!("advisory report disabled: {e:#}"),
        }
    }

    let report = pipeline
        .process(submission)
        .await
        .context("submission rejected")?;

    print_summary(&report);

    let output = output.unwrap_or_else(|| config.output_dir.clone());
    std::fs::create_dir_all(&output)
        .with_context(|| format!("failed to create output directory: {}", output.display()))?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html", "markdown"]
    } else {
        format.split(',').map(str::trim).collect()
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("assessment-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("assessment-{timestamp}.html"));
                write_html_report(&report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            "markdown" | "md" => {
                let path = output.join(format!("assessment-{timestamp}.md"));
                std::fs::write(&path, report.to_markdown())
                    .with_context(|| format!("failed to write {}", path.display()))?;
                eprintln!("Markdown report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}

fn print_summary(report: &AssessmentReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Category", "Weight", "Score", "Answered", "Standing"]);

    for category in &report.categories {
        table.add_row(vec![
            Cell::new(&category.name),
            Cell::new(format!("{:.0}%", category.weight * 100.0)),
            Cell::new(format!("{}%", category.percent)),
            Cell::new(format!("{}/{}", category.answered, category.total)),
            Cell::new(category.standing),
        ]);
    }

    println!("\nExit Score: {}", report.business.company);
    println!("{table}");
    println!("\nOverall: {} ({})", report.overall, report.tier);
    println!("{}", report.tier.guidance());

    match &report.narrative_model {
        Some(model) => println!("\nAdvisory report drafted by {model}"),
        None => println!("\nNo advisory report drafted"),
    }
}
