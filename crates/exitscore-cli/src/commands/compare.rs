//! The `exitscore compare` command.

use std::path::PathBuf;

use anyhow::Result;

use exitscore_core::report::AssessmentReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    fail_on_decline: bool,
    format: String,
) -> Result<()> {
    let baseline = AssessmentReport::load_json(&baseline_path)?;
    let current = AssessmentReport::load_json(&current_path)?;

    let report = current.compare(&baseline);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!(
                "Overall: {} -> {} ({:+} pts), {} -> {}",
                report.baseline_overall,
                report.current_overall,
                report.overall_delta,
                report.baseline_tier,
                report.current_tier
            );

            let declines: Vec<_> = report.declines().collect();
            let gains: Vec<_> = report.categories.iter().filter(|c| c.delta > 0).collect();

            if !declines.is_empty() {
                println!("\nDeclines:");
                for c in &declines {
                    println!(
                        "  {} {}% -> {}% ({:+})",
                        c.name, c.baseline_percent, c.current_percent, c.delta
                    );
                }
            }

            if !gains.is_empty() {
                println!("\nImprovements:");
                for c in &gains {
                    println!(
                        "  {} {}% -> {}% ({:+})",
                        c.name, c.baseline_percent, c.current_percent, c.delta
                    );
                }
            }

            let unchanged = report.categories.len() - declines.len() - gains.len();
            if unchanged > 0 {
                println!("\n{unchanged} categor{} unchanged", if unchanged == 1 { "y" } else { "ies" });
            }
            if !report.new_categories.is_empty() {
                println!("New categories: {}", report.new_categories.join(", "));
            }
            if !report.removed_categories.is_empty() {
                println!("Removed categories: {}", report.removed_categories.join(", "));
            }
        }
    }

    if fail_on_decline && report.has_declines() {
        std::process::exit(1);
    }

    Ok(())
}
