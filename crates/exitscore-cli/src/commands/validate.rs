//! The `exitscore validate` command.

use std::path::PathBuf;

use anyhow::Result;

use exitscore_core::parser::{resolve_schema, validate_schema};

pub fn execute(schema_path: Option<PathBuf>) -> Result<()> {
    let (schema, source) = resolve_schema(schema_path.as_deref())?;

    println!(
        "Schema: {source} ({} categories, {} questions)",
        schema.len(),
        schema.question_count()
    );

    let warnings = validate_schema(&schema);
    for w in &warnings {
        let prefix = w
            .category
            .as_ref()
            .map(|name| format!("  [{name}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Schema valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
