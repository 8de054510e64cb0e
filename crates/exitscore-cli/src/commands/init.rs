//! The `exitscore init` command.

use std::path::Path;

use anyhow::Result;

use exitscore_core::parser::{default_schema, DEFAULT_SCHEMA_FILE};

pub fn execute() -> Result<()> {
    if Path::new("exitscore.toml").exists() {
        println!("exitscore.toml already exists, skipping.");
    } else {
        std::fs::write("exitscore.toml", SAMPLE_CONFIG)?;
        println!("Created exitscore.toml");
    }

    let schema_path = Path::new(DEFAULT_SCHEMA_FILE);
    if schema_path.exists() {
        println!("{DEFAULT_SCHEMA_FILE} already exists, skipping.");
    } else {
        let json = serde_json::to_string_pretty(&default_schema())?;
        std::fs::write(schema_path, json)?;
        println!("Created {DEFAULT_SCHEMA_FILE}");
    }

    std::fs::create_dir_all("submissions")?;
    let example_path = Path::new("submissions/example.json");
    if example_path.exists() {
        println!("submissions/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_SUBMISSION)?;
        println!("Created submissions/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Set EXITSCORE_ANTHROPIC_KEY, or switch default_provider to \"offline\"");
    println!("  2. Run: exitscore validate");
    println!("  3. Run: exitscore assess --submission submissions/example.json --format all");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# exitscore configuration

default_provider = "anthropic"
preferred_model = "claude-sonnet-4-20250514"
fallback_models = [
    "claude-sonnet-4-20250514",
    "claude-3-5-sonnet-20241022",
    "claude-3-5-haiku-20241022",
]
max_tokens = 4000
temperature = 0.7
max_retries = 2
retry_delay_ms = 1000
min_time_spent_secs = 30
output_dir = "./exitscore-reports"

[providers.anthropic]
type = "anthropic"
api_key = "${EXITSCORE_ANTHROPIC_KEY}"

[providers.offline]
type = "mock"
response = "Advisory report drafting is disabled for this workspace."
"#;

const EXAMPLE_SUBMISSION: &str = r#"{
  "name": "Jordan Example",
  "email": "jordan@example.com",
  "company": "Example Plumbing LLC",
  "zipcode": "80202",
  "industry": "Home Services",
  "revenue": "$1M - $5M",
  "employees": "10-50",
  "time_spent": 184,
  "responses": [
    { "category": 0, "question": 0, "answer": true },
    { "category": 0, "question": 1, "answer": false },
    { "category": 0, "question": 2, "answer": null },
    { "category": 1, "question": 0, "answer": true },
    { "category": 1, "question": 1, "answer": true },
    { "category": 2, "question": 0, "answer": false },
    { "category": 3, "question": 0, "answer": true },
    { "category": 4, "question": 0, "answer": null },
    { "category": 5, "question": 0, "answer": true }
  ]
}
"#;
