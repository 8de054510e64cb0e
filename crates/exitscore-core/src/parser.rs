//! Assessment schema loader.
//!
//! Loads the question schema from JSON or TOML files, falls back to the
//! built-in Exit Score assessment, and lints schemas for common mistakes.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::model::{AssessmentSchema, CategoryDefinition, QuestionDefinition, SchemaDocument};

/// File looked up in the working directory when no schema path is given.
pub const DEFAULT_SCHEMA_FILE: &str = "questions.json";

/// Tolerance used when checking that weights sum to one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Where the active schema came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    /// Loaded from a file on disk.
    File(PathBuf),
    /// The built-in assessment.
    BuiltIn,
}

impl std::fmt::Display for SchemaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaSource::File(path) => write!(f, "{}", path.display()),
            SchemaSource::BuiltIn => write!(f, "built-in default"),
        }
    }
}

/// Schema file encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Json,
    Toml,
}

impl SchemaFormat {
    /// `.toml` files are TOML, everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        if path.extension().is_some_and(|ext| ext == "toml") {
            SchemaFormat::Toml
        } else {
            SchemaFormat::Json
        }
    }
}

/// Read, parse and validate a schema file.
pub fn load_schema(path: &Path) -> Result<AssessmentSchema> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema file: {}", path.display()))?;

    parse_schema_str(&content, SchemaFormat::from_path(path))
        .with_context(|| format!("invalid schema file: {}", path.display()))
}

/// Parse a schema from a string (useful for testing).
pub fn parse_schema_str(content: &str, format: SchemaFormat) -> Result<AssessmentSchema> {
    let document: SchemaDocument = match format {
        SchemaFormat::Json => serde_json::from_str(content).context("failed to parse JSON")?,
        SchemaFormat::Toml => toml::from_str(content).context("failed to parse TOML")?,
    };

    Ok(AssessmentSchema::try_from(document)?)
}

/// Pick the schema to score against.
///
/// An explicit path must load. Otherwise `questions.json` in the working
/// directory is used when present, and the built-in assessment when not.
pub fn resolve_schema(explicit: Option<&Path>) -> Result<(AssessmentSchema, SchemaSource)> {
    if let Some(path) = explicit {
        let schema = load_schema(path)?;
        return Ok((schema, SchemaSource::File(path.to_path_buf())));
    }

    let local = PathBuf::from(DEFAULT_SCHEMA_FILE);
    if local.exists() {
        let schema = load_schema(&local)?;
        tracing::debug!(path = %local.display(), "loaded schema from working directory");
        return Ok((schema, SchemaSource::File(local)));
    }

    tracing::warn!(
        "no {} found, using built-in assessment schema",
        DEFAULT_SCHEMA_FILE
    );
    Ok((default_schema(), SchemaSource::BuiltIn))
}

fn category(name: &str, weight: f64, questions: &[(u32, f64, &str)]) -> CategoryDefinition {
    CategoryDefinition::new(
        name,
        weight,
        questions
            .iter()
            .map(|(id, weight, text)| {
                let mut question = QuestionDefinition::new(*weight, *text);
                question.id = Some(*id);
                question
            })
            .collect(),
    )
}

/// The built-in six-category Exit Score assessment.
pub fn default_schema() -> AssessmentSchema {
    let categories = vec![
        category(
            "Risk of Change of Ownership",
            0.3,
            &[
                (1, 0.35, "Could the business run for 90 days without the owner?"),
                (2, 0.22, "Are key customer relationships held by staff rather than the owner?"),
                (3, 0.18, "Are core processes documented?"),
                (4, 0.12, "Is there a management team able to stay on after a sale?"),
                (5, 0.13, "Are key supplier agreements transferable to a new owner?"),
            ],
        ),
        category(
            "Company Growth",
            0.2,
            &[
                (6, 0.45, "Has revenue grown in each of the last three years?"),
                (7, 0.35, "Have profit margins held or improved over the last three years?"),
                (8, 0.2, "Is there a written plan for growth over the next three years?"),
            ],
        ),
        category(
            "Industry Growth",
            0.15,
            &[
                (9, 0.6, "Is your industry growing faster than the wider economy?"),
                (10, 0.4, "Is your industry free of major regulatory or technology threats?"),
            ],
        ),
        category(
            "Market Demand",
            0.15,
            &[
                (11, 0.25, "Have comparable businesses sold recently in your market?"),
                (12, 0.2, "Would competitors or suppliers be interested in acquiring you?"),
                (13, 0.2, "Is more than half of revenue recurring or contracted?"),
                (14, 0.15, "Does no single customer account for more than 15% of revenue?"),
                (15, 0.12, "Is demand for your products or services stable year-round?"),
                (16, 0.08, "Do you serve customers outside your local area?"),
            ],
        ),
        category(
            "Company Rating",
            0.1,
            &[
                (17, 0.25, "Are your financial statements reviewed or audited?"),
                (18, 0.2, "Are your books kept separate from personal expenses?"),
                (19, 0.2, "Do you have an average online rating of four stars or more?"),
                (20, 0.18, "Are all licenses, permits and filings up to date?"),
                (21, 0.12, "Is the business free of pending litigation?"),
                (22, 0.05, "Has the business operated for more than ten years?"),
            ],
        ),
        category(
            "Competitiveness",
            0.1,
            &[
                (23, 0.36, "Do you have a clear advantage over your main competitors?"),
                (24, 0.29, "Do you own intellectual property, brands or exclusive rights?"),
                (25, 0.21, "Are your prices at or above the market average?"),
                (26, 0.14, "Would it be hard for a new competitor to copy your business?"),
            ],
        ),
    ];

    AssessmentSchema::from_trusted(categories)
}

/// A non-fatal issue found when linting a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaWarning {
    /// The category the warning applies to, if any.
    pub category: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Lint a schema for weights that do not sum to one and empty categories.
pub fn validate_schema(schema: &AssessmentSchema) -> Vec<SchemaWarning> {
    let mut warnings = Vec::new();

    let total = schema.total_weight();
    if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        warnings.push(SchemaWarning {
            category: None,
            message: format!("category weights sum to {total:.4}, expected 1.0"),
        });
    }

    for category in schema.categories() {
        if category.questions.is_empty() {
            warnings.push(SchemaWarning {
                category: Some(category.name.clone()),
                message: "category has no questions and will always score 0".into(),
            });
            continue;
        }

        let sum = category.total_weight();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            warnings.push(SchemaWarning {
                category: Some(category.name.clone()),
                message: format!("question weights sum to {sum:.4}, expected 1.0"),
            });
        }
    }

    warnings
}
