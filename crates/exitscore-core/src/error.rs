//! Scoring and intake error types.
//!
//! Configuration errors are raised when a schema is constructed or loaded.
//! Input range errors are raised at scoring time and identify the offending
//! answer by its position in the response set.

use thiserror::Error;

/// A structurally invalid assessment schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// The schema has no categories at all.
    #[error("assessment schema has no categories")]
    EmptySchema,

    /// A category has an empty or whitespace-only name.
    #[error("category {index} has an empty name")]
    UnnamedCategory { index: usize },

    /// Two categories share a name.
    #[error("category '{name}' is defined more than once")]
    DuplicateCategory { name: String },

    /// A category weight is negative, NaN or infinite.
    #[error("category '{category}' has invalid weight {weight} (must be finite and non-negative)")]
    InvalidCategoryWeight { category: String, weight: f64 },

    /// A question weight is negative, NaN or infinite.
    #[error(
        "question {question} of category '{category}' has invalid weight {weight} (must be finite and non-negative)"
    )]
    InvalidQuestionWeight {
        category: String,
        question: usize,
        weight: f64,
    },
}

/// An answer that references a category or question outside the schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputRangeError {
    #[error(
        "answer #{position} references category {category}, but the schema has {category_count} categories"
    )]
    CategoryOutOfRange {
        position: usize,
        category: usize,
        category_count: usize,
    },

    #[error(
        "answer #{position} references question {question} of category {category} ('{category_name}'), which has {question_count} questions"
    )]
    QuestionOutOfRange {
        position: usize,
        category: usize,
        category_name: String,
        question: usize,
        question_count: usize,
    },
}

impl InputRangeError {
    /// Zero-based position of the offending answer in the response set.
    pub fn position(&self) -> usize {
        match self {
            InputRangeError::CategoryOutOfRange { position, .. }
            | InputRangeError::QuestionOutOfRange { position, .. } => *position,
        }
    }
}

/// A submission rejected at intake.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmissionError {
    /// A required contact field is absent or blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The email address is not of the form `local@domain.tld`.
    #[error("invalid email format: {0}")]
    InvalidEmail(String),

    /// The quiz was completed faster than a human plausibly could.
    #[error("submission too fast: {elapsed_secs}s (minimum {minimum_secs}s)")]
    TooFast { elapsed_secs: f64, minimum_secs: u64 },
}

/// Failure while processing a submission through the assessment pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    InputRange(#[from] InputRangeError),
}
