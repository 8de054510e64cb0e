//! Core data model types for exitscore.
//!
//! An [`AssessmentSchema`] is an ordered list of weighted categories, each an
//! ordered list of weighted yes/no questions. A [`ResponseSet`] holds the
//! answers a respondent gave, addressed by `(category index, question index)`.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, InputRangeError};

/// A single weighted question.
///
/// The question's identifier is its ordinal index within the category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    /// Relative weight within the category.
    pub weight: f64,
    /// Prompt shown to the respondent. Not used by scoring.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    /// External identifier carried by some schema files. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
}

impl QuestionDefinition {
    pub fn new(weight: f64, text: impl Into<String>) -> Self {
        Self {
            weight,
            text: text.into(),
            id: None,
        }
    }

    /// Text for display, falling back to "Question N" (1-based) when unset.
    pub fn display_text(&self, index: usize) -> String {
        if self.text.trim().is_empty() {
            format!("Question {}", index + 1)
        } else {
            self.text.clone()
        }
    }
}

/// A named, weighted group of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    /// Unique name within the assessment.
    pub name: String,
    /// Contribution of this category to the overall score.
    pub weight: f64,
    /// Questions in display order.
    #[serde(default)]
    pub questions: Vec<QuestionDefinition>,
}

impl CategoryDefinition {
    pub fn new(name: impl Into<String>, weight: f64, questions: Vec<QuestionDefinition>) -> Self {
        Self {
            name: name.into(),
            weight,
            questions,
        }
    }

    /// Sum of all question weights.
    pub fn total_weight(&self) -> f64 {
        self.questions.iter().map(|q| q.weight).sum()
    }
}

/// Unvalidated schema document as it appears in a schema file.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaDocument {
    pub categories: Vec<CategoryDefinition>,
}

/// A validated, immutable assessment definition.
///
/// The only ways to obtain one are [`AssessmentSchema::new`] and
/// deserialization, both of which reject structurally invalid input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SchemaDocument")]
pub struct AssessmentSchema {
    categories: Vec<CategoryDefinition>,
}

impl TryFrom<SchemaDocument> for AssessmentSchema {
    type Error = ConfigurationError;

    fn try_from(raw: SchemaDocument) -> Result<Self, Self::Error> {
        AssessmentSchema::new(raw.categories)
    }
}

fn valid_weight(weight: f64) -> bool {
    weight.is_finite() && weight >= 0.0
}

impl AssessmentSchema {
    /// Validate and build a schema.
    pub fn new(categories: Vec<CategoryDefinition>) -> Result<Self, ConfigurationError> {
        if categories.is_empty() {
            return Err(ConfigurationError::EmptySchema);
        }

        let mut seen = HashSet::new();
        for (index, category) in categories.iter().enumerate() {
            if category.name.trim().is_empty() {
                return Err(ConfigurationError::UnnamedCategory { index });
            }
            if !seen.insert(category.name.as_str()) {
                return Err(ConfigurationError::DuplicateCategory {
                    name: category.name.clone(),
                });
            }
            if !valid_weight(category.weight) {
                return Err(ConfigurationError::InvalidCategoryWeight {
                    category: category.name.clone(),
                    weight: category.weight,
                });
            }
            for (question, q) in category.questions.iter().enumerate() {
                if !valid_weight(q.weight) {
                    return Err(ConfigurationError::InvalidQuestionWeight {
                        category: category.name.clone(),
                        question,
                        weight: q.weight,
                    });
                }
            }
        }

        Ok(Self { categories })
    }

    /// Build a schema from categories known to be valid at compile time.
    pub(crate) fn from_trusted(categories: Vec<CategoryDefinition>) -> Self {
        debug_assert!(AssessmentSchema::new(categories.clone()).is_ok());
        Self { categories }
    }

    pub fn categories(&self) -> &[CategoryDefinition] {
        &self.categories
    }

    pub fn category(&self, index: usize) -> Option<&CategoryDefinition> {
        self.categories.get(index)
    }

    /// Index of the category with the given name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == name)
    }

    /// Number of categories (always at least one).
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of questions across all categories.
    pub fn question_count(&self) -> usize {
        self.categories.iter().map(|c| c.questions.len()).sum()
    }

    /// Sum of category weights.
    pub fn total_weight(&self) -> f64 {
        self.categories.iter().map(|c| c.weight).sum()
    }
}

/// A respondent's answer to one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerValue {
    Yes,
    No,
    /// "Don't know".
    Unknown,
}

impl AnswerValue {
    /// The quiz wire encoding: `true`, `false`, or `null` for unknown.
    pub fn as_quiz_value(self) -> Option<bool> {
        match self {
            AnswerValue::Yes => Some(true),
            AnswerValue::No => Some(false),
            AnswerValue::Unknown => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AnswerValue::Yes => "Yes",
            AnswerValue::No => "No",
            AnswerValue::Unknown => "Don't Know",
        }
    }
}

impl From<Option<bool>> for AnswerValue {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => AnswerValue::Yes,
            Some(false) => AnswerValue::No,
            None => AnswerValue::Unknown,
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AnswerValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" | "true" => Ok(AnswerValue::Yes),
            "no" | "n" | "false" => Ok(AnswerValue::No),
            "unknown" | "don't know" | "dont know" | "?" | "null" => Ok(AnswerValue::Unknown),
            other => Err(format!("unknown answer value: {other}")),
        }
    }
}

/// Serde adapter for the quiz's `true | false | null` answer encoding.
mod quiz_answer {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::AnswerValue;

    pub fn serialize<S: Serializer>(value: &AnswerValue, serializer: S) -> Result<S::Ok, S::Error> {
        value.as_quiz_value().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<AnswerValue, D::Error> {
        Option::<bool>::deserialize(deserializer).map(AnswerValue::from)
    }
}

/// One recorded answer, addressed by category and question index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub category: usize,
    pub question: usize,
    #[serde(with = "quiz_answer")]
    pub answer: AnswerValue,
}

impl Answer {
    pub fn new(category: usize, question: usize, answer: AnswerValue) -> Self {
        Self {
            category,
            question,
            answer,
        }
    }
}

/// An unordered collection of answers.
///
/// Well-formed input has at most one answer per `(category, question)` pair.
/// When duplicates occur, the first one in insertion order wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseSet {
    answers: Vec<Answer>,
}

impl ResponseSet {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self { answers }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Answer> {
        self.answers.iter()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// The first answer recorded for `(category, question)`.
    pub fn lookup(&self, category: usize, question: usize) -> Option<&Answer> {
        self.answers
            .iter()
            .find(|a| a.category == category && a.question == question)
    }

    /// Reject the first answer that points outside `schema`.
    pub fn check_bounds(&self, schema: &AssessmentSchema) -> Result<(), InputRangeError> {
        for (position, answer) in self.answers.iter().enumerate() {
            let Some(category) = schema.category(answer.category) else {
                return Err(InputRangeError::CategoryOutOfRange {
                    position,
                    category: answer.category,
                    category_count: schema.len(),
                });
            };
            if answer.question >= category.questions.len() {
                return Err(InputRangeError::QuestionOutOfRange {
                    position,
                    category: answer.category,
                    category_name: category.name.clone(),
                    question: answer.question,
                    question_count: category.questions.len(),
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<Answer> for ResponseSet {
    fn from_iter<I: IntoIterator<Item = Answer>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ResponseSet {
    type Item = &'a Answer;
    type IntoIter = std::slice::Iter<'a, Answer>;

    fn into_iter(self) -> Self::IntoIter {
        self.answers.iter()
    }
}

/// A hot-swappable handle to the active schema.
///
/// Scoring calls take a snapshot with [`SharedSchema::current`] and keep using
/// it even if the schema is replaced mid-flight.
#[derive(Debug)]
pub struct SharedSchema {
    inner: RwLock<Arc<AssessmentSchema>>,
}

impl SharedSchema {
    pub fn new(schema: AssessmentSchema) -> Self {
        Self {
            inner: RwLock::new(Arc::new(schema)),
        }
    }

    /// Snapshot of the schema in effect right now.
    pub fn current(&self) -> Arc<AssessmentSchema> {
        match self.inner.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Atomically install a new schema, returning the previous one.
    pub fn replace(&self, schema: AssessmentSchema) -> Arc<AssessmentSchema> {
        let next = Arc::new(schema);
        match self.inner.write() {
            Ok(mut guard) => std::mem::replace(&mut *guard, next),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), next),
        }
    }
}
