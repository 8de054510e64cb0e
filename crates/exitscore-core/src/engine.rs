//! Weighted scoring engine.
//!
//! Pure functions of a schema and a response set: no I/O, no shared mutable
//! state, safe to call concurrently against a shared schema.
//!
//! A category's score is the fraction of its question weight earned:
//! "yes" earns full weight, "don't know" earns [`UNKNOWN_CREDIT`] of it, and
//! "no" or no answer earns nothing. The overall score is the category-weight
//! weighted sum of those fractions, expressed as a whole percentage.

use serde::{Deserialize, Serialize};

use crate::error::InputRangeError;
use crate::model::{AnswerValue, AssessmentSchema, CategoryDefinition, ResponseSet};

/// Fraction of a question's weight earned by a "don't know" answer.
pub const UNKNOWN_CREDIT: f64 = 0.15;

/// Percentages are snapped to this many steps per point before rounding so
/// that binary floating-point noise cannot flip a tie.
const ROUNDING_GRID: f64 = 1_000_000.0;

/// Fraction of a question's weight earned by `answer`.
pub fn credit(answer: AnswerValue) -> f64 {
    match answer {
        AnswerValue::Yes => 1.0,
        AnswerValue::No => 0.0,
        AnswerValue::Unknown => UNKNOWN_CREDIT,
    }
}

/// Round a percentage to the nearest whole point, ties away from zero.
pub fn round_percent(raw: f64) -> u32 {
    let snapped = (raw * ROUNDING_GRID).round() / ROUNDING_GRID;
    snapped.round().max(0.0) as u32
}

/// Score of a single category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Category name.
    pub name: String,
    /// Earned weight as a fraction of the category's total weight, in [0, 1].
    pub score: f64,
    /// Questions in this category with any recorded answer.
    pub answered: usize,
    /// Questions in this category.
    pub total: usize,
}

impl CategoryScore {
    /// The score as a whole percentage.
    pub fn percent(&self) -> u32 {
        round_percent(self.score * 100.0)
    }
}

/// Overall sale-readiness score as a whole percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverallScore(u32);

impl OverallScore {
    pub fn new(percent: u32) -> Self {
        Self(percent)
    }

    /// Convert a weighted fraction (1.0 == 100%) to a rounded percentage.
    pub fn from_fraction(fraction: f64) -> Self {
        Self(round_percent(fraction * 100.0))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for OverallScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Result of scoring a full response set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    /// Rounded overall percentage.
    pub overall: OverallScore,
    /// Unrounded `Σ score_i × weight_i`.
    pub weighted_fraction: f64,
    /// Per-category breakdown, in schema order.
    pub categories: Vec<CategoryScore>,
}

/// Score one category against the full response set.
///
/// Only answers addressed to `category_index` are considered. Unanswered
/// questions earn nothing, and a category whose total weight is zero scores 0.
/// An answer for this category whose question index is past the end of its
/// question list is rejected.
pub fn score_category(
    category_index: usize,
    category: &CategoryDefinition,
    responses: &ResponseSet,
) -> Result<CategoryScore, InputRangeError> {
    let question_count = category.questions.len();
    if let Some((position, answer)) = responses
        .iter()
        .enumerate()
        .find(|(_, a)| a.category == category_index && a.question >= question_count)
    {
        return Err(InputRangeError::QuestionOutOfRange {
            position,
            category: category_index,
            category_name: category.name.clone(),
            question: answer.question,
            question_count,
        });
    }

    let mut total_weight = 0.0;
    let mut achieved = 0.0;
    let mut answered = 0;

    for (question_index, question) in category.questions.iter().enumerate() {
        total_weight += question.weight;
        if let Some(answer) = responses.lookup(category_index, question_index) {
            answered += 1;
            achieved += question.weight * credit(answer.answer);
        }
    }

    let score = if total_weight > 0.0 {
        achieved / total_weight
    } else {
        0.0
    };

    Ok(CategoryScore {
        name: category.name.clone(),
        score,
        answered,
        total: question_count,
    })
}

/// Score every category in schema order and combine them.
///
/// Every answer is bounds-checked against the schema before any scoring so
/// that a malformed response never silently contributes zero.
pub fn score_overall(
    schema: &AssessmentSchema,
    responses: &ResponseSet,
) -> Result<ScoreCard, InputRangeError> {
    responses.check_bounds(schema)?;

    let categories = schema
        .categories()
        .iter()
        .enumerate()
        .map(|(index, category)| score_category(index, category, responses))
        .collect::<Result<Vec<_>, _>>()?;

    let weighted_fraction = schema
        .categories()
        .iter()
        .zip(&categories)
        .map(|(definition, scored)| scored.score * definition.weight)
        .sum::<f64>();

    Ok(ScoreCard {
        overall: OverallScore::from_fraction(weighted_fraction),
        weighted_fraction,
        categories,
    })
}
