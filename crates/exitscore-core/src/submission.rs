//! Quiz submission intake: required-field checks, email format, minimum
//! completion time and input sanitisation.

use serde::{Deserialize, Serialize};

use crate::error::SubmissionError;
use crate::model::ResponseSet;
use crate::report::BusinessSummary;

/// Maximum stored length of `name` and `company`, in characters.
pub const MAX_NAME_LEN: usize = 100;
/// Maximum stored length of `email`, in characters.
pub const MAX_EMAIL_LEN: usize = 254;

/// Intake rules applied to every submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntakePolicy {
    /// Quizzes completed in fewer seconds than this are rejected.
    #[serde(default = "default_min_time_spent")]
    pub min_time_spent_secs: u64,
}

fn default_min_time_spent() -> u64 {
    30
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self {
            min_time_spent_secs: default_min_time_spent(),
        }
    }
}

/// A completed quiz as posted by the front end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub zipcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees: Option<String>,
    /// Seconds the respondent spent on the quiz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<f64>,
    #[serde(default)]
    pub responses: ResponseSet,
    /// Score computed in the browser. Never trusted; the server recomputes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

fn required<'a>(
    value: &'a Option<String>,
    field: &'static str,
) -> Result<&'a str, SubmissionError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(SubmissionError::MissingField(field)),
    }
}

impl Submission {
    /// Check required fields, email format and completion time, in that order.
    pub fn validate(&self, policy: &IntakePolicy) -> Result<(), SubmissionError> {
        let email = required(&self.email, "email")?;
        required(&self.name, "name")?;
        required(&self.company, "company")?;
        required(&self.zipcode, "zipcode")?;

        if !is_valid_email(email) {
            return Err(SubmissionError::InvalidEmail(email.to_string()));
        }

        // A zero or absent time means the client did not report one.
        if let Some(elapsed) = self.time_spent {
            if elapsed != 0.0 && elapsed < policy.min_time_spent_secs as f64 {
                return Err(SubmissionError::TooFast {
                    elapsed_secs: elapsed,
                    minimum_secs: policy.min_time_spent_secs,
                });
            }
        }

        Ok(())
    }

    /// Trim and bound contact fields before they are stored or echoed.
    pub fn sanitize(&mut self) {
        if let Some(name) = self.name.as_mut() {
            *name = truncate_chars(name.trim(), MAX_NAME_LEN);
        }
        if let Some(company) = self.company.as_mut() {
            *company = truncate_chars(company.trim(), MAX_NAME_LEN);
        }
        if let Some(email) = self.email.as_mut() {
            *email = truncate_chars(&email.trim().to_lowercase(), MAX_EMAIL_LEN);
        }
    }

    /// The non-identifying business details carried into reports.
    pub fn business_summary(&self) -> BusinessSummary {
        BusinessSummary {
            company: self.company.clone().unwrap_or_default(),
            industry: self.industry.clone(),
            zipcode: self.zipcode.clone(),
            revenue: self.revenue.clone(),
            employees: self.employees.clone(),
        }
    }
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// `local@domain.tld`: exactly one `@`, no whitespace, non-empty local part,
/// and a dot inside the domain with characters on both sides.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    !local.is_empty()
        && domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
