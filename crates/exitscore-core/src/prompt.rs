//! Prompt construction for the written advisory report.

use std::fmt::Write;

use crate::model::AnswerValue;
use crate::readiness::ReadinessTier;
use crate::report::AssessmentReport;

/// What the narrative should stress for an owner in `tier`.
fn emphasis(tier: ReadinessTier) -> &'static str {
    match tier {
        ReadinessTier::Premium => {
            "Emphasize how to lock in a premium price, shorten time to close and avoid diligence surprises."
        }
        ReadinessTier::Strong => {
            "Highlight small optimizations that improve price and speed, and how to stage quick wins before going to market."
        }
        ReadinessTier::Promising => {
            "Focus on the two or three highest-leverage improvements that raise buyer demand and valuation, and how to sequence them."
        }
        ReadinessTier::AtRisk => {
            "Call out the risks buyers penalize, how they discount valuation, and what to fix first to remove objections."
        }
        ReadinessTier::Critical => {
            "Address the biggest deal-killers first, explain how they surface in diligence, and give a practical recovery plan."
        }
    }
}

/// Improvement theme for the built-in categories.
fn focus_area(category: &str) -> &'static str {
    match category {
        "Risk of Change of Ownership" => {
            "Reducing owner dependency and proving the business can thrive under new ownership"
        }
        "Company Growth" => "Demonstrating consistent revenue growth and future growth potential",
        "Industry Growth" => "Positioning the business favorably within industry trends",
        "Market Demand" => "Building sustainable competitive advantages and market resilience",
        "Company Rating" => "Ensuring financial transparency and operational professionalism",
        "Competitiveness" => "Strengthening competitive advantages and market differentiation",
        _ => "Improving this key area of the business",
    }
}

const REPORT_SECTIONS: &[&str] = &[
    "Executive Snapshot: overall score context, the top three value levers and why they move price, a risk heat map by category (Strong / Moderate / Needs Attention), and positioning guidance.",
    "Category Cards: for each category, what buyers look for, strengths and risks drawn from the responses, and concrete improvement steps.",
    "90-Day Preparation Plan: week-by-week actions prioritized for impact and speed, with owners and milestones.",
    "Buyer Questions and Talk Tracks: the questions buyers will ask given these scores, with credible answers.",
    "Valuation Impact: how the top fixes widen the buyer pool and affect likely valuation, qualitatively.",
    "Before Diligence: the three to five fixes to complete before going to market.",
];

/// Build the narrative prompt for an assessment.
///
/// Only business-level details are included. Contact details never reach the
/// model.
pub fn build_narrative_prompt(report: &AssessmentReport) -> String {
    let mut prompt = String::new();
    let business = &report.business;

    prompt.push_str("BUSINESS INFORMATION:\n");
    let _ = writeln!(prompt, "Company: {}", business.company);
    let _ = writeln!(
        prompt,
        "Industry: {}",
        business.industry.as_deref().unwrap_or("Not specified")
    );
    if let Some(revenue) = &business.revenue {
        let _ = writeln!(prompt, "Revenue: {revenue}");
    }
    if let Some(employees) = &business.employees {
        let _ = writeln!(prompt, "Employees: {employees}");
    }
    let _ = writeln!(
        prompt,
        "Overall Exit Score: {} ({})\n",
        report.overall, report.tier
    );

    prompt.push_str("CATEGORY SCORES:\n");
    for c in &report.categories {
        let _ = writeln!(
            prompt,
            "{}: {}% ({}/{} questions answered)",
            c.name, c.percent, c.answered, c.total
        );
    }

    prompt.push_str("\nDETAILED RESPONSES:\n");
    for c in &report.categories {
        let answered: Vec<_> = c
            .questions
            .iter()
            .filter_map(|q| q.answer.map(|a| (q, a)))
            .collect();
        if answered.is_empty() {
            continue;
        }
        let _ = writeln!(prompt, "\n{}:", c.name.to_uppercase());
        for (q, answer) in answered {
            let _ = writeln!(
                prompt,
                "- {}: {} (Weight: {})",
                q.text,
                AnswerValue::label(answer),
                q.weight
            );
        }
    }

    prompt.push_str("\nCATEGORY STANDING:\n");
    for c in &report.categories {
        let _ = writeln!(
            prompt,
            "- {} ({}%): {}. Focus: {}",
            c.name,
            c.percent,
            c.standing,
            focus_area(&c.name)
        );
    }

    prompt.push_str("\nWrite an owner-friendly report with these sections:\n");
    for section in REPORT_SECTIONS {
        let _ = writeln!(prompt, "- {section}");
    }
    let _ = writeln!(
        prompt,
        "\n{} {}",
        report.tier.guidance(),
        emphasis(report.tier)
    );
    prompt.push_str(
        "Tone: decisive, consultative and practical. Use plain language and bullet-friendly formatting.\n",
    );

    prompt
}
