//! HTML results view.
//!
//! Produces a self-contained HTML page with all CSS inlined. Contact details
//! are never part of an assessment report, so the page is safe to share with
//! an internal team.

use anyhow::{Context, Result};
use std::path::Path;

use exitscore_core::model::AnswerValue;
use exitscore_core::readiness::Standing;
use exitscore_core::report::{AssessmentReport, CategoryReport};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn standing_color(standing: Standing) -> &'static str {
    match standing {
        Standing::Strong => "#22c55e",
        Standing::Moderate => "#eab308",
        Standing::NeedsAttention => "#ef4444",
    }
}

fn standing_class(standing: Standing) -> &'static str {
    match standing {
        Standing::Strong => "strong",
        Standing::Moderate => "moderate",
        Standing::NeedsAttention => "attention",
    }
}

/// Generate the results page for an assessment.
pub fn generate_html(report: &AssessmentReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"robots\" content=\"noindex,nofollow\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>Exit Score Results #{}</title>\n",
        report.id
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n<div class=\"wrap\">\n");

    // Summary card
    html.push_str("<header class=\"card summary\">\n<div>\n");
    html.push_str(&format!(
        "<h1>Exit Score Summary: {}</h1>\n",
        html_escape(&report.business.company)
    ));
    html.push_str(&format!(
        "<p class=\"meta\">Industry: {} | {}</p>\n",
        html_escape(report.business.industry.as_deref().unwrap_or("N/A")),
        report.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    html.push_str(&format!(
        "<p>{}</p>\n",
        html_escape(report.tier.guidance())
    ));
    html.push_str("</div>\n<div class=\"overall\">\n");
    html.push_str(&format!(
        "<div class=\"score\">{}</div>\n<div class=\"meta\">{}</div>\n",
        report.overall,
        html_escape(report.tier.label())
    ));
    html.push_str("</div>\n</header>\n");

    // Category chart
    if !report.categories.is_empty() {
        html.push_str("<section class=\"card\">\n<h2>Categories</h2>\n");
        html.push_str(&generate_bar_chart(&report.categories));
        html.push_str("</section>\n");
    }

    // Per-category questions
    for category in &report.categories {
        html.push_str(&render_category(category));
    }

    if let Some(narrative) = &report.narrative {
        html.push_str("<section class=\"card narrative\">\n<h2>Advisory Report</h2>\n");
        if let Some(model) = &report.narrative_model {
            html.push_str(&format!(
                "<p class=\"meta\">Drafted by {}</p>\n",
                html_escape(model)
            ));
        }
        html.push_str(&format!("<pre>{}</pre>\n", html_escape(narrative.trim())));
        html.push_str("</section>\n");
    }

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str(&format!(
        "<p class=\"meta\">Report #{}. Contact details intentionally omitted.</p>\n",
        report.id
    ));
    html.push_str("</div>\n</body>\n</html>");
    html
}

fn render_category(category: &CategoryReport) -> String {
    let mut html = String::new();

    html.push_str(&format!(
        "<section class=\"card category {}\">\n",
        standing_class(category.standing)
    ));
    html.push_str(&format!(
        "<div class=\"row\"><h2>{}</h2><strong>{}%</strong></div>\n",
        html_escape(&category.name),
        category.percent
    ));
    html.push_str(&format!(
        "<div class=\"bar\"><span style=\"width:{}%;background:{}\"></span></div>\n",
        category.percent.min(100),
        standing_color(category.standing)
    ));
    html.push_str(&format!(
        "<p class=\"meta\">{} | weight {:.0}% | {}/{} answered</p>\n",
        category.standing,
        category.weight * 100.0,
        category.answered,
        category.total
    ));

    html.push_str("<ul>\n");
    for q in &category.questions {
        let answer = q.answer.map(AnswerValue::label).unwrap_or("—");
        html.push_str(&format!(
            "<li><strong>{}</strong> — <span class=\"meta\">{}</span></li>\n",
            html_escape(&q.text),
            html_escape(answer)
        ));
    }
    html.push_str("</ul>\n</section>\n");

    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &AssessmentReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

fn generate_bar_chart(categories: &[CategoryReport]) -> String {
    let bar_height = 26;
    let max_width = 400;
    let padding = 10;
    let label_width = 240;

    let total_height = categories.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, category) in categories.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = category.percent.min(100) as usize * max_width / 100;

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&category.name)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width,
            y,
            width,
            bar_height,
            standing_color(category.standing)
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            category.percent
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #f8fafc; --card: #fff; --fg: #0f172a; --muted: #64748b; --border: #e5e7eb; --accent: #416ea6; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --card: #1f2937; --fg: #f9fafb; --muted: #9ca3af; --border: #374151; }
}
body { font-family: Inter, -apple-system, 'Segoe UI', sans-serif; margin: 0; background: var(--bg); color: var(--fg); }
.wrap { max-width: 920px; margin: 0 auto; padding: 2rem; }
.card { background: var(--card); border: 1px solid var(--border); border-radius: 12px; padding: 1rem 1.25rem; margin-top: 1rem; }
.summary { display: flex; justify-content: space-between; align-items: center; gap: 1rem; }
.overall { text-align: right; }
.score { font-size: 2.5rem; font-weight: 800; color: var(--accent); }
.row { display: flex; justify-content: space-between; align-items: center; }
h1 { font-size: 1.6rem; margin: 0.5rem 0; }
h2 { font-size: 1.1rem; margin: 0.5rem 0; }
.meta { color: var(--muted); }
.bar { height: 8px; background: var(--border); border-radius: 999px; overflow: hidden; }
.bar span { display: block; height: 100%; }
ul { margin: 0.5rem 0 0 1.2rem; }
li { margin: 0.15rem 0; }
pre { overflow-x: auto; white-space: pre-wrap; padding: 1rem; background: var(--bg); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 0.5rem 0; }
"#;
