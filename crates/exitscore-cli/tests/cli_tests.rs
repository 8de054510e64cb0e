//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn exitscore() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("exitscore").unwrap()
}

/// A command isolated from the caller's config files and API keys.
fn exitscore_in(dir: &TempDir) -> Command {
    let mut cmd = exitscore();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("EXITSCORE_ANTHROPIC_KEY")
        .env_remove("CLAUDE_API_KEY")
        .env_remove("AI_MODEL");
    cmd
}

/// Every question in the first two default categories answered yes: 30% + 20%.
const HALF_READY_ANSWERS: &str = r#"[
    {"category": 0, "question": 0, "answer": true},
    {"category": 0, "question": 1, "answer": true},
    {"category": 0, "question": 2, "answer": true},
    {"category": 0, "question": 3, "answer": true},
    {"category": 0, "question": 4, "answer": true},
    {"category": 1, "question": 0, "answer": true},
    {"category": 1, "question": 1, "answer": true},
    {"category": 1, "question": 2, "answer": true}
]"#;

fn submission(time_spent: u32, responses: &str) -> String {
    format!(
        r#"{{
            "name": "Jordan Example",
            "email": "jordan@example.com",
            "company": "Acme Plumbing",
            "zipcode": "80202",
            "industry": "Home Services",
            "time_spent": {time_spent},
            "responses": {responses}
        }}"#
    )
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn files_with_extension(dir: &Path, ext: &str) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(ext))
        .collect()
}

#[test]
fn help_lists_commands() {
    exitscore()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("score"))
        .stdout(predicate::str::contains("assess"))
        .stdout(predicate::str::contains("compare"))
        .stdout(predicate::str::contains("list-models"));
}

#[test]
fn score_text_output() {
    let dir = TempDir::new().unwrap();
    write(&dir, "answers.json", HALF_READY_ANSWERS);

    exitscore_in(&dir)
        .args(["score", "--responses", "answers.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Risk of Change of Ownership"))
        .stdout(predicate::str::contains("5/5"))
        .stdout(predicate::str::contains("Overall: 50% (At Risk)"));
}

#[test]
fn score_json_output() {
    let dir = TempDir::new().unwrap();
    write(&dir, "answers.json", HALF_READY_ANSWERS);

    let output = exitscore_in(&dir)
        .args(["score", "--responses", "answers.json", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["overall"], 50);
    assert_eq!(json["tier"], "at_risk");
    assert_eq!(json["categories"].as_array().unwrap().len(), 6);
    assert_eq!(json["categories"][0]["standing"], "strong");
    assert_eq!(json["categories"][2]["percent"], 0);
}

#[test]
fn score_accepts_submission_object() {
    let dir = TempDir::new().unwrap();
    write(&dir, "submission.json", &submission(120, HALF_READY_ANSWERS));

    exitscore_in(&dir)
        .args(["score", "--responses", "submission.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Overall: 50%"));
}

#[test]
fn score_rejects_out_of_range_answer() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "answers.json",
        r#"[
            {"category": 0, "question": 0, "answer": true},
            {"category": 9, "question": 0, "answer": true}
        ]"#,
    );

    exitscore_in(&dir)
        .args(["score", "--responses", "answers.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("answer #1 references category 9"));
}

#[test]
fn score_with_custom_schema() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "schema.toml",
        r#"
[[categories]]
name = "Growth"
weight = 1.0

[[categories.questions]]
weight = 0.5

[[categories.questions]]
weight = 0.5
"#,
    );
    write(
        &dir,
        "answers.json",
        r#"[
            {"category": 0, "question": 0, "answer": true},
            {"category": 0, "question": 1, "answer": false}
        ]"#,
    );

    exitscore_in(&dir)
        .args(["score", "--responses", "answers.json", "--schema", "schema.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Growth"))
        .stdout(predicate::str::contains("Overall: 50%"));
}

#[test]
fn validate_built_in_schema() {
    let dir = TempDir::new().unwrap();

    exitscore_in(&dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("built-in default"))
        .stdout(predicate::str::contains("6 categories, 26 questions"))
        .stdout(predicate::str::contains("Schema valid."));
}

#[test]
fn validate_reports_weight_warnings() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "schema.json",
        r#"{
            "categories": [
                {"name": "Growth", "weight": 0.5, "questions": [{"weight": 1.0}]},
                {"name": "Demand", "weight": 0.3, "questions": []}
            ]
        }"#,
    );

    exitscore_in(&dir)
        .args(["validate", "--schema", "schema.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("category weights sum to 0.8000"))
        .stdout(predicate::str::contains("[Demand] WARNING"))
        .stdout(predicate::str::contains("2 warning(s) found."));
}

#[test]
fn validate_rejects_invalid_schema() {
    let dir = TempDir::new().unwrap();
    write(&dir, "schema.json", r#"{"categories": []}"#);

    exitscore_in(&dir)
        .args(["validate", "--schema", "schema.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no categories"));
}

#[test]
fn init_creates_files_then_skips() {
    let dir = TempDir::new().unwrap();

    exitscore_in(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created exitscore.toml"))
        .stdout(predicate::str::contains("Created questions.json"))
        .stdout(predicate::str::contains("Next steps:"));

    assert!(dir.path().join("exitscore.toml").exists());
    assert!(dir.path().join("questions.json").exists());
    assert!(dir.path().join("submissions/example.json").exists());

    exitscore_in(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exitscore.toml already exists, skipping."));

    // The generated schema is picked up from the working directory.
    exitscore_in(&dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Schema: questions.json"))
        .stdout(predicate::str::contains("Schema valid."));
}

#[test]
fn list_models_without_config() {
    let dir = TempDir::new().unwrap();

    exitscore_in(&dir)
        .arg("list-models")
        .assert()
        .success()
        .stdout(predicate::str::contains("No providers configured"));
}

#[test]
fn list_models_with_mock_provider() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "exitscore.toml",
        "default_provider = \"offline\"\n\n[providers.offline]\ntype = \"mock\"\n",
    );

    exitscore_in(&dir)
        .arg("list-models")
        .assert()
        .success()
        .stdout(predicate::str::contains("Provider: offline (default)"))
        .stdout(predicate::str::contains("mock-model"));
}

#[test]
fn assess_rejects_fast_submission() {
    let dir = TempDir::new().unwrap();
    write(&dir, "submission.json", &submission(5, HALF_READY_ANSWERS));

    exitscore_in(&dir)
        .args(["assess", "--submission", "submission.json", "--no-narrative"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("submission too fast"));
}

#[test]
fn assess_rejects_missing_email() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "submission.json",
        r#"{"name": "Jordan", "company": "Acme", "zipcode": "80202", "responses": []}"#,
    );

    exitscore_in(&dir)
        .args(["assess", "--submission", "submission.json", "--no-narrative"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required field: email"));
}

#[test]
fn assess_writes_all_formats() {
    let dir = TempDir::new().unwrap();
    write(&dir, "submission.json", &submission(120, HALF_READY_ANSWERS));

    exitscore_in(&dir)
        .args([
            "assess",
            "--submission",
            "submission.json",
            "--output",
            "out",
            "--format",
            "all",
            "--no-narrative",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exit Score: Acme Plumbing"))
        .stdout(predicate::str::contains("Overall: 50% (At Risk)"))
        .stdout(predicate::str::contains("No advisory report drafted"));

    let out = dir.path().join("out");
    let json = files_with_extension(&out, "json");
    assert_eq!(json.len(), 1);
    assert_eq!(files_with_extension(&out, "html").len(), 1);
    assert_eq!(files_with_extension(&out, "md").len(), 1);

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json[0]).unwrap()).unwrap();
    assert_eq!(report["overall"], 50);
    assert_eq!(report["business"]["company"], "Acme Plumbing");
    assert!(report.get("narrative").is_none());

    let raw = std::fs::read_to_string(&json[0]).unwrap();
    assert!(!raw.contains("jordan@example.com"));
}

#[test]
fn assess_with_mock_provider_drafts_narrative() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "exitscore.toml",
        r#"
default_provider = "offline"
output_dir = "reports"

[providers.offline]
type = "mock"
response = "Reduce owner dependence before going to market."
"#,
    );
    write(&dir, "submission.json", &submission(120, HALF_READY_ANSWERS));

    exitscore_in(&dir)
        .args(["assess", "--submission", "submission.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Advisory report drafted by claude-sonnet-4-20250514",
        ));

    let json = files_with_extension(&dir.path().join("reports"), "json");
    assert_eq!(json.len(), 1);
    let raw = std::fs::read_to_string(&json[0]).unwrap();
    assert!(raw.contains("Reduce owner dependence before going to market."));
}

#[test]
fn assess_without_provider_still_scores() {
    let dir = TempDir::new().unwrap();
    write(&dir, "submission.json", &submission(120, HALF_READY_ANSWERS));

    exitscore_in(&dir)
        .args(["assess", "--submission", "submission.json", "--output", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Overall: 50%"))
        .stdout(predicate::str::contains("No advisory report drafted"));
}

fn assess_into(dir: &TempDir, output: &str, responses: &str) -> PathBuf {
    let name = format!("{output}.json");
    write(dir, &name, &submission(120, responses));

    exitscore_in(dir)
        .args([
            "assess",
            "--submission",
            name.as_str(),
            "--output",
            output,
            "--no-narrative",
        ])
        .assert()
        .success();

    let mut files = files_with_extension(&dir.path().join(output), "json");
    assert_eq!(files.len(), 1);
    files.remove(0)
}

#[test]
fn compare_reports_progress_and_declines() {
    let dir = TempDir::new().unwrap();
    let baseline = assess_into(
        &dir,
        "baseline",
        r#"[
            {"category": 0, "question": 0, "answer": true},
            {"category": 0, "question": 1, "answer": true},
            {"category": 0, "question": 2, "answer": true},
            {"category": 0, "question": 3, "answer": true},
            {"category": 0, "question": 4, "answer": true}
        ]"#,
    );
    let current = assess_into(&dir, "current", HALF_READY_ANSWERS);

    exitscore_in(&dir)
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline)
        .arg("--current")
        .arg(&current)
        .arg("--fail-on-decline")
        .assert()
        .success()
        .stdout(predicate::str::contains("Overall: 30% -> 50% (+20 pts)"))
        .stdout(predicate::str::contains("Company Growth 0% -> 100% (+100)"));

    exitscore_in(&dir)
        .arg("compare")
        .arg("--baseline")
        .arg(&current)
        .arg("--current")
        .arg(&baseline)
        .args(["--format", "markdown", "--fail-on-decline"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("**Overall:** 50% → 30% (-20 pts)"));
}
