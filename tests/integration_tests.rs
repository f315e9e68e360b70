// Integration tests for resume-wizard
//
// Drive the headless commands end to end, both through the library and
// through the compiled binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use resume_wizard::cli::WalkthroughArgs;
use resume_wizard::config_file::WizardConfig;
use resume_wizard::headless::{format_report, run_score, run_walkthrough};
use resume_wizard::summary::SessionSummary;
use resume_wizard::types::ExportFormat;
use resume_wizard::wizard::WizardStep;
use tempfile::TempDir;

const RESUME: &str = "Jane Doe\nBackend engineer with Python, PostgreSQL and Docker experience.\n";
const JOB: &str = "We need a Python engineer who knows Kubernetes, PostgreSQL and Terraform.";

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_resume-wizard"))
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Should write fixture");
    path
}

/// Settings file with the simulated delays removed.
fn fast_config(dir: &Path) -> PathBuf {
    let path = dir.join("settings.json");
    WizardConfig::default()
        .without_delays()
        .save_to_file(&path)
        .expect("Should save settings");
    path
}

fn walkthrough_args(dir: &Path) -> WalkthroughArgs {
    WalkthroughArgs {
        resume: None,
        resume_text: Some(write(dir, "resume.txt", RESUME)),
        job_description: write(dir, "job.txt", JOB),
        template: "modern".to_string(),
        plan: "basic".to_string(),
        skills: vec!["Kubernetes".to_string(), "Go".to_string()],
        format: Some(ExportFormat::Docx),
        output_dir: Some(dir.join("out")),
        summary: Some(dir.join("summary.json")),
    }
}

#[test]
fn test_walkthrough_reaches_preview_and_exports() {
    let dir = TempDir::new().unwrap();
    let args = walkthrough_args(dir.path());

    let summary = run_walkthrough(&args, WizardConfig::default().without_delays())
        .expect("Walkthrough should succeed");

    assert!(summary.finished);
    assert_eq!(summary.steps_reached, 7);
    assert_eq!(summary.current_step, WizardStep::Preview);
    assert_eq!(summary.template.as_ref().map(|t| t.as_str()), Some("modern"));
    assert_eq!(summary.additional_skills, vec!["Kubernetes", "Go"]);
    assert_eq!(summary.exports.len(), 1);

    let export = &summary.exports[0];
    assert!(export.starts_with(dir.path().join("out")));
    assert!(export.to_string_lossy().contains("docx"));
    let body = fs::read_to_string(export).unwrap();
    assert!(body.contains("Kubernetes"));

    let saved = SessionSummary::load_from_file(dir.path().join("summary.json")).unwrap();
    assert_eq!(saved, summary);
}

#[test]
fn test_walkthrough_rejects_unknown_template() {
    let dir = TempDir::new().unwrap();
    let mut args = walkthrough_args(dir.path());
    args.template = "baroque".to_string();

    let err = run_walkthrough(&args, WizardConfig::default().without_delays()).unwrap_err();
    assert!(format!("{:#}", err).contains("baroque"));
    assert!(!dir.path().join("summary.json").exists());
}

#[test]
fn test_walkthrough_stops_on_blank_job_description() {
    let dir = TempDir::new().unwrap();
    let mut args = walkthrough_args(dir.path());
    args.job_description = write(dir.path(), "blank.txt", "   \n");

    let err = run_walkthrough(&args, WizardConfig::default().without_delays()).unwrap_err();
    assert!(format!("{:#}", err).contains("Please enter a job description."));
}

#[test]
fn test_score_reports_missing_keywords() {
    let dir = TempDir::new().unwrap();
    let resume = write(dir.path(), "resume.txt", RESUME);
    let job = write(dir.path(), "job.txt", JOB);

    let report = run_score(&resume, &job, &WizardConfig::default()).unwrap();
    assert!(report.score > 0 && report.score < 100);
    assert!(report.missing_keywords().any(|k| k == "kubernetes"));
    assert!(!report.missing_keywords().any(|k| k == "python"));

    let text = format_report(&report);
    assert!(text.starts_with(&format!("ATS score: {}%", report.score)));
    assert!(text.contains("[ ] kubernetes"));
    assert!(text.contains("[x] python"));
}

#[test]
fn test_config_roundtrip_and_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");

    let config = WizardConfig {
        keyword_limit: 8,
        default_format: ExportFormat::Docx,
        ..WizardConfig::default()
    };
    config.save_to_file(&path).unwrap();
    let loaded = WizardConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
    assert!(loaded.validate().is_ok());

    let broken = WizardConfig {
        build_step_percent: 0,
        ..WizardConfig::default()
    };
    assert!(broken.validate().is_err());
}

// =============================================================================
// Binary tests
// =============================================================================

#[test]
fn test_binary_lists_catalogs() {
    let output = binary().arg("templates").output().expect("Should run binary");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for id in ["professional", "modern", "minimal", "creative"] {
        assert!(stdout.contains(id), "missing template {}", id);
    }

    let output = binary().arg("plans").output().expect("Should run binary");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("basic"));
    assert!(stdout.contains("premium"));
}

#[test]
fn test_binary_config_init_and_validate() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");

    let status = binary()
        .args(["config", "init"])
        .arg(&path)
        .status()
        .expect("Should run binary");
    assert!(status.success());
    assert!(path.exists());

    let output = binary()
        .args(["config", "validate"])
        .arg(&path)
        .output()
        .expect("Should run binary");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Settings file is valid"));

    fs::write(&path, r#"{ "build_step_percent": 0 }"#).unwrap();
    let output = binary()
        .args(["config", "validate"])
        .arg(&path)
        .output()
        .expect("Should run binary");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("build_step_percent"));
}

#[test]
fn test_binary_walkthrough_writes_summary() {
    let dir = TempDir::new().unwrap();
    let config = fast_config(dir.path());
    let resume = write(dir.path(), "resume.txt", RESUME);
    let job = write(dir.path(), "job.txt", JOB);
    let summary = dir.path().join("summary.json");

    let output = binary()
        .arg("--config")
        .arg(&config)
        .arg("walkthrough")
        .arg("--resume-text")
        .arg(&resume)
        .arg("--job-description")
        .arg(&job)
        .args(["--template", "minimal", "--plan", "standard", "--format", "pdf"])
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .arg("--summary")
        .arg(&summary)
        .output()
        .expect("Should run binary");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("reached step 7 of 7"));

    let saved = SessionSummary::load_from_file(&summary).unwrap();
    assert!(saved.finished);
    assert_eq!(saved.plan.as_ref().map(|p| p.as_str()), Some("standard"));
    assert!(saved.exports[0].exists());
}

#[test]
fn test_binary_rejects_unsupported_upload() {
    let dir = TempDir::new().unwrap();
    let config = fast_config(dir.path());
    let resume = write(dir.path(), "resume.png", "not a resume");
    let job = write(dir.path(), "job.txt", JOB);

    let output = binary()
        .arg("--config")
        .arg(&config)
        .arg("walkthrough")
        .arg("--resume")
        .arg(&resume)
        .arg("--job-description")
        .arg(&job)
        .args(["--template", "modern", "--plan", "basic"])
        .arg("--output-dir")
        .arg(dir.path())
        .output()
        .expect("Should run binary");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Resume upload rejected"));
}
