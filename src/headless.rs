//! Non-interactive commands: the scripted walkthrough, the standalone ATS
//! check and the catalog listings.

use anyhow::{Context, Result, bail};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::catalog::{PLANS, TEMPLATES};
use crate::cli::WalkthroughArgs;
use crate::collaborators::{AtsReport, AtsScorer, CancelToken, KeywordAtsScorer};
use crate::config_file::WizardConfig;
use crate::session::WizardSession;
use crate::summary::SessionSummary;
use crate::types::NotificationLevel;
use crate::wizard::{AdvanceOutcome, WizardStep};

/// Slack added on top of the configured delays before giving up on a worker.
const WORKER_GRACE: Duration = Duration::from_secs(30);

/// Run every wizard step from files and return the session summary.
pub fn run_walkthrough(args: &WalkthroughArgs, mut config: WizardConfig) -> Result<SessionSummary> {
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    let format = args.format.unwrap_or(config.default_format);
    let payment_timeout = config.payment_delay() + WORKER_GRACE;
    let build_timeout = build_duration(&config) + WORKER_GRACE;

    let mut session = WizardSession::simulated(config);
    install_interrupt_handler(session.interrupt_token());

    // Upload
    if let Some(path) = &args.resume {
        let accepted = session.upload_file(path)?;
        flush_notifications(&mut session);
        if !accepted {
            bail!("Resume upload rejected: {}", path.display());
        }
    } else if let Some(path) = &args.resume_text {
        session.paste_resume_text(read_text(path)?)?;
    }
    continue_to(&mut session, WizardStep::JobDescription)?;

    // Job description
    session.set_job_description(read_text(&args.job_description)?)?;
    continue_to(&mut session, WizardStep::Template)?;

    // Template
    session.select_template(&args.template)?;
    continue_to(&mut session, WizardStep::AtsScore)?;

    if let Some(report) = &session.state().ats_report {
        println!("{}", format_report(report));
    }
    continue_to(&mut session, WizardStep::Payment)?;

    // Payment
    session.choose_plan(&args.plan)?;
    println!("Processing payment for plan '{}'...", args.plan);
    let settled = session.wait_until(payment_timeout, |c| !c.state().payment.is_pending())?;
    flush_notifications(&mut session);
    if !settled || session.state().current != WizardStep::Building {
        bail!("Payment was not confirmed");
    }

    // Building
    for skill in &args.skills {
        session.add_skill(skill)?;
    }
    session.start_build()?;
    println!("Optimizing resume...");
    let built = session.wait_until(build_timeout, |c| c.running_build().is_none())?;
    flush_notifications(&mut session);
    if !built || session.state().current != WizardStep::Preview {
        bail!("Resume optimization did not complete");
    }

    // Preview
    let path = session.export(format)?;
    flush_notifications(&mut session);
    println!("Saved {}", path.display());

    match session.advance()? {
        AdvanceOutcome::Finished => flush_notifications(&mut session),
        other => bail!("Unexpected outcome on the preview step: {:?}", other),
    }

    let summary = session.summary();
    if let Some(summary_path) = &args.summary {
        summary.save_to_file(summary_path)?;
        println!("Session summary written to {}", summary_path.display());
    }
    Ok(summary)
}

/// Score a plain-text resume against a job description.
pub fn run_score(resume: &Path, job_description: &Path, config: &WizardConfig) -> Result<AtsReport> {
    let resume_text = read_text(resume)?;
    let job_text = read_text(job_description)?;
    if job_text.trim().is_empty() {
        bail!("Please enter a job description.");
    }
    Ok(KeywordAtsScorer::new(config.keyword_limit).score(&job_text, &resume_text))
}

/// Human-readable ATS report.
pub fn format_report(report: &AtsReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ATS score: {}% ({})", report.score, report.rating());
    let _ = writeln!(
        out,
        "Keywords matched: {}/{}",
        report.matched_count(),
        report.keyword_matches.len()
    );
    for m in &report.keyword_matches {
        let _ = writeln!(out, "  [{}] {}", if m.found { "x" } else { " " }, m.keyword);
    }
    for line in &report.feedback {
        let _ = writeln!(out, "- {}", line);
    }
    out
}

/// Template catalog as a table.
pub fn format_templates() -> String {
    let mut out = String::new();
    for t in TEMPLATES {
        let _ = writeln!(out, "{:<14} {:<14} {}", t.id, t.name, t.description);
    }
    out
}

/// Plan catalog with prices and features.
pub fn format_plans() -> String {
    let mut out = String::new();
    for p in PLANS {
        let _ = writeln!(
            out,
            "{:<10} {:<10} ${} {} - {} ({})",
            p.id, p.name, p.price_usd, p.billing, p.allowance, p.description
        );
        for feature in p.features {
            let _ = writeln!(out, "    * {}", feature);
        }
    }
    out
}

/// Worst-case optimizer run time for `config`.
fn build_duration(config: &WizardConfig) -> Duration {
    let ticks = 100u32.div_ceil(u32::from(config.build_step_percent.max(1)));
    config.build_tick() * ticks
}

fn continue_to(session: &mut WizardSession, expected: WizardStep) -> Result<()> {
    let outcome = session.advance()?;
    flush_notifications(session);
    match outcome {
        AdvanceOutcome::Moved { to, .. } if to == expected => Ok(()),
        AdvanceOutcome::Blocked(failure) => bail!("{}", failure),
        other => bail!("Expected to reach '{}', got {:?}", expected, other),
    }
}

fn flush_notifications(session: &mut WizardSession) {
    for note in session.take_notifications() {
        match note.level {
            NotificationLevel::Error | NotificationLevel::Warning => {
                eprintln!("✗ {}", note.message)
            }
            NotificationLevel::Success => println!("✓ {}", note.message),
            NotificationLevel::Info => println!("  {}", note.message),
        }
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
}

/// Cancel the session on Ctrl-C. Only one handler can be installed per
/// process; later sessions fall back to the default behaviour.
fn install_interrupt_handler(token: CancelToken) {
    if let Err(e) = ctrlc::set_handler(move || token.cancel()) {
        tracing::warn!("Ctrl-C handler not installed: {}", e);
    }
}
