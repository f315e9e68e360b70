//! Wizard flow tests
//!
//! Drive the controller directly, feeding collaborator outcomes by hand,
//! and check the step order, gating and progress figures.

use resume_wizard::collaborators::{
    KeywordAtsScorer, AtsScorer, OptimizationError, OptimizedResume, PaymentOutcome,
    PaymentReceipt, UploadRejection, UploadedResume,
};
use resume_wizard::catalog::{PlanId, TemplateId};
use resume_wizard::types::{NotificationLevel, ResumeFormat};
use resume_wizard::wizard::{
    AdvanceOutcome, PaymentStatus, ProgressProjector, StepMarker, TransitionError,
    ValidationFailure, WizardController, WizardStep,
};

const JOB: &str = "Senior React Developer with 5 years experience";

fn uploaded() -> UploadedResume {
    UploadedResume {
        file_name: "cv.pdf".to_string(),
        format: ResumeFormat::Pdf,
        size_bytes: 2048,
        extracted_text: "React developer, 5 years building web apps".to_string(),
    }
}

fn receipt(plan: &str) -> PaymentReceipt {
    PaymentReceipt {
        plan: PlanId::new(plan).unwrap(),
        amount_usd: 5,
        reference: "TEST-1".to_string(),
        paid_at: 0,
    }
}

fn optimized() -> OptimizedResume {
    OptimizedResume {
        template: TemplateId::new("modern").unwrap(),
        content: "React developer\n\nSKILLS\nReact".to_string(),
        skills: vec!["React".to_string()],
        added_keywords: vec!["senior".to_string()],
    }
}

fn moved_to(outcome: AdvanceOutcome) -> WizardStep {
    match outcome {
        AdvanceOutcome::Moved { to, .. } => to,
        other => panic!("expected a move, got {:?}", other),
    }
}

/// Upload, job description and template, ending on AtsScore.
fn walk_to_score(controller: &mut WizardController) {
    controller.apply_upload(Ok(uploaded())).unwrap();
    moved_to(controller.advance().unwrap());
    controller.set_job_description(JOB).unwrap();
    moved_to(controller.advance().unwrap());
    controller.select_template("modern").unwrap();
    assert_eq!(moved_to(controller.advance().unwrap()), WizardStep::AtsScore);
}

fn walk_to_payment(controller: &mut WizardController) {
    walk_to_score(controller);
    assert_eq!(moved_to(controller.advance().unwrap()), WizardStep::Payment);
}

#[test]
fn test_full_scenario_reaches_preview() {
    let mut controller = WizardController::new();
    controller.apply_upload(Ok(uploaded())).unwrap();
    assert_eq!(moved_to(controller.advance().unwrap()), WizardStep::JobDescription);

    controller.set_job_description(JOB).unwrap();
    assert_eq!(moved_to(controller.advance().unwrap()), WizardStep::Template);

    controller.select_template("modern").unwrap();
    assert_eq!(moved_to(controller.advance().unwrap()), WizardStep::AtsScore);

    // The score step never blocks
    let report = KeywordAtsScorer::default().score(JOB, controller.state().resume_text());
    controller.record_ats_report(report).unwrap();
    assert_eq!(moved_to(controller.advance().unwrap()), WizardStep::Payment);

    let ticket = controller.choose_plan("basic").unwrap();
    assert!(!controller.state().is_paid());
    controller
        .resolve_payment(ticket, PaymentOutcome::Confirmed(receipt("basic")))
        .unwrap();
    assert!(controller.state().is_paid());
    assert_eq!(controller.current_step(), WizardStep::Building);

    let job = controller.begin_build().unwrap();
    assert_eq!(job.request.job_description, JOB);
    assert_eq!(job.request.template.as_str(), "modern");
    for percent in (0..=100).step_by(10) {
        assert_eq!(controller.report_build_progress(job.ticket, percent).unwrap(), percent);
    }
    controller.complete_build(job.ticket, optimized()).unwrap();

    assert_eq!(controller.current_step(), WizardStep::Preview);
    assert_eq!(ProgressProjector::step_number(controller.state()), 7);
    assert_eq!(controller.progress().percent, 100.0);
}

#[test]
fn test_advance_follows_step_order() {
    let mut controller = WizardController::new();
    let mut visited = vec![controller.current_step()];
    walk_to_payment(&mut controller);
    visited.push(WizardStep::JobDescription);
    visited.push(WizardStep::Template);
    visited.push(WizardStep::AtsScore);
    visited.push(controller.current_step());

    let expected: Vec<_> = WizardStep::SEQUENCE[..5].to_vec();
    assert_eq!(visited, expected);
    for pair in visited.windows(2) {
        assert_eq!(pair[0].next(), Some(pair[1]));
    }
}

#[test]
fn test_retreat_moves_one_back_and_keeps_data() {
    let mut controller = WizardController::new();
    walk_to_score(&mut controller);

    assert_eq!(controller.retreat().unwrap(), Some(WizardStep::Template));
    assert_eq!(controller.retreat().unwrap(), Some(WizardStep::JobDescription));
    assert_eq!(controller.retreat().unwrap(), Some(WizardStep::Upload));
    assert_eq!(controller.retreat().unwrap(), None);
    assert_eq!(controller.current_step(), WizardStep::Upload);

    let state = controller.state();
    assert!(state.has_resume());
    assert_eq!(state.job_description, JOB);
    assert_eq!(state.template.as_ref().map(|t| t.as_str()), Some("modern"));
    assert_eq!(controller.furthest_step(), WizardStep::AtsScore);
}

#[test]
fn test_upload_gate() {
    let mut controller = WizardController::new();
    assert_eq!(
        controller.advance().unwrap(),
        AdvanceOutcome::Blocked(ValidationFailure::MissingResume)
    );
    assert_eq!(controller.current_step(), WizardStep::Upload);
    let note = controller.last_notification().unwrap();
    assert_eq!(note.level, NotificationLevel::Error);
    assert_eq!(note.message, "Please upload a resume or create a new one.");
}

#[test]
fn test_rejected_upload_keeps_previous_resume() {
    let mut controller = WizardController::new();
    controller.apply_upload(Ok(uploaded())).unwrap();
    controller
        .apply_upload(Err(UploadRejection::InvalidType {
            file_name: "cv.png".to_string(),
        }))
        .unwrap();

    assert!(controller.state().has_resume());
    let messages: Vec<_> = controller
        .take_notifications()
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert_eq!(
        messages,
        vec![
            "Resume uploaded successfully!",
            "Invalid file type. Please upload a PDF or Word document."
        ]
    );
}

#[test]
fn test_whitespace_job_description_is_blocked() {
    let mut controller = WizardController::new();
    controller.paste_resume_text("Some resume").unwrap();
    controller.advance().unwrap();

    controller.set_job_description("   \n\t ").unwrap();
    assert_eq!(
        controller.advance().unwrap(),
        AdvanceOutcome::Blocked(ValidationFailure::MissingJobDescription)
    );
    assert_eq!(controller.current_step(), WizardStep::JobDescription);
    assert_eq!(
        controller.last_notification().unwrap().message,
        "Please enter a job description."
    );
}

#[test]
fn test_template_gate_and_unknown_template() {
    let mut controller = WizardController::new();
    controller.paste_resume_text("Some resume").unwrap();
    controller.advance().unwrap();
    controller.set_job_description(JOB).unwrap();
    controller.advance().unwrap();

    assert_eq!(
        controller.advance().unwrap(),
        AdvanceOutcome::Blocked(ValidationFailure::MissingTemplate)
    );
    assert_eq!(
        controller.select_template("baroque"),
        Err(TransitionError::UnknownTemplate("baroque".to_string()))
    );
    assert!(controller.state().template.is_none());
}

#[test]
fn test_progress_figures() {
    let mut controller = WizardController::new();
    let first = controller.progress();
    assert_eq!(first.step_number, 1);
    assert!((first.percent - 14.3).abs() < 0.05);
    assert_eq!(first.markers[0], StepMarker::Active);
    assert!(first.markers[1..].iter().all(|m| *m == StepMarker::Pending));

    walk_to_score(&mut controller);
    let score = controller.progress();
    assert_eq!(score.step_number, 4);
    assert_eq!(
        score.markers,
        [
            StepMarker::Done,
            StepMarker::Done,
            StepMarker::Done,
            StepMarker::Active,
            StepMarker::Pending,
            StepMarker::Pending,
            StepMarker::Pending,
        ]
    );
}

#[test]
fn test_advance_never_leaves_payment() {
    let mut controller = WizardController::new();
    walk_to_payment(&mut controller);

    assert_eq!(
        controller.advance().unwrap(),
        AdvanceOutcome::AwaitingEvent(WizardStep::Payment)
    );
    let ticket = controller.choose_plan("standard").unwrap();
    assert_eq!(
        controller.advance().unwrap(),
        AdvanceOutcome::AwaitingEvent(WizardStep::Payment)
    );
    // Choosing a plan is not paying for it
    assert_eq!(controller.state().plan.as_ref().map(|p| p.as_str()), Some("standard"));
    assert!(!controller.state().is_paid());
    assert_eq!(controller.current_step(), WizardStep::Payment);

    controller
        .resolve_payment(
            ticket,
            PaymentOutcome::Declined {
                reason: "card declined".to_string(),
            },
        )
        .unwrap();
    assert_eq!(controller.state().payment, PaymentStatus::Unpaid);
    assert_eq!(controller.current_step(), WizardStep::Payment);
    assert_eq!(
        controller.last_notification().unwrap().message,
        "Payment failed: card declined"
    );
}

#[test]
fn test_stale_payment_ticket_is_rejected() {
    let mut controller = WizardController::new();
    walk_to_payment(&mut controller);
    let first = controller.choose_plan("basic").unwrap();
    controller.cancel_payment().unwrap();
    let second = controller.choose_plan("premium").unwrap();
    assert_ne!(first, second);

    assert_eq!(
        controller.resolve_payment(first, PaymentOutcome::Confirmed(receipt("basic"))),
        Err(TransitionError::StaleTicket(first.id()))
    );
    assert_eq!(controller.pending_payment(), Some(second));
}

#[test]
fn test_second_plan_while_paying_is_refused() {
    let mut controller = WizardController::new();
    walk_to_payment(&mut controller);
    controller.choose_plan("basic").unwrap();
    assert_eq!(
        controller.choose_plan("premium"),
        Err(TransitionError::PaymentInProgress)
    );
}

#[test]
fn test_retreat_from_payment_cancels_pending() {
    let mut controller = WizardController::new();
    walk_to_payment(&mut controller);
    let ticket = controller.choose_plan("basic").unwrap();

    assert_eq!(controller.retreat().unwrap(), Some(WizardStep::AtsScore));
    assert!(matches!(controller.state().payment, PaymentStatus::Cancelled { .. }));
    assert!(
        controller
            .resolve_payment(ticket, PaymentOutcome::Confirmed(receipt("basic")))
            .is_err()
    );
    assert!(!controller.state().is_paid());
}

#[test]
fn test_build_failure_stays_on_building() {
    let mut controller = WizardController::new();
    walk_to_payment(&mut controller);
    let ticket = controller.choose_plan("basic").unwrap();
    controller
        .resolve_payment(ticket, PaymentOutcome::Confirmed(receipt("basic")))
        .unwrap();

    assert!(controller.add_skill("Leadership").unwrap());
    assert!(!controller.add_skill("  leadership ").unwrap());

    let job = controller.begin_build().unwrap();
    assert_eq!(job.request.additional_skills, vec!["Leadership"]);
    assert_eq!(controller.add_skill("Go"), Err(TransitionError::BuildInProgress));

    controller
        .fail_build(job.ticket, OptimizationError::Failed("model offline".to_string()))
        .unwrap();
    assert_eq!(controller.current_step(), WizardStep::Building);
    assert!(controller.running_build().is_none());
    assert_eq!(
        controller.last_notification().unwrap().message,
        "Optimization failed: optimizer failed: model offline"
    );

    // Retry works
    let retry = controller.begin_build().unwrap();
    controller.complete_build(retry.ticket, optimized()).unwrap();
    assert_eq!(controller.current_step(), WizardStep::Preview);
}

#[test]
fn test_progress_is_clamped_and_monotonic() {
    let mut controller = WizardController::new();
    walk_to_payment(&mut controller);
    let ticket = controller.choose_plan("basic").unwrap();
    controller
        .resolve_payment(ticket, PaymentOutcome::Confirmed(receipt("basic")))
        .unwrap();
    let job = controller.begin_build().unwrap();

    assert_eq!(controller.report_build_progress(job.ticket, 40).unwrap(), 40);
    assert_eq!(controller.report_build_progress(job.ticket, 20).unwrap(), 40);
    assert_eq!(controller.report_build_progress(job.ticket, 250).unwrap(), 100);
}

#[test]
fn test_finish_closes_the_session() {
    let mut controller = WizardController::new();
    walk_to_payment(&mut controller);
    let ticket = controller.choose_plan("basic").unwrap();
    controller
        .resolve_payment(ticket, PaymentOutcome::Confirmed(receipt("basic")))
        .unwrap();
    let job = controller.begin_build().unwrap();
    controller.complete_build(job.ticket, optimized()).unwrap();

    assert_eq!(controller.advance().unwrap(), AdvanceOutcome::Finished);
    assert!(controller.is_finished());
    assert_eq!(
        controller.last_notification().unwrap().message,
        "Resume successfully created!"
    );
    assert_eq!(controller.advance(), Err(TransitionError::SessionClosed));
    assert_eq!(controller.retreat(), Err(TransitionError::SessionClosed));
}

#[test]
fn test_edits_only_on_owning_step() {
    let mut controller = WizardController::new();
    assert!(matches!(
        controller.set_job_description(JOB),
        Err(TransitionError::WrongStep {
            expected: WizardStep::JobDescription,
            actual: WizardStep::Upload,
        })
    ));
    assert!(controller.choose_plan("basic").is_err());
    assert!(controller.begin_build().is_err());
}
