//! The wizard state machine.
//!
//! `WizardController` is the only thing allowed to mutate a [`WizardState`].
//! User actions (`advance`, `retreat`, data edits) and collaborator events
//! (upload result, payment outcome, optimizer progress) all go through it,
//! and every one of them is checked against the current step first.
//!
//! # Transition rules
//!
//! ```text
//! Upload --advance--> JobDescription --advance--> Template --advance--> AtsScore
//!     --advance--> Payment ==payment confirmed==> Building ==optimizer done==> Preview
//!     --advance--> finished
//! ```
//!
//! `-->` edges are taken by `advance()` when the step validator passes.
//! `==>` edges are taken only when the matching collaborator event arrives
//! with the current operation ticket; `advance()` on those steps reports
//! [`AdvanceOutcome::AwaitingEvent`] and changes nothing.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

use super::progress::{ProgressProjector, ProgressSnapshot};
use super::state::{BuildPhase, OperationTicket, PaymentStatus, ResumeSource, WizardState};
use super::step::WizardStep;
use super::validator::{StepValidator, ValidationFailure};
use crate::catalog::{PlanId, TemplateId, find_plan, find_template};
use crate::collaborators::optimizer::{OptimizationError, OptimizationRequest, OptimizedResume};
use crate::collaborators::payment::PaymentOutcome;
use crate::collaborators::scoring::AtsReport;
use crate::collaborators::upload::{UploadRejection, UploadedResume};
use crate::types::{ExportFormat, NotificationLevel};

/// Shown when the user finishes on the preview step.
pub const FINISHED_MESSAGE: &str = "Resume successfully created!";

/// Misuse of the controller: an event for the wrong step, a stale operation
/// result, or any call after the session ended.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Expected step '{expected}' but the wizard is at '{actual}'")]
    WrongStep {
        expected: WizardStep,
        actual: WizardStep,
    },

    #[error("Wizard session has ended")]
    SessionClosed,

    #[error("Unknown template '{0}'")]
    UnknownTemplate(String),

    #[error("Unknown plan '{0}'")]
    UnknownPlan(String),

    #[error("Operation #{0} is no longer current")]
    StaleTicket(u64),

    #[error("No payment is pending")]
    NoPendingPayment,

    #[error("A payment is already being processed")]
    PaymentInProgress,

    #[error("Resume optimization is already running")]
    BuildInProgress,

    #[error("Required data is missing: {0}")]
    Incomplete(#[from] ValidationFailure),
}

/// What a call to [`WizardController::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Validator passed and the wizard moved forward
    Moved { from: WizardStep, to: WizardStep },
    /// Validator refused; the message was queued as a notification
    Blocked(ValidationFailure),
    /// Step is left by a collaborator event, not by "Continue"
    AwaitingEvent(WizardStep),
    /// Terminal transition on the preview step
    Finished,
}

/// Transient user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// A started optimization: the ticket results must carry, and the input
/// to hand the optimizer.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildJob {
    pub ticket: OperationTicket,
    pub request: OptimizationRequest,
}

/// Owns the wizard state and enforces every transition.
///
/// # Example
///
/// ```
/// use resume_wizard::wizard::{AdvanceOutcome, WizardController, WizardStep};
///
/// let mut wizard = WizardController::new();
/// assert!(matches!(wizard.advance(), Ok(AdvanceOutcome::Blocked(_))));
///
/// wizard.paste_resume_text("Senior engineer, 8 years of Rust").unwrap();
/// wizard.advance().unwrap();
/// assert_eq!(wizard.current_step(), WizardStep::JobDescription);
/// ```
#[derive(Debug, Default)]
pub struct WizardController {
    state: WizardState,
    notifications: VecDeque<Notification>,
    /// Furthest step reached in this session
    furthest: WizardStep,
    last_ticket: u64,
    closed: bool,
}

impl WizardController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of the collected data.
    #[inline]
    pub fn state(&self) -> &WizardState {
        &self.state
    }

    #[inline]
    pub fn current_step(&self) -> WizardStep {
        self.state.current
    }

    /// Furthest step reached, even if the user has since gone back.
    pub fn furthest_step(&self) -> WizardStep {
        self.furthest
    }

    pub fn progress(&self) -> ProgressSnapshot {
        ProgressProjector::snapshot(&self.state)
    }

    /// True once `close()` was called or the user finished on Preview.
    pub fn is_closed(&self) -> bool {
        self.closed || self.state.finished
    }

    pub fn is_finished(&self) -> bool {
        self.state.finished
    }

    // ---------------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------------

    /// User pressed "Continue" (or "Finish" on the last step).
    pub fn advance(&mut self) -> Result<AdvanceOutcome, TransitionError> {
        self.ensure_open()?;
        let from = self.state.current;

        if from.is_event_driven() {
            tracing::debug!(step = from.id(), "Advance ignored: waiting for collaborator");
            return Ok(AdvanceOutcome::AwaitingEvent(from));
        }

        if from.is_terminal() {
            self.state.finished = true;
            tracing::info!("Wizard finished");
            self.notify(NotificationLevel::Success, FINISHED_MESSAGE);
            return Ok(AdvanceOutcome::Finished);
        }

        if let Err(failure) = StepValidator::check(from, &self.state) {
            tracing::debug!(step = from.id(), %failure, "Advance blocked");
            self.notify(NotificationLevel::Error, failure.to_string());
            return Ok(AdvanceOutcome::Blocked(failure));
        }

        // Non-terminal steps always have a successor
        let Some(to) = from.next() else {
            return Ok(AdvanceOutcome::Finished);
        };
        self.move_to(to);
        Ok(AdvanceOutcome::Moved { from, to })
    }

    /// User pressed "Back". Returns the step moved to, or `None` at Upload.
    ///
    /// Entered data is never cleared. Work owned by the step being left is
    /// abandoned: a pending payment becomes cancelled and a running
    /// optimization is dropped (its later results are stale).
    pub fn retreat(&mut self) -> Result<Option<WizardStep>, TransitionError> {
        self.ensure_open()?;
        let from = self.state.current;
        let Some(to) = from.previous() else {
            return Ok(None);
        };

        match from {
            WizardStep::Payment => self.abandon_payment(),
            WizardStep::Building => self.abandon_build(),
            _ => {}
        }

        self.move_to(to);
        Ok(Some(to))
    }

    fn move_to(&mut self, to: WizardStep) {
        tracing::info!(from = self.state.current.id(), to = to.id(), "Step transition");
        self.state.current = to;
        if to > self.furthest {
            self.furthest = to;
        }
    }

    // ---------------------------------------------------------------------
    // Upload
    // ---------------------------------------------------------------------

    /// Apply the upload handler's verdict. A rejection keeps whatever resume
    /// was there before and queues the rejection message.
    pub fn apply_upload(
        &mut self,
        result: Result<UploadedResume, UploadRejection>,
    ) -> Result<(), TransitionError> {
        self.ensure_on(WizardStep::Upload)?;
        match result {
            Ok(file) => {
                tracing::info!(file = %file.file_name, "Resume uploaded");
                self.state.resume = Some(ResumeSource::Uploaded(file));
                self.notify(NotificationLevel::Success, "Resume uploaded successfully!");
            }
            Err(rejection) => {
                tracing::warn!(%rejection, "Upload rejected");
                self.notify(NotificationLevel::Error, rejection.to_string());
            }
        }
        Ok(())
    }

    /// Use pasted text instead of a file.
    pub fn paste_resume_text(&mut self, text: impl Into<String>) -> Result<(), TransitionError> {
        self.ensure_on(WizardStep::Upload)?;
        self.state.resume = Some(ResumeSource::Pasted { text: text.into() });
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Job description / template / score
    // ---------------------------------------------------------------------

    pub fn set_job_description(&mut self, text: impl Into<String>) -> Result<(), TransitionError> {
        self.ensure_on(WizardStep::JobDescription)?;
        self.state.job_description = text.into();
        Ok(())
    }

    /// Select a template from the catalog.
    pub fn select_template(&mut self, id: &str) -> Result<(), TransitionError> {
        self.ensure_on(WizardStep::Template)?;
        let template =
            find_template(id.trim()).ok_or_else(|| TransitionError::UnknownTemplate(id.to_string()))?;
        self.state.template = TemplateId::new(template.id);
        tracing::debug!(template = template.id, "Template selected");
        Ok(())
    }

    /// Store the scorer's report for the score step.
    pub fn record_ats_report(&mut self, report: AtsReport) -> Result<(), TransitionError> {
        self.ensure_on(WizardStep::AtsScore)?;
        tracing::info!(score = report.score, "ATS report recorded");
        self.state.ats_report = Some(report);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Payment
    // ---------------------------------------------------------------------

    /// Record the chosen plan and open a pending payment for it.
    ///
    /// Choosing a plan is not paying for it; only
    /// [`Self::resolve_payment`] with a confirmation moves on.
    pub fn choose_plan(&mut self, id: &str) -> Result<OperationTicket, TransitionError> {
        self.ensure_on(WizardStep::Payment)?;
        if self.state.payment.is_pending() {
            return Err(TransitionError::PaymentInProgress);
        }
        let plan = find_plan(id.trim())
            .and_then(|p| PlanId::new(p.id))
            .ok_or_else(|| TransitionError::UnknownPlan(id.to_string()))?;

        let ticket = self.issue_ticket();
        tracing::info!(plan = %plan, ticket = ticket.id(), "Plan chosen, payment pending");
        self.state.plan = Some(plan.clone());
        self.state.payment = PaymentStatus::Pending { plan, ticket };
        Ok(ticket)
    }

    /// Apply the payment processor's outcome for `ticket`.
    pub fn resolve_payment(
        &mut self,
        ticket: OperationTicket,
        outcome: PaymentOutcome,
    ) -> Result<(), TransitionError> {
        self.ensure_open()?;
        let plan = match &self.state.payment {
            PaymentStatus::Pending { plan, ticket: t } if *t == ticket => plan.clone(),
            _ => {
                tracing::debug!(ticket = ticket.id(), "Discarding stale payment result");
                return Err(TransitionError::StaleTicket(ticket.id()));
            }
        };
        self.ensure_on(WizardStep::Payment)?;

        match outcome {
            PaymentOutcome::Confirmed(receipt) => {
                let name = find_plan(plan.as_str()).map_or(plan.as_str(), |p| p.name);
                let message = format!("Successfully purchased {} plan!", name);
                tracing::info!(plan = %plan, reference = %receipt.reference, "Payment confirmed");
                self.state.payment = PaymentStatus::Confirmed(receipt);
                self.state.build = BuildPhase::Collecting;
                self.notify(NotificationLevel::Success, message);
                self.move_to(WizardStep::Building);
            }
            PaymentOutcome::Declined { reason } => {
                tracing::warn!(plan = %plan, %reason, "Payment declined");
                self.state.payment = PaymentStatus::Unpaid;
                self.notify(NotificationLevel::Error, format!("Payment failed: {}", reason));
            }
            PaymentOutcome::Cancelled => {
                tracing::info!(plan = %plan, "Payment cancelled by processor");
                self.state.payment = PaymentStatus::Cancelled { plan };
                self.notify(NotificationLevel::Info, "Payment cancelled.");
            }
        }
        Ok(())
    }

    /// User abandoned the pending payment without leaving the step.
    pub fn cancel_payment(&mut self) -> Result<(), TransitionError> {
        self.ensure_on(WizardStep::Payment)?;
        if !self.state.payment.is_pending() {
            return Err(TransitionError::NoPendingPayment);
        }
        self.abandon_payment();
        self.notify(NotificationLevel::Info, "Payment cancelled.");
        Ok(())
    }

    /// Ticket of the pending payment, if any.
    pub fn pending_payment(&self) -> Option<OperationTicket> {
        match &self.state.payment {
            PaymentStatus::Pending { ticket, .. } => Some(*ticket),
            _ => None,
        }
    }

    fn abandon_payment(&mut self) {
        if let PaymentStatus::Pending { plan, ticket } = &self.state.payment {
            tracing::info!(ticket = ticket.id(), "Pending payment abandoned");
            let plan = plan.clone();
            self.state.payment = PaymentStatus::Cancelled { plan };
        }
    }

    // ---------------------------------------------------------------------
    // Building
    // ---------------------------------------------------------------------

    /// Add a skill before optimization starts. Returns `false` for blank or
    /// duplicate (case-insensitive) skills.
    pub fn add_skill(&mut self, skill: &str) -> Result<bool, TransitionError> {
        self.ensure_collecting()?;
        let skill = skill.trim();
        if skill.is_empty()
            || self
                .state
                .additional_skills
                .iter()
                .any(|s| s.eq_ignore_ascii_case(skill))
        {
            return Ok(false);
        }
        self.state.additional_skills.push(skill.to_string());
        Ok(true)
    }

    /// Remove a previously added skill. Returns whether it was present.
    pub fn remove_skill(&mut self, skill: &str) -> Result<bool, TransitionError> {
        self.ensure_collecting()?;
        let before = self.state.additional_skills.len();
        self.state
            .additional_skills
            .retain(|s| !s.eq_ignore_ascii_case(skill.trim()));
        Ok(self.state.additional_skills.len() != before)
    }

    /// Start optimization with everything collected so far.
    pub fn begin_build(&mut self) -> Result<BuildJob, TransitionError> {
        self.ensure_collecting()?;
        let template = self
            .state
            .template
            .clone()
            .ok_or(TransitionError::Incomplete(ValidationFailure::MissingTemplate))?;

        let ticket = self.issue_ticket();
        let request = OptimizationRequest {
            resume_text: self.state.resume_text().to_string(),
            job_description: self.state.job_description.clone(),
            template,
            additional_skills: self.state.additional_skills.clone(),
        };
        self.state.build = BuildPhase::Optimizing { ticket, percent: 0 };
        tracing::info!(ticket = ticket.id(), skills = request.additional_skills.len(), "Optimization started");
        Ok(BuildJob { ticket, request })
    }

    /// Record optimizer progress. Values are clamped to 100 and never move
    /// backwards.
    pub fn report_build_progress(
        &mut self,
        ticket: OperationTicket,
        percent: u8,
    ) -> Result<u8, TransitionError> {
        self.ensure_build_ticket(ticket)?;
        let current = self.state.build.percent();
        let next = percent.min(100).max(current);
        self.state.build = BuildPhase::Optimizing {
            ticket,
            percent: next,
        };
        Ok(next)
    }

    /// Optimizer finished: keep the result and move to Preview.
    pub fn complete_build(
        &mut self,
        ticket: OperationTicket,
        optimized: OptimizedResume,
    ) -> Result<(), TransitionError> {
        self.ensure_build_ticket(ticket)?;
        self.state.optimized = Some(optimized);
        self.state.build = BuildPhase::Collecting;
        self.notify(
            NotificationLevel::Success,
            "Your resume has been successfully optimized!",
        );
        self.move_to(WizardStep::Preview);
        Ok(())
    }

    /// Optimizer failed or was cancelled. Stays on Building so the user can
    /// retry.
    pub fn fail_build(
        &mut self,
        ticket: OperationTicket,
        error: OptimizationError,
    ) -> Result<(), TransitionError> {
        self.ensure_build_ticket(ticket)?;
        self.state.build = BuildPhase::Collecting;
        match error {
            OptimizationError::Cancelled => {
                self.notify(NotificationLevel::Info, "Optimization cancelled.");
            }
            other => {
                tracing::warn!(error = %other, "Optimization failed");
                self.notify(NotificationLevel::Error, format!("Optimization failed: {}", other));
            }
        }
        Ok(())
    }

    /// Ticket of the running optimization, if any.
    pub fn running_build(&self) -> Option<OperationTicket> {
        match self.state.build {
            BuildPhase::Optimizing { ticket, .. } => Some(ticket),
            BuildPhase::Collecting => None,
        }
    }

    fn abandon_build(&mut self) {
        if let BuildPhase::Optimizing { ticket, percent } = self.state.build {
            tracing::info!(ticket = ticket.id(), percent, "Running optimization abandoned");
            self.state.build = BuildPhase::Collecting;
        }
    }

    fn ensure_collecting(&self) -> Result<(), TransitionError> {
        self.ensure_on(WizardStep::Building)?;
        if self.state.build.is_optimizing() {
            return Err(TransitionError::BuildInProgress);
        }
        Ok(())
    }

    fn ensure_build_ticket(&self, ticket: OperationTicket) -> Result<(), TransitionError> {
        self.ensure_open()?;
        match self.state.build {
            BuildPhase::Optimizing { ticket: t, .. }
                if t == ticket && self.state.current == WizardStep::Building =>
            {
                Ok(())
            }
            _ => {
                tracing::debug!(ticket = ticket.id(), "Discarding stale optimizer event");
                Err(TransitionError::StaleTicket(ticket.id()))
            }
        }
    }

    // ---------------------------------------------------------------------
    // Preview
    // ---------------------------------------------------------------------

    /// Note that the optimized resume was downloaded in `format`.
    pub fn record_download(&mut self, format: ExportFormat) -> Result<(), TransitionError> {
        self.ensure_on(WizardStep::Preview)?;
        tracing::info!(%format, "Resume downloaded");
        self.notify(
            NotificationLevel::Success,
            format!("Resume downloaded as {}", format.extension().to_uppercase()),
        );
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Session lifetime and notifications
    // ---------------------------------------------------------------------

    /// End the session. Pending work is abandoned and every later call
    /// fails with [`TransitionError::SessionClosed`].
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.abandon_payment();
        self.abandon_build();
        self.closed = true;
        tracing::info!(step = self.state.current.id(), "Wizard session closed");
    }

    /// Drain queued notifications, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    /// Most recent notification without draining the queue.
    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifications.back()
    }

    fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push_back(Notification {
            level,
            message: message.into(),
        });
    }

    fn issue_ticket(&mut self) -> OperationTicket {
        self.last_ticket += 1;
        OperationTicket(self.last_ticket)
    }

    fn ensure_open(&self) -> Result<(), TransitionError> {
        if self.is_closed() {
            Err(TransitionError::SessionClosed)
        } else {
            Ok(())
        }
    }

    fn ensure_on(&self, expected: WizardStep) -> Result<(), TransitionError> {
        self.ensure_open()?;
        if self.state.current == expected {
            Ok(())
        } else {
            Err(TransitionError::WrongStep {
                expected,
                actual: self.state.current,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::payment::PaymentReceipt;
    use crate::types::ResumeFormat;

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
            content: "Optimized".to_string(),
            skills: Vec::new(),
            added_keywords: Vec::new(),
        }
    }

    /// Walk a fresh controller up to the payment step.
    fn at_payment() -> WizardController {
        let mut wizard = WizardController::new();
        wizard.paste_resume_text("React developer").unwrap();
        wizard.advance().unwrap();
        wizard.set_job_description("Senior React Developer").unwrap();
        wizard.advance().unwrap();
        wizard.select_template("modern").unwrap();
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        assert_eq!(wizard.current_step(), WizardStep::Payment);
        wizard
    }

    fn at_building() -> WizardController {
        let mut wizard = at_payment();
        let ticket = wizard.choose_plan("basic").unwrap();
        wizard
            .resolve_payment(ticket, PaymentOutcome::Confirmed(receipt("basic")))
            .unwrap();
        assert_eq!(wizard.current_step(), WizardStep::Building);
        wizard
    }

    #[test]
    fn test_new_controller_starts_at_upload() {
        let wizard = WizardController::new();
        assert_eq!(wizard.current_step(), WizardStep::Upload);
        assert!(!wizard.is_closed());
        assert_eq!(wizard.progress().step_number, 1);
    }

    #[test]
    fn test_blocked_advance_queues_message() {
        let mut wizard = WizardController::new();
        let outcome = wizard.advance().unwrap();
        assert_eq!(outcome, AdvanceOutcome::Blocked(ValidationFailure::MissingResume));
        assert_eq!(wizard.current_step(), WizardStep::Upload);

        let notes = wizard.take_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Error);
        assert_eq!(notes[0].message, "Please upload a resume or create a new one.");
        assert!(wizard.take_notifications().is_empty());
    }

    #[test]
    fn test_upload_rejection_keeps_previous_resume() {
        let mut wizard = WizardController::new();
        wizard
            .apply_upload(Ok(UploadedResume {
                file_name: "cv.pdf".to_string(),
                format: ResumeFormat::Pdf,
                size_bytes: 10,
                extracted_text: "Rust".to_string(),
            }))
            .unwrap();
        wizard
            .apply_upload(Err(UploadRejection::InvalidType {
                file_name: "cv.txt".to_string(),
            }))
            .unwrap();

        assert!(matches!(
            wizard.state().resume,
            Some(ResumeSource::Uploaded(_))
        ));
        let notes = wizard.take_notifications();
        assert_eq!(notes[0].level, NotificationLevel::Success);
        assert_eq!(notes[1].level, NotificationLevel::Error);
    }

    #[test]
    fn test_edit_on_wrong_step_is_rejected() {
        let mut wizard = WizardController::new();
        let err = wizard.set_job_description("anything").unwrap_err();
        assert_eq!(
            err,
            TransitionError::WrongStep {
                expected: WizardStep::JobDescription,
                actual: WizardStep::Upload,
            }
        );
    }

    #[test]
    fn test_unknown_template_rejected() {
        let mut wizard = WizardController::new();
        wizard.paste_resume_text("text").unwrap();
        wizard.advance().unwrap();
        wizard.set_job_description("job").unwrap();
        wizard.advance().unwrap();
        assert_eq!(
            wizard.select_template("retro"),
            Err(TransitionError::UnknownTemplate("retro".to_string()))
        );
        assert!(wizard.state().template.is_none());
    }

    #[test]
    fn test_advance_at_payment_awaits_event() {
        let mut wizard = at_payment();
        assert_eq!(
            wizard.advance().unwrap(),
            AdvanceOutcome::AwaitingEvent(WizardStep::Payment)
        );
        wizard.choose_plan("basic").unwrap();
        assert_eq!(
            wizard.advance().unwrap(),
            AdvanceOutcome::AwaitingEvent(WizardStep::Payment)
        );
        assert_eq!(wizard.current_step(), WizardStep::Payment);
        assert!(!wizard.state().is_paid());
        assert_eq!(wizard.state().plan.as_ref().map(PlanId::as_str), Some("basic"));
    }

    #[test]
    fn test_second_plan_while_pending_rejected() {
        let mut wizard = at_payment();
        wizard.choose_plan("basic").unwrap();
        assert_eq!(
            wizard.choose_plan("premium"),
            Err(TransitionError::PaymentInProgress)
        );
    }

    #[test]
    fn test_unknown_plan_rejected() {
        let mut wizard = at_payment();
        assert_eq!(
            wizard.choose_plan("gold"),
            Err(TransitionError::UnknownPlan("gold".to_string()))
        );
    }

    #[test]
    fn test_declined_payment_stays_on_step() {
        let mut wizard = at_payment();
        let ticket = wizard.choose_plan("standard").unwrap();
        wizard
            .resolve_payment(
                ticket,
                PaymentOutcome::Declined {
                    reason: "card declined".to_string(),
                },
            )
            .unwrap();
        assert_eq!(wizard.current_step(), WizardStep::Payment);
        assert_eq!(wizard.state().payment, PaymentStatus::Unpaid);
        assert_eq!(
            wizard.last_notification().map(|n| n.message.as_str()),
            Some("Payment failed: card declined")
        );
    }

    #[test]
    fn test_retreat_from_payment_cancels_pending() {
        let mut wizard = at_payment();
        let ticket = wizard.choose_plan("basic").unwrap();
        assert_eq!(wizard.retreat().unwrap(), Some(WizardStep::AtsScore));
        assert!(matches!(
            wizard.state().payment,
            PaymentStatus::Cancelled { .. }
        ));

        let late = wizard.resolve_payment(ticket, PaymentOutcome::Confirmed(receipt("basic")));
        assert_eq!(late, Err(TransitionError::StaleTicket(ticket.id())));
        assert_eq!(wizard.current_step(), WizardStep::AtsScore);
    }

    #[test]
    fn test_cancel_payment_requires_pending() {
        let mut wizard = at_payment();
        assert_eq!(wizard.cancel_payment(), Err(TransitionError::NoPendingPayment));
        wizard.choose_plan("basic").unwrap();
        wizard.cancel_payment().unwrap();
        assert!(wizard.pending_payment().is_none());
        // A new plan can be chosen afterwards
        assert!(wizard.choose_plan("premium").is_ok());
    }

    #[test]
    fn test_confirmed_payment_moves_to_building() {
        let wizard = at_building();
        assert!(wizard.state().is_paid());
        assert_eq!(wizard.state().build, BuildPhase::Collecting);
    }

    #[test]
    fn test_skills_dedup_and_remove() {
        let mut wizard = at_building();
        assert!(wizard.add_skill("Python").unwrap());
        assert!(!wizard.add_skill("python").unwrap());
        assert!(!wizard.add_skill("   ").unwrap());
        assert!(wizard.add_skill("Leadership").unwrap());
        assert!(wizard.remove_skill("PYTHON").unwrap());
        assert!(!wizard.remove_skill("Python").unwrap());
        assert_eq!(wizard.state().additional_skills, vec!["Leadership"]);
    }

    #[test]
    fn test_build_progress_is_clamped_and_monotonic() {
        let mut wizard = at_building();
        let job = wizard.begin_build().unwrap();
        assert_eq!(job.request.template.as_str(), "modern");
        assert_eq!(wizard.report_build_progress(job.ticket, 40).unwrap(), 40);
        assert_eq!(wizard.report_build_progress(job.ticket, 20).unwrap(), 40);
        assert_eq!(wizard.report_build_progress(job.ticket, 250).unwrap(), 100);
    }

    #[test]
    fn test_skills_locked_while_optimizing() {
        let mut wizard = at_building();
        wizard.begin_build().unwrap();
        assert_eq!(wizard.add_skill("Rust"), Err(TransitionError::BuildInProgress));
        assert_eq!(
            wizard.begin_build().map(|j| j.ticket),
            Err(TransitionError::BuildInProgress)
        );
    }

    #[test]
    fn test_complete_build_moves_to_preview() {
        let mut wizard = at_building();
        let job = wizard.begin_build().unwrap();
        wizard.complete_build(job.ticket, optimized()).unwrap();
        assert_eq!(wizard.current_step(), WizardStep::Preview);
        assert!(wizard.state().optimized.is_some());

        wizard.take_notifications();
        wizard.record_download(ExportFormat::Docx).unwrap();
        assert_eq!(
            wizard.last_notification().map(|n| n.message.as_str()),
            Some("Resume downloaded as DOCX")
        );
    }

    #[test]
    fn test_failed_build_allows_retry() {
        let mut wizard = at_building();
        let job = wizard.begin_build().unwrap();
        wizard
            .fail_build(job.ticket, OptimizationError::Failed("timeout".to_string()))
            .unwrap();
        assert_eq!(wizard.current_step(), WizardStep::Building);
        let retry = wizard.begin_build().unwrap();
        assert_ne!(retry.ticket, job.ticket);
        assert_eq!(
            wizard.report_build_progress(job.ticket, 10),
            Err(TransitionError::StaleTicket(job.ticket.id()))
        );
    }

    #[test]
    fn test_retreat_from_building_invalidates_run() {
        let mut wizard = at_building();
        let job = wizard.begin_build().unwrap();
        assert_eq!(wizard.retreat().unwrap(), Some(WizardStep::Payment));
        assert_eq!(
            wizard.complete_build(job.ticket, optimized()),
            Err(TransitionError::StaleTicket(job.ticket.id()))
        );
        assert!(wizard.state().optimized.is_none());
        // Payment record survives going back
        assert!(wizard.state().is_paid());
    }

    #[test]
    fn test_finish_on_preview_closes_session() {
        let mut wizard = at_building();
        let job = wizard.begin_build().unwrap();
        wizard.complete_build(job.ticket, optimized()).unwrap();
        wizard.take_notifications();

        assert_eq!(wizard.advance().unwrap(), AdvanceOutcome::Finished);
        assert!(wizard.is_finished());
        assert_eq!(
            wizard.take_notifications()[0].message,
            FINISHED_MESSAGE.to_string()
        );
        assert_eq!(wizard.advance(), Err(TransitionError::SessionClosed));
        assert_eq!(wizard.retreat(), Err(TransitionError::SessionClosed));
    }

    #[test]
    fn test_close_blocks_mutation_and_abandons_work() {
        let mut wizard = at_payment();
        let ticket = wizard.choose_plan("basic").unwrap();
        wizard.close();
        assert!(wizard.is_closed());
        assert_eq!(
            wizard.resolve_payment(ticket, PaymentOutcome::Confirmed(receipt("basic"))),
            Err(TransitionError::SessionClosed)
        );
        assert!(!wizard.state().payment.is_pending());
        assert_eq!(wizard.current_step(), WizardStep::Payment);
    }

    #[test]
    fn test_furthest_step_survives_retreat() {
        let mut wizard = at_payment();
        wizard.retreat().unwrap();
        wizard.retreat().unwrap();
        assert_eq!(wizard.current_step(), WizardStep::Template);
        assert_eq!(wizard.furthest_step(), WizardStep::Payment);
    }
}
