//! Per-step exit guards.

use thiserror::Error;

use super::state::WizardState;
use super::step::WizardStep;

/// Why the user may not leave the current step yet.
///
/// The `Display` text is the message shown to the user.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("Please upload a resume or create a new one.")]
    MissingResume,

    #[error("Please enter a job description.")]
    MissingJobDescription,

    #[error("Please select a template.")]
    MissingTemplate,
}

impl ValidationFailure {
    /// Step whose guard produced this failure.
    pub fn step(self) -> WizardStep {
        match self {
            Self::MissingResume => WizardStep::Upload,
            Self::MissingJobDescription => WizardStep::JobDescription,
            Self::MissingTemplate => WizardStep::Template,
        }
    }
}

/// Pure exit predicates, one per step.
///
/// `Payment` and `Building` always pass here: they are gated by collaborator
/// events in the controller, not by collected data.
pub struct StepValidator;

impl StepValidator {
    /// Check whether `step` may be left given `state`.
    pub fn check(step: WizardStep, state: &WizardState) -> Result<(), ValidationFailure> {
        match step {
            WizardStep::Upload => {
                if state.has_resume() {
                    Ok(())
                } else {
                    Err(ValidationFailure::MissingResume)
                }
            }
            WizardStep::JobDescription => {
                if state.job_description.trim().is_empty() {
                    Err(ValidationFailure::MissingJobDescription)
                } else {
                    Ok(())
                }
            }
            WizardStep::Template => match &state.template {
                Some(id) if !id.as_str().is_empty() => Ok(()),
                _ => Err(ValidationFailure::MissingTemplate),
            },
            WizardStep::AtsScore
            | WizardStep::Payment
            | WizardStep::Building
            | WizardStep::Preview => Ok(()),
        }
    }

    /// Boolean form of [`Self::check`].
    pub fn can_leave(step: WizardStep, state: &WizardState) -> bool {
        Self::check(step, state).is_ok()
    }
}
