//! The wizard's single mutable record.

use serde::{Deserialize, Serialize};

use super::step::WizardStep;
use crate::catalog::{PlanId, TemplateId};
use crate::collaborators::optimizer::OptimizedResume;
use crate::collaborators::payment::PaymentReceipt;
use crate::collaborators::scoring::AtsReport;
use crate::collaborators::upload::UploadedResume;

/// Where the resume content came from. Replacing one kind with the other
/// discards the old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ResumeSource {
    Uploaded(UploadedResume),
    Pasted { text: String },
}

impl ResumeSource {
    /// True when the source carries usable content.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Uploaded(_) => true,
            Self::Pasted { text } => !text.trim().is_empty(),
        }
    }

    /// Plain text handed to the scorer and optimizer.
    pub fn text(&self) -> &str {
        match self {
            Self::Uploaded(file) => &file.extracted_text,
            Self::Pasted { text } => text,
        }
    }

    /// Short description for status lines.
    pub fn describe(&self) -> String {
        match self {
            Self::Uploaded(file) => format!("{} ({})", file.file_name, file.format),
            Self::Pasted { text } => format!("pasted text ({} chars)", text.chars().count()),
        }
    }
}

/// Handle identifying one background operation (a payment or an
/// optimization run). Results carrying any other ticket are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationTicket(pub(crate) u64);

impl OperationTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Payment lifecycle. Choosing a plan and confirming payment are separate
/// signals; only `Confirmed` counts as paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Pending {
        plan: PlanId,
        ticket: OperationTicket,
    },
    Confirmed(PaymentReceipt),
    Cancelled {
        plan: PlanId,
    },
}

impl PaymentStatus {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

/// Sub-phase of the building step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "phase", rename_all = "kebab-case")]
pub enum BuildPhase {
    /// Collecting extra skills before optimization starts
    #[default]
    Collecting,
    /// Optimizer running; `percent` is the last reported progress
    Optimizing { ticket: OperationTicket, percent: u8 },
}

impl BuildPhase {
    pub fn is_optimizing(&self) -> bool {
        matches!(self, Self::Optimizing { .. })
    }

    /// Progress of the running optimization, 0 when idle.
    pub fn percent(&self) -> u8 {
        match self {
            Self::Collecting => 0,
            Self::Optimizing { percent, .. } => *percent,
        }
    }
}

/// Everything collected during one wizard session.
///
/// Owned by [`super::WizardController`]; read it through
/// `WizardController::state()`. Fields are public so views can render them,
/// but only the controller holds a mutable reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WizardState {
    /// Current step
    pub current: WizardStep,
    /// Uploaded file or pasted text
    pub resume: Option<ResumeSource>,
    /// Free text pasted by the user
    pub job_description: String,
    /// Selected template from the catalog
    pub template: Option<TemplateId>,
    /// Plan the user picked (not proof of payment)
    pub plan: Option<PlanId>,
    /// Payment lifecycle
    pub payment: PaymentStatus,
    /// Last ATS report computed on entering the score step
    pub ats_report: Option<AtsReport>,
    /// Skills added on the building step
    pub additional_skills: Vec<String>,
    /// Building sub-phase
    pub build: BuildPhase,
    /// Result of the last successful optimization
    pub optimized: Option<OptimizedResume>,
    /// Set once the user finishes on the preview step
    pub finished: bool,
}

impl WizardState {
    /// Whether a confirmed payment is on record.
    pub fn is_paid(&self) -> bool {
        self.payment.is_confirmed()
    }

    /// Whether a usable resume has been provided.
    pub fn has_resume(&self) -> bool {
        self.resume.as_ref().is_some_and(ResumeSource::is_present)
    }

    /// Resume text, empty when none has been provided.
    pub fn resume_text(&self) -> &str {
        self.resume.as_ref().map(ResumeSource::text).unwrap_or("")
    }
}
