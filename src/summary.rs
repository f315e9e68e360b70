//! Machine-readable record of how far a session got.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::{PlanId, TemplateId};
use crate::collaborators::payment::PaymentReceipt;
use crate::wizard::{PaymentStatus, WizardController, WizardStep};

/// Snapshot of a wizard session, written by `walkthrough --summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub current_step: WizardStep,
    pub furthest_step: WizardStep,
    /// Number of distinct steps reached (1-7)
    pub steps_reached: usize,
    pub finished: bool,
    /// "cv.pdf (pdf)" or "pasted text (N chars)"
    pub resume: Option<String>,
    pub template: Option<TemplateId>,
    pub plan: Option<PlanId>,
    pub receipt: Option<PaymentReceipt>,
    pub ats_score: Option<u8>,
    pub additional_skills: Vec<String>,
    pub added_keywords: Vec<String>,
    pub exports: Vec<PathBuf>,
}

impl SessionSummary {
    pub fn from_controller(controller: &WizardController, exports: &[PathBuf]) -> Self {
        let state = controller.state();
        let receipt = match &state.payment {
            PaymentStatus::Confirmed(receipt) => Some(receipt.clone()),
            _ => None,
        };

        Self {
            current_step: state.current,
            furthest_step: controller.furthest_step(),
            steps_reached: controller.furthest_step().index() + 1,
            finished: state.finished,
            resume: state.resume.as_ref().map(|r| r.describe()),
            template: state.template.clone(),
            plan: state.plan.clone(),
            receipt,
            ats_score: state.ats_report.as_ref().map(|r| r.score),
            additional_skills: state.additional_skills.clone(),
            added_keywords: state
                .optimized
                .as_ref()
                .map(|o| o.added_keywords.clone())
                .unwrap_or_default(),
            exports: exports.to_vec(),
        }
    }

    /// Save the summary as pretty JSON.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize session summary")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write session summary to {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Load a summary written by [`Self::save_to_file`].
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read session summary from {:?}", path.as_ref()))?;
        serde_json::from_str(&content).context("Failed to parse session summary JSON")
    }
}
