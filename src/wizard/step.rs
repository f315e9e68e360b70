//! The fixed step sequence of the resume wizard.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, EnumString, IntoStaticStr};

/// Wizard steps in sequential order.
///
/// ```text
/// Upload -> JobDescription -> Template -> AtsScore -> Payment -> Building -> Preview
/// ```
///
/// `Payment` and `Building` are event-driven: they are left when an external
/// collaborator reports back (payment confirmed, optimization finished), never
/// by the user's "Continue".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum WizardStep {
    Upload = 0,
    JobDescription = 1,
    Template = 2,
    AtsScore = 3,
    Payment = 4,
    Building = 5,
    Preview = 6,
}

/// Display strings for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepLabel {
    /// Page heading
    pub title: &'static str,
    /// Short name for the step indicator row
    pub short: &'static str,
    /// One-line hint shown under the heading
    pub hint: &'static str,
}

/// Display strings keyed by `WizardStep as usize`.
const STEP_LABELS: [StepLabel; WizardStep::TOTAL] = [
    StepLabel {
        title: "Upload Your Resume",
        short: "Upload",
        hint: "Upload your existing resume for AI optimization or paste its text.",
    },
    StepLabel {
        title: "Job Description",
        short: "Job",
        hint: "Paste the job description to optimize your resume for this specific position.",
    },
    StepLabel {
        title: "Choose Template",
        short: "Template",
        hint: "Select a professional template for your resume. All templates are ATS-friendly.",
    },
    StepLabel {
        title: "ATS Compatibility Score",
        short: "ATS",
        hint: "See how well your resume matches the job requirements.",
    },
    StepLabel {
        title: "Choose a Plan",
        short: "Plan",
        hint: "Select a plan that fits your needs. All plans include AI-powered resume optimization.",
    },
    StepLabel {
        title: "Building Your Resume",
        short: "Build",
        hint: "Add any skills the job asks for, then start the optimization.",
    },
    StepLabel {
        title: "Resume Preview",
        short: "Preview",
        hint: "Review your optimized resume and download it.",
    },
];

impl WizardStep {
    /// Total number of steps.
    pub const TOTAL: usize = 7;

    /// The fixed order every transition and progress figure is derived from.
    pub const SEQUENCE: [WizardStep; Self::TOTAL] = [
        Self::Upload,
        Self::JobDescription,
        Self::Template,
        Self::AtsScore,
        Self::Payment,
        Self::Building,
        Self::Preview,
    ];

    /// Zero-based position in [`Self::SEQUENCE`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Step at a zero-based position, if in range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::SEQUENCE.get(index).copied()
    }

    /// Next step in the sequence, or None at `Preview`.
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Previous step in the sequence, or None at `Upload`.
    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// True for steps that are left by a collaborator event rather than "Continue".
    #[inline]
    pub const fn is_event_driven(self) -> bool {
        matches!(self, Self::Payment | Self::Building)
    }

    /// True for the last step, where "Continue" finishes the session.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Preview)
    }

    /// Whether the "Continue"/"Finish" affordance is offered on this step.
    #[inline]
    pub const fn shows_continue(self) -> bool {
        !self.is_event_driven()
    }

    /// Whether the "Back" affordance is offered on this step.
    #[inline]
    pub const fn shows_back(self) -> bool {
        !matches!(self, Self::Upload)
    }

    /// Display strings for this step.
    pub fn label(self) -> &'static StepLabel {
        &STEP_LABELS[self.index()]
    }

    /// Page heading for this step.
    pub fn title(self) -> &'static str {
        self.label().title
    }

    /// Stable kebab-case id (`"job-description"`, ...).
    pub fn id(self) -> &'static str {
        self.into()
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        Self::Upload
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_sequence_matches_discriminants() {
        for (i, step) in WizardStep::SEQUENCE.iter().enumerate() {
            assert_eq!(step.index(), i, "{:?} should sit at {}", step, i);
        }
        assert_eq!(WizardStep::iter().count(), WizardStep::TOTAL);
    }

    #[test]
    fn test_next_forms_chain() {
        let mut current = WizardStep::Upload;
        let mut count = 0;
        while let Some(next) = current.next() {
            current = next;
            count += 1;
            assert!(count < 20, "Infinite loop detected in step chain");
        }
        assert_eq!(current, WizardStep::Preview);
        assert_eq!(count, 6);
    }

    #[test]
    fn test_previous_forms_reverse_chain() {
        let mut current = WizardStep::Preview;
        let mut count = 0;
        while let Some(prev) = current.previous() {
            current = prev;
            count += 1;
            assert!(count < 20, "Infinite loop detected in step chain");
        }
        assert_eq!(current, WizardStep::Upload);
        assert_eq!(count, 6);
    }

    #[test]
    fn test_only_payment_and_building_are_event_driven() {
        for step in WizardStep::iter() {
            let expected = matches!(step, WizardStep::Payment | WizardStep::Building);
            assert_eq!(step.is_event_driven(), expected, "{:?}", step);
            assert_eq!(step.shows_continue(), !expected);
        }
    }

    #[test]
    fn test_labels_are_keyed_by_step() {
        assert_eq!(WizardStep::Upload.title(), "Upload Your Resume");
        assert_eq!(WizardStep::AtsScore.title(), "ATS Compatibility Score");
        assert_eq!(WizardStep::Preview.to_string(), "Resume Preview");
    }

    #[test]
    fn test_id_roundtrip() {
        for step in WizardStep::iter() {
            let parsed: WizardStep = step.id().parse().expect("Should parse");
            assert_eq!(parsed, step);
        }
        assert_eq!(WizardStep::JobDescription.id(), "job-description");
        assert_eq!(WizardStep::AtsScore.id(), "ats-score");
    }
}
