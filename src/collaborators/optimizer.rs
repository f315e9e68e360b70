//! Resume optimization against a job description.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::CancelToken;
use super::scoring::KeywordAtsScorer;
use crate::catalog::TemplateId;

/// Everything the optimizer needs to produce a tailored resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    pub resume_text: String,
    pub job_description: String,
    pub template: TemplateId,
    pub additional_skills: Vec<String>,
}

/// Output of a finished optimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedResume {
    pub template: TemplateId,
    /// Full resume body
    pub content: String,
    /// Skills section after merging the user's additions
    pub skills: Vec<String>,
    /// Job-description keywords that were missing and have been worked in
    pub added_keywords: Vec<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptimizationError {
    #[error("optimization was cancelled")]
    Cancelled,

    #[error("resume has no text to optimize")]
    EmptyResume,

    #[error("optimizer failed: {0}")]
    Failed(String),
}

/// Rewrites a resume for a job. Implementations block and report progress
/// (0-100) through `progress`; the session runs them on a worker thread.
pub trait ResumeOptimizer: Send + Sync {
    fn optimize(
        &self,
        request: &OptimizationRequest,
        progress: &mut dyn FnMut(u8),
        cancel: &CancelToken,
    ) -> Result<OptimizedResume, OptimizationError>;
}

/// Steps progress on a timer, then merges skills and missing keywords into
/// the resume text.
#[derive(Debug, Clone)]
pub struct SimulatedOptimizer {
    tick: Duration,
    step_percent: u8,
    scorer: KeywordAtsScorer,
}

impl SimulatedOptimizer {
    pub fn new(tick: Duration, step_percent: u8, keyword_limit: usize) -> Self {
        Self {
            tick,
            step_percent: step_percent.clamp(1, 100),
            scorer: KeywordAtsScorer::new(keyword_limit),
        }
    }
}

impl Default for SimulatedOptimizer {
    fn default() -> Self {
        Self::new(Duration::from_millis(300), 5, super::scoring::DEFAULT_KEYWORD_LIMIT)
    }
}

impl ResumeOptimizer for SimulatedOptimizer {
    fn optimize(
        &self,
        request: &OptimizationRequest,
        progress: &mut dyn FnMut(u8),
        cancel: &CancelToken,
    ) -> Result<OptimizedResume, OptimizationError> {
        if request.resume_text.trim().is_empty() {
            return Err(OptimizationError::EmptyResume);
        }

        let mut percent: u8 = 0;
        progress(percent);
        while percent < 100 {
            if !cancel.sleep(self.tick) {
                tracing::info!(percent, "Optimization cancelled");
                return Err(OptimizationError::Cancelled);
            }
            percent = percent.saturating_add(self.step_percent).min(100);
            progress(percent);
        }

        Ok(self.merge(request))
    }
}

impl SimulatedOptimizer {
    fn merge(&self, request: &OptimizationRequest) -> OptimizedResume {
        let resume_lower = request.resume_text.to_lowercase();

        let mut skills: Vec<String> = Vec::new();
        for skill in &request.additional_skills {
            if !skills.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
                skills.push(skill.clone());
            }
        }

        let added_keywords: Vec<String> = self
            .scorer
            .keywords(&request.job_description)
            .into_iter()
            .filter(|k| !resume_lower.contains(k.as_str()))
            .filter(|k| !skills.iter().any(|s| s.to_lowercase().contains(k.as_str())))
            .collect();

        let mut content = request.resume_text.trim().to_string();
        if !skills.is_empty() {
            content.push_str("\n\nSKILLS\n");
            for skill in &skills {
                content.push_str("- ");
                content.push_str(skill);
                content.push('\n');
            }
        }
        if !added_keywords.is_empty() {
            content.push_str("\nKEY QUALIFICATIONS\n");
            content.push_str(&added_keywords.join(", "));
            content.push('\n');
        }

        OptimizedResume {
            template: request.template.clone(),
            content,
            skills,
            added_keywords,
        }
    }
}
