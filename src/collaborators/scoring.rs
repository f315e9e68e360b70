//! ATS compatibility scoring.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

/// Default number of job-description keywords checked
pub const DEFAULT_KEYWORD_LIMIT: usize = 10;

/// Words too common to count as keywords.
const STOP_WORDS: &[&str] = &["and", "the", "for", "with"];

/// Keywords must be longer than this many characters.
const MIN_KEYWORD_LEN: usize = 3;

static WORD_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").expect("regex for word boundaries"));

/// One keyword from the job description and whether the resume has it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub keyword: String,
    pub found: bool,
}

/// Coarse band a score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreRating {
    Excellent,
    Average,
    NeedsImprovement,
}

impl ScoreRating {
    pub fn from_score(score: u8) -> Self {
        if score >= 70 {
            Self::Excellent
        } else if score >= 40 {
            Self::Average
        } else {
            Self::NeedsImprovement
        }
    }
}

impl fmt::Display for ScoreRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Excellent => "Excellent",
            Self::Average => "Average",
            Self::NeedsImprovement => "Needs Improvement",
        })
    }
}

/// Result of scoring a resume against a job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsReport {
    /// 0-100
    pub score: u8,
    pub keyword_matches: Vec<KeywordMatch>,
    pub feedback: Vec<String>,
}

impl AtsReport {
    pub fn rating(&self) -> ScoreRating {
        ScoreRating::from_score(self.score)
    }

    /// Keywords the resume is missing, in job-description order.
    pub fn missing_keywords(&self) -> impl Iterator<Item = &str> {
        self.keyword_matches
            .iter()
            .filter(|m| !m.found)
            .map(|m| m.keyword.as_str())
    }

    pub fn matched_count(&self) -> usize {
        self.keyword_matches.iter().filter(|m| m.found).count()
    }
}

/// Scores a resume against a job description.
pub trait AtsScorer: Send + Sync {
    fn score(&self, job_description: &str, resume_text: &str) -> AtsReport;
}

/// Keyword-overlap scorer.
///
/// Takes the first `limit` distinct words of the job description longer
/// than three characters (stop words excluded) and checks which ones occur
/// anywhere in the lowercased resume text.
#[derive(Debug, Clone)]
pub struct KeywordAtsScorer {
    limit: usize,
}

impl Default for KeywordAtsScorer {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORD_LIMIT)
    }
}

impl KeywordAtsScorer {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Distinct keywords of `text`, in order of first appearance.
    pub fn keywords(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut seen = HashSet::new();
        WORD_SPLIT
            .split(&lowered)
            .filter(|w| w.chars().count() > MIN_KEYWORD_LEN && !STOP_WORDS.contains(w))
            .filter(|w| seen.insert(*w))
            .take(self.limit)
            .map(str::to_string)
            .collect()
    }
}

impl AtsScorer for KeywordAtsScorer {
    fn score(&self, job_description: &str, resume_text: &str) -> AtsReport {
        let keywords = self.keywords(job_description);
        if keywords.is_empty() {
            return AtsReport {
                score: 0,
                keyword_matches: Vec::new(),
                feedback: vec![
                    "No keywords could be extracted from the job description.".to_string(),
                    "Add more detail about the role's skills and responsibilities.".to_string(),
                ],
            };
        }

        let resume = resume_text.to_lowercase();
        let keyword_matches: Vec<KeywordMatch> = keywords
            .into_iter()
            .map(|keyword| {
                let found = resume.contains(&keyword);
                KeywordMatch { keyword, found }
            })
            .collect();

        let found = keyword_matches.iter().filter(|m| m.found).count();
        let score = (found as f64 / keyword_matches.len() as f64 * 100.0).round() as u8;

        let feedback = if score < 40 {
            [
                "Your resume needs significant improvements to pass ATS screening.",
                "Critical keywords are missing from your resume.",
            ]
        } else if score < 70 {
            [
                "Your resume may pass some ATS screenings but could be improved.",
                "Consider adding more relevant keywords from the job description.",
            ]
        } else {
            [
                "Your resume is well-optimized for ATS screening.",
                "Most important keywords are present in your resume.",
            ]
        };

        tracing::debug!(score, found, total = keyword_matches.len(), "ATS score computed");

        AtsReport {
            score,
            keyword_matches,
            feedback: feedback.iter().map(|s| s.to_string()).collect(),
        }
    }
}
