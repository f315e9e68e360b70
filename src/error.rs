//! Error type shared by the session, the TUI and the headless commands
//!
//! Domain errors (transitions, uploads, optimization, rendering) convert into
//! `WizardError` so callers can bubble them up with `?`.

use thiserror::Error;

use crate::collaborators::optimizer::OptimizationError;
use crate::collaborators::render::RenderError;
use crate::collaborators::upload::UploadRejection;
use crate::wizard::TransitionError;

/// Main error type for the resume wizard
#[derive(Error, Debug)]
pub enum WizardError {
    /// File or terminal I/O
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Resume upload was rejected by the upload handler
    #[error("Upload rejected: {0}")]
    Upload(#[from] UploadRejection),

    /// Resume optimization failed or was cancelled
    #[error("Optimization error: {0}")]
    Optimization(#[from] OptimizationError),

    /// Document rendering/export failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Wizard state machine transition errors
    #[error("Wizard transition error: {0}")]
    Transition(#[from] TransitionError),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Anything without a dedicated variant
    #[error("{0}")]
    General(String),
}

/// Result type alias for wizard operations
pub type Result<T> = std::result::Result<T, WizardError>;

impl WizardError {
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self::General(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::WizardStep;

    #[test]
    fn test_error_display() {
        let err = WizardError::terminal("no tty");
        assert_eq!(err.to_string(), "Terminal error: no tty");

        let err = WizardError::general("There is no optimized resume to download yet");
        assert_eq!(err.to_string(), "There is no optimized resume to download yet");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WizardError = io_err.into();
        assert!(matches!(err, WizardError::Io(_)));
    }

    #[test]
    fn test_transition_error_conversion() {
        let err: WizardError = TransitionError::WrongStep {
            expected: WizardStep::Payment,
            actual: WizardStep::Upload,
        }
        .into();
        assert!(matches!(err, WizardError::Transition(_)));
        assert!(err.to_string().contains("Choose a Plan"));
    }

    #[test]
    fn test_upload_rejection_conversion() {
        let err: WizardError = UploadRejection::TooLarge {
            size_bytes: 10,
            limit_bytes: 5,
        }
        .into();
        assert!(matches!(err, WizardError::Upload(_)));
        assert!(err.to_string().starts_with("Upload rejected:"));
    }
}
