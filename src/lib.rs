//! Resume Wizard Library
//!
//! A seven-step resume generation wizard: upload a resume, target a job,
//! pick a template, check the ATS score, pay, build and download.
//!
//! The state machine lives in [`wizard`]; [`session`] wires it to the
//! collaborators in [`collaborators`] and runs the slow ones on worker
//! threads. [`app`] and [`ui`] are the terminal front end, [`headless`] the
//! scripted one.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod collaborators;
pub mod components;
pub mod config_file;
pub mod error;
pub mod headless;
pub mod session;
pub mod summary;
pub mod theme;
pub mod types;
pub mod ui;
pub mod wizard;

// Re-export main types for convenience
pub use catalog::{PLANS, Plan, PlanId, SUGGESTED_SKILLS, TEMPLATES, Template, TemplateId};
pub use config_file::WizardConfig;
pub use error::{Result, WizardError};
pub use session::{Collaborators, SessionMessage, WizardSession};
pub use summary::SessionSummary;
pub use types::{BillingPeriod, ExportFormat, NotificationLevel, ResumeFormat};
pub use wizard::{
    AdvanceOutcome, Notification, ProgressProjector, ProgressSnapshot, StepValidator,
    TransitionError, ValidationFailure, WizardController, WizardState, WizardStep,
};
