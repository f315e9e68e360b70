//! Wizard core: step sequence, collected state, exit guards, progress
//! figures and the controller that ties them together.
//!
//! Nothing in here does I/O or spawns threads. Collaborator work is run by
//! [`crate::session::WizardSession`], which feeds results back through the
//! controller.

pub mod controller;
pub mod progress;
pub mod state;
pub mod step;
pub mod validator;

pub use controller::{
    AdvanceOutcome, BuildJob, FINISHED_MESSAGE, Notification, TransitionError, WizardController,
};
pub use progress::{ProgressProjector, ProgressSnapshot, StepMarker};
pub use state::{BuildPhase, OperationTicket, PaymentStatus, ResumeSource, WizardState};
pub use step::{StepLabel, WizardStep};
pub use validator::{StepValidator, ValidationFailure};
