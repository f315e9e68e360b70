//! External services the wizard calls out to.
//!
//! Each collaborator is a trait so the session can be wired with real
//! services or the simulated ones shipped here. The controller never calls
//! these directly; it only consumes the outcome they report.

pub mod optimizer;
pub mod payment;
pub mod render;
pub mod scoring;
pub mod upload;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

pub use optimizer::{
    OptimizationError, OptimizationRequest, OptimizedResume, ResumeOptimizer, SimulatedOptimizer,
};
pub use payment::{PaymentOutcome, PaymentProcessor, PaymentReceipt, SimulatedPaymentProcessor};
pub use render::{Artifact, DocumentRenderer, DraftRenderer, RenderError};
pub use scoring::{AtsReport, AtsScorer, KeywordAtsScorer, KeywordMatch, ScoreRating};
pub use upload::{LocalUploadHandler, UploadHandler, UploadRejection, UploadedResume};

/// Granularity used by [`CancelToken::sleep`] when polling the flag.
const CANCEL_POLL: Duration = Duration::from_millis(25);

/// Shared cancellation flag handed to background work.
///
/// Cloning shares the flag; cancelling any clone cancels them all.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Sleep for `duration` unless cancelled first.
    ///
    /// Returns `false` if the token was cancelled before the time elapsed.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep(CANCEL_POLL.min(deadline - now));
        }
    }
}
