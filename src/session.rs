//! Session runtime: a controller wired to collaborators and worker threads.
//!
//! The session owns the only [`WizardController`]. Slow collaborator calls
//! (payment, optimization) run on worker threads that report back over an
//! mpsc channel; [`WizardSession::poll`] drains the channel and applies each
//! message through the controller, so state is only ever touched from the
//! owning thread.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::catalog::{find_plan, find_template};
use crate::collaborators::{
    AtsScorer, CancelToken, DocumentRenderer, DraftRenderer, KeywordAtsScorer, LocalUploadHandler,
    OptimizationError, OptimizedResume, PaymentOutcome, PaymentProcessor, ResumeOptimizer,
    SimulatedOptimizer, SimulatedPaymentProcessor, UploadHandler,
};
use crate::config_file::WizardConfig;
use crate::error::{Result, WizardError};
use crate::summary::SessionSummary;
use crate::types::ExportFormat;
use crate::wizard::{
    AdvanceOutcome, Notification, OperationTicket, TransitionError, WizardController, WizardState,
    WizardStep,
};

/// Longest single wait inside [`WizardSession::wait_until`] before the
/// interrupt flag is checked again.
const WAIT_SLICE: Duration = Duration::from_millis(50);

/// Messages sent from worker threads to the session owner
#[derive(Debug)]
pub enum SessionMessage {
    /// Payment processor finished
    Payment {
        ticket: OperationTicket,
        outcome: PaymentOutcome,
    },
    /// Optimizer reported progress (0-100)
    BuildProgress { ticket: OperationTicket, percent: u8 },
    /// Optimizer finished or failed
    BuildFinished {
        ticket: OperationTicket,
        result: std::result::Result<OptimizedResume, OptimizationError>,
    },
}

/// The services a session calls out to.
pub struct Collaborators {
    pub upload: Box<dyn UploadHandler>,
    pub scorer: Box<dyn AtsScorer>,
    pub payment: Arc<dyn PaymentProcessor>,
    pub optimizer: Arc<dyn ResumeOptimizer>,
    pub renderer: Box<dyn DocumentRenderer>,
}

impl Collaborators {
    /// Local/simulated implementations tuned by `config`.
    pub fn simulated(config: &WizardConfig) -> Self {
        Self {
            upload: Box::new(LocalUploadHandler::new(config.max_upload_bytes)),
            scorer: Box::new(KeywordAtsScorer::new(config.keyword_limit)),
            payment: Arc::new(SimulatedPaymentProcessor::new(config.payment_delay())),
            optimizer: Arc::new(SimulatedOptimizer::new(
                config.build_tick(),
                config.build_step_percent,
                config.keyword_limit,
            )),
            renderer: Box::new(DraftRenderer),
        }
    }
}

/// A background operation the session is responsible for.
struct Worker {
    ticket: OperationTicket,
    cancel: CancelToken,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!(ticket = self.ticket.id(), "Worker thread panicked");
            }
        }
    }
}

/// One run of the wizard, from upload to finish.
pub struct WizardSession {
    controller: WizardController,
    collaborators: Collaborators,
    config: WizardConfig,
    tx: Sender<SessionMessage>,
    rx: Receiver<SessionMessage>,
    workers: Vec<Worker>,
    exports: Vec<PathBuf>,
    /// Set from outside (Ctrl-C) to end the session at the next wait
    interrupt: CancelToken,
}

impl WizardSession {
    pub fn new(config: WizardConfig, collaborators: Collaborators) -> Self {
        let (tx, rx) = mpsc::channel();
        tracing::info!("Starting wizard session");
        Self {
            controller: WizardController::new(),
            collaborators,
            config,
            tx,
            rx,
            workers: Vec::new(),
            exports: Vec::new(),
            interrupt: CancelToken::new(),
        }
    }

    /// Session wired with the simulated collaborators.
    pub fn simulated(config: WizardConfig) -> Self {
        let collaborators = Collaborators::simulated(&config);
        Self::new(config, collaborators)
    }

    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    pub fn state(&self) -> &WizardState {
        self.controller.state()
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    /// Paths written by [`Self::export`] so far.
    pub fn exports(&self) -> &[PathBuf] {
        &self.exports
    }

    /// Flag that, once cancelled, ends the session at the next wait.
    pub fn interrupt_token(&self) -> CancelToken {
        self.interrupt.clone()
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.controller.take_notifications()
    }

    // ---------------------------------------------------------------------
    // User actions
    // ---------------------------------------------------------------------

    /// Run the upload handler on `path`. Returns whether the file was
    /// accepted; a rejection is queued as a notification.
    pub fn upload_file(&mut self, path: &Path) -> Result<bool> {
        let result = self.collaborators.upload.upload(path);
        let accepted = result.is_ok();
        self.controller.apply_upload(result)?;
        Ok(accepted)
    }

    pub fn paste_resume_text(&mut self, text: impl Into<String>) -> Result<()> {
        Ok(self.controller.paste_resume_text(text)?)
    }

    pub fn set_job_description(&mut self, text: impl Into<String>) -> Result<()> {
        Ok(self.controller.set_job_description(text)?)
    }

    pub fn select_template(&mut self, id: &str) -> Result<()> {
        Ok(self.controller.select_template(id)?)
    }

    /// "Continue". Scores the resume when the score step is entered.
    pub fn advance(&mut self) -> Result<AdvanceOutcome> {
        let outcome = self.controller.advance()?;
        if let AdvanceOutcome::Moved {
            to: WizardStep::AtsScore,
            ..
        } = outcome
        {
            self.score()?;
        }
        Ok(outcome)
    }

    /// Recompute the ATS report for the current inputs.
    pub fn score(&mut self) -> Result<()> {
        let state = self.controller.state();
        let report = self
            .collaborators
            .scorer
            .score(&state.job_description, state.resume_text());
        self.controller.record_ats_report(report)?;
        Ok(())
    }

    /// "Back". Cancels worker threads whose results the controller will no
    /// longer accept.
    pub fn retreat(&mut self) -> Result<Option<WizardStep>> {
        let to = self.controller.retreat()?;
        self.cancel_stale_workers();
        Ok(to)
    }

    /// Choose a plan and start paying for it on a worker thread.
    pub fn choose_plan(&mut self, id: &str) -> Result<OperationTicket> {
        let ticket = self.controller.choose_plan(id)?;
        let plan = find_plan(id.trim())
            .ok_or_else(|| TransitionError::UnknownPlan(id.to_string()))?;

        let processor = Arc::clone(&self.collaborators.payment);
        let tx = self.tx.clone();
        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();
        let handle = thread::spawn(move || {
            let outcome = processor.process(plan, &worker_cancel);
            let _ = tx.send(SessionMessage::Payment { ticket, outcome });
        });

        self.workers.push(Worker {
            ticket,
            cancel,
            handle: Some(handle),
        });
        Ok(ticket)
    }

    /// Abandon the pending payment and stop its worker.
    pub fn cancel_payment(&mut self) -> Result<()> {
        self.controller.cancel_payment()?;
        self.cancel_stale_workers();
        Ok(())
    }

    pub fn add_skill(&mut self, skill: &str) -> Result<bool> {
        Ok(self.controller.add_skill(skill)?)
    }

    pub fn remove_skill(&mut self, skill: &str) -> Result<bool> {
        Ok(self.controller.remove_skill(skill)?)
    }

    /// Start the optimizer on a worker thread.
    pub fn start_build(&mut self) -> Result<OperationTicket> {
        let job = self.controller.begin_build()?;
        let ticket = job.ticket;

        let optimizer = Arc::clone(&self.collaborators.optimizer);
        let tx = self.tx.clone();
        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();
        let handle = thread::spawn(move || {
            let progress_tx = tx.clone();
            let mut report = |percent: u8| {
                let _ = progress_tx.send(SessionMessage::BuildProgress { ticket, percent });
            };
            let result = optimizer.optimize(&job.request, &mut report, &worker_cancel);
            let _ = tx.send(SessionMessage::BuildFinished { ticket, result });
        });

        self.workers.push(Worker {
            ticket,
            cancel,
            handle: Some(handle),
        });
        Ok(ticket)
    }

    /// Render the optimized resume and write it to the output directory.
    pub fn export(&mut self, format: ExportFormat) -> Result<PathBuf> {
        let dir = self.config.output_dir.clone();
        self.export_to(format, &dir)
    }

    /// Like [`Self::export`] but into `dir`.
    pub fn export_to(&mut self, format: ExportFormat, dir: &Path) -> Result<PathBuf> {
        let state = self.controller.state();
        if state.current != WizardStep::Preview {
            return Err(TransitionError::WrongStep {
                expected: WizardStep::Preview,
                actual: state.current,
            }
            .into());
        }
        let optimized = state
            .optimized
            .as_ref()
            .ok_or_else(|| WizardError::general("There is no optimized resume to download yet"))?;
        let template = state
            .template
            .as_ref()
            .and_then(|id| find_template(id.as_str()))
            .ok_or_else(|| WizardError::general("No template selected"))?;

        let artifact = self
            .collaborators
            .renderer
            .render(optimized, template, format)?;
        let path = artifact.write_to(dir)?;

        self.controller.record_download(format)?;
        self.exports.push(path.clone());
        Ok(path)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_controller(&self.controller, &self.exports)
    }

    /// End the session: stop all workers and refuse further changes.
    pub fn cancel(&mut self) {
        for worker in &self.workers {
            worker.cancel.cancel();
        }
        self.controller.close();
    }

    // ---------------------------------------------------------------------
    // Worker messages
    // ---------------------------------------------------------------------

    /// Apply every message waiting on the channel without blocking.
    /// Returns the number of messages applied.
    pub fn poll(&mut self) -> Result<usize> {
        let mut applied = 0;
        while let Ok(msg) = self.rx.try_recv() {
            self.apply(msg)?;
            applied += 1;
        }
        self.reap_finished_workers();
        Ok(applied)
    }

    /// Apply messages until `done` holds or `timeout` elapses.
    ///
    /// Returns `Ok(false)` on timeout. If the interrupt token fires the
    /// session is cancelled and an error is returned.
    pub fn wait_until<F>(&mut self, timeout: Duration, mut done: F) -> Result<bool>
    where
        F: FnMut(&WizardController) -> bool,
    {
        let deadline = Instant::now() + timeout;
        loop {
            self.poll()?;
            if done(&self.controller) {
                return Ok(true);
            }
            if self.interrupt.is_cancelled() {
                self.cancel();
                return Err(WizardError::general("Interrupted"));
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(false);
            }

            match self.rx.recv_timeout(WAIT_SLICE.min(deadline - now)) {
                Ok(msg) => {
                    self.apply(msg)?;
                    self.reap_finished_workers();
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return Ok(false),
            }
        }
    }

    fn apply(&mut self, msg: SessionMessage) -> Result<()> {
        let result = match msg {
            SessionMessage::Payment { ticket, outcome } => {
                self.controller.resolve_payment(ticket, outcome)
            }
            SessionMessage::BuildProgress { ticket, percent } => self
                .controller
                .report_build_progress(ticket, percent)
                .map(|_| ()),
            SessionMessage::BuildFinished {
                ticket,
                result: Ok(optimized),
            } => self.controller.complete_build(ticket, optimized),
            SessionMessage::BuildFinished {
                ticket,
                result: Err(error),
            } => self.controller.fail_build(ticket, error),
        };

        match result {
            Ok(()) => Ok(()),
            // Results of abandoned work, or of work that outlived the session
            Err(TransitionError::StaleTicket(id)) => {
                tracing::debug!(ticket = id, "Ignoring stale worker message");
                Ok(())
            }
            Err(TransitionError::SessionClosed) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn live_tickets(&self) -> [Option<OperationTicket>; 2] {
        [
            self.controller.pending_payment(),
            self.controller.running_build(),
        ]
    }

    fn cancel_stale_workers(&mut self) {
        let live = self.live_tickets();
        for worker in &self.workers {
            if !live.contains(&Some(worker.ticket)) {
                worker.cancel.cancel();
            }
        }
    }

    fn reap_finished_workers(&mut self) {
        self.workers.retain_mut(|worker| {
            let finished = worker
                .handle
                .as_ref()
                .is_none_or(|handle| handle.is_finished());
            if finished {
                worker.join();
            }
            !finished
        });
    }
}

impl Drop for WizardSession {
    fn drop(&mut self) {
        self.cancel();
        for worker in &mut self.workers {
            worker.join();
        }
        tracing::info!("Wizard session ended");
    }
}
