//! Application module
//!
//! Contains the interactive wizard: the event loop, key dispatch and the
//! glue between screen state and the wizard session.
//!
//! # Module Structure
//! - `state` - Screen state types (AppState, AppMode, TextInput, etc.)
//! - Main module - App struct and event loop

mod state;

pub use state::{AppMode, AppState, EditField, InputResult, TextInput, step_cursor};

use crate::catalog::{PLANS, SUGGESTED_SKILLS, TEMPLATES};
use crate::components::keybindings::{KeyAction, KeybindingContext};
use crate::config_file::WizardConfig;
use crate::error::{Result, WizardError};
use crate::session::WizardSession;
use crate::types::NotificationLevel;
use crate::ui::UiRenderer;
use crate::wizard::{AdvanceOutcome, Notification, WizardStep};
use crossterm::event::{Event, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long the loop waits for a terminal event before polling workers
const EVENT_POLL: Duration = Duration::from_millis(50);

/// Main application struct
pub struct App {
    state: AppState,
    session: WizardSession,
    ui_renderer: UiRenderer,
    /// Keybinding context for dispatch, navigation hints and help
    keybinding_context: KeybindingContext,
}

impl App {
    /// Create the app with simulated collaborators tuned by `config`
    pub fn new(config: WizardConfig) -> Self {
        Self::with_session(WizardSession::simulated(config))
    }

    /// Create the app around an existing session
    pub fn with_session(session: WizardSession) -> Self {
        Self {
            state: AppState::new(session.config().default_format),
            session,
            ui_renderer: UiRenderer::new(),
            keybinding_context: KeybindingContext::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn session(&self) -> &WizardSession {
        &self.session
    }

    pub fn keybinding_context(&self) -> &KeybindingContext {
        &self.keybinding_context
    }

    /// Current keyboard mode
    pub fn mode(&self) -> AppMode {
        let controller = self.session.controller();
        self.state
            .mode(controller.current_step(), controller.is_finished())
    }

    /// Run the main application loop
    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        info!("Starting main application loop");

        loop {
            // Apply worker results (payment, optimizer progress)
            self.poll_session()?;

            terminal
                .draw(|f| {
                    self.ui_renderer
                        .render(f, &self.state, &self.session, &self.keybinding_context)
                })
                .map_err(|e| WizardError::terminal(format!("Failed to draw: {}", e)))?;

            if crossterm::event::poll(EVENT_POLL)? {
                match crossterm::event::read()? {
                    Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
                        if self.handle_key_event(key_event)? {
                            break; // Exit requested
                        }
                    }
                    Event::Paste(text) => self.handle_paste(&text),
                    _ => {}
                }
            }
        }

        self.session.cancel();
        info!("Main application loop finished");
        Ok(())
    }

    /// Drain worker messages and pick up new notifications
    pub fn poll_session(&mut self) -> Result<()> {
        let applied = self.session.poll()?;
        if applied > 0 {
            debug!(applied, "Applied worker messages");
        }
        self.collect_notifications();
        Ok(())
    }

    /// Handle keyboard input events. Returns `true` when the user quits.
    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<bool> {
        let mode = self.mode();
        let action = self.keybinding_context.action_for(&mode, &key_event);

        if self.state.help_visible {
            if matches!(action, Some(KeyAction::Help))
                || key_event.code == crossterm::event::KeyCode::Esc
            {
                self.state.help_visible = false;
            }
            return Ok(false);
        }

        if let AppMode::TextEntry(_) = mode {
            if action == Some(KeyAction::Quit) {
                return Ok(true);
            }
            self.handle_text_input(key_event)?;
            return Ok(false);
        }

        let Some(action) = action else {
            return Ok(false);
        };
        debug!(?action, ?mode, "Key action");

        match action {
            KeyAction::Quit => return Ok(true),
            KeyAction::Help => self.state.toggle_help(),
            KeyAction::NavigateUp => self.move_cursor(false),
            KeyAction::NavigateDown => self.move_cursor(true),
            KeyAction::Select => self.handle_select()?,
            KeyAction::Continue => self.handle_continue()?,
            KeyAction::Back => {
                let result = self.session.retreat();
                self.report(result)?;
            }
            KeyAction::BrowseFile => self.open_input(EditField::ResumePath, ""),
            KeyAction::PasteText => {
                let current = self.session.state().resume_text().to_string();
                self.open_input(EditField::ResumeText, current);
            }
            KeyAction::EditText => {
                let current = self.session.state().job_description.clone();
                self.open_input(EditField::JobDescription, current);
            }
            KeyAction::Rescore => {
                let result = self.session.score();
                self.report(result)?;
            }
            KeyAction::CancelPayment => {
                let result = self.session.cancel_payment();
                self.report(result)?;
            }
            KeyAction::AddSkill => self.open_input(EditField::Skill, ""),
            KeyAction::RemoveSkill => self.remove_last_skill()?,
            KeyAction::StartBuild => {
                let result = self.session.start_build();
                self.report(result)?;
            }
            KeyAction::ToggleFormat => self.state.toggle_format(),
            KeyAction::Download => self.download()?,
            // Text entry only
            KeyAction::Confirm | KeyAction::Cancel => {}
        }

        self.collect_notifications();
        Ok(false)
    }

    /// Handle a bracketed paste
    pub fn handle_paste(&mut self, text: &str) {
        if let Some(input) = self.state.input.as_mut() {
            input.paste(text);
        }
    }

    fn open_input(&mut self, field: EditField, value: impl Into<String>) {
        self.state.input = Some(TextInput::new(field, value));
    }

    fn handle_text_input(&mut self, key_event: KeyEvent) -> Result<()> {
        let Some(input) = self.state.input.as_mut() else {
            return Ok(());
        };
        let field = input.field;
        match input.handle_input(key_event) {
            InputResult::Continue => Ok(()),
            InputResult::Cancel => {
                self.state.input = None;
                Ok(())
            }
            InputResult::Confirm(value) => {
                self.state.input = None;
                self.commit_input(field, value)?;
                self.collect_notifications();
                Ok(())
            }
        }
    }

    fn commit_input(&mut self, field: EditField, value: String) -> Result<()> {
        match field {
            EditField::ResumePath => {
                let path = PathBuf::from(value.trim());
                if path.as_os_str().is_empty() {
                    return Ok(());
                }
                let result = self.session.upload_file(&path);
                self.report(result).map(|_| ())
            }
            EditField::ResumeText => {
                let result = self.session.paste_resume_text(value);
                self.report(result).map(|_| ())
            }
            EditField::JobDescription => {
                let result = self.session.set_job_description(value);
                self.report(result).map(|_| ())
            }
            EditField::Skill => {
                let result = self.session.add_skill(&value);
                self.report(result).map(|_| ())
            }
        }
    }

    fn move_cursor(&mut self, down: bool) {
        match self.session.controller().current_step() {
            WizardStep::Template => {
                self.state.template_cursor = step_cursor(self.state.template_cursor, TEMPLATES.len(), down)
            }
            WizardStep::Payment => {
                self.state.plan_cursor = step_cursor(self.state.plan_cursor, PLANS.len(), down)
            }
            WizardStep::Building => {
                self.state.skill_cursor =
                    step_cursor(self.state.skill_cursor, SUGGESTED_SKILLS.len(), down)
            }
            _ => {}
        }
    }

    fn handle_select(&mut self) -> Result<()> {
        match self.session.controller().current_step() {
            WizardStep::Template => {
                let Some(template) = TEMPLATES.get(self.state.template_cursor) else {
                    return Ok(());
                };
                let result = self.session.select_template(template.id);
                self.report(result).map(|_| ())
            }
            WizardStep::Payment => {
                let Some(plan) = PLANS.get(self.state.plan_cursor) else {
                    return Ok(());
                };
                info!(plan = plan.id, "Plan chosen");
                let result = self.session.choose_plan(plan.id);
                self.report(result).map(|_| ())
            }
            WizardStep::Building => {
                let Some(skill) = SUGGESTED_SKILLS.get(self.state.skill_cursor) else {
                    return Ok(());
                };
                let already = self
                    .session
                    .state()
                    .additional_skills
                    .iter()
                    .any(|s| s.eq_ignore_ascii_case(skill));
                let result = if already {
                    self.session.remove_skill(skill)
                } else {
                    self.session.add_skill(skill)
                };
                self.report(result).map(|_| ())
            }
            _ => Ok(()),
        }
    }

    fn handle_continue(&mut self) -> Result<()> {
        let result = self.session.advance();
        match self.report(result)? {
            Some(AdvanceOutcome::Moved { from, to }) => {
                info!(%from, %to, "Moved to next step");
            }
            Some(AdvanceOutcome::Finished) => info!("Wizard finished"),
            _ => {}
        }
        Ok(())
    }

    fn remove_last_skill(&mut self) -> Result<()> {
        let Some(last) = self.session.state().additional_skills.last().cloned() else {
            return Ok(());
        };
        let result = self.session.remove_skill(&last);
        self.report(result).map(|_| ())
    }

    fn download(&mut self) -> Result<()> {
        let result = self.session.export(self.state.download_format);
        if let Some(path) = self.report(result)? {
            info!(path = %path.display(), "Resume downloaded");
            self.state.last_export = Some(path);
        }
        Ok(())
    }

    /// Turn a failed user action into an error notification. Terminal and
    /// IO failures still end the loop.
    fn report<T>(&mut self, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e @ (WizardError::Terminal(_) | WizardError::Io(_))) => Err(e),
            Err(e) => {
                warn!("Action failed: {}", e);
                self.state.notification = Some(Notification {
                    level: NotificationLevel::Error,
                    message: user_message(&e),
                });
                Ok(None)
            }
        }
    }

    fn collect_notifications(&mut self) {
        for note in self.session.take_notifications() {
            debug!(level = %note.level, "{}", note.message);
            self.state.notification = Some(note);
        }
    }
}

/// Message shown for a failed action, without the error-kind prefix
fn user_message(error: &WizardError) -> String {
    match error {
        WizardError::Transition(e) => e.to_string(),
        WizardError::Upload(e) => e.to_string(),
        WizardError::Render(e) => e.to_string(),
        WizardError::Optimization(e) => e.to_string(),
        other => other.to_string(),
    }
}
