//! Application state definitions
//!
//! Screen-local state of the interactive wizard: list cursors, the open
//! text field, the help toggle and the last notification. Wizard data itself
//! lives in the session's controller.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fmt;
use std::path::PathBuf;

use crate::types::ExportFormat;
use crate::wizard::{Notification, WizardStep};

/// Which text field a [`TextInput`] edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditField {
    ResumePath,
    ResumeText,
    JobDescription,
    Skill,
}

impl EditField {
    /// Dialog title
    pub fn title(self) -> &'static str {
        match self {
            Self::ResumePath => "Resume file (PDF, DOC or DOCX)",
            Self::ResumeText => "Paste your resume text",
            Self::JobDescription => "Job description",
            Self::Skill => "Add a skill",
        }
    }

    /// Whether Ctrl+J inserts a line break
    pub fn is_multiline(self) -> bool {
        matches!(self, Self::ResumeText | Self::JobDescription)
    }
}

/// Result of feeding a key to a [`TextInput`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
    /// Keep editing
    Continue,
    /// User confirmed the value
    Confirm(String),
    /// User discarded the edit
    Cancel,
}

/// An open text field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    pub field: EditField,
    pub value: String,
}

impl TextInput {
    /// Open `field`, pre-filled with `value`
    pub fn new(field: EditField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    /// Handle keyboard input for the field
    pub fn handle_input(&mut self, key_event: KeyEvent) -> InputResult {
        let control = key_event.modifiers.contains(KeyModifiers::CONTROL);
        match key_event.code {
            KeyCode::Enter => InputResult::Confirm(self.value.clone()),
            KeyCode::Esc => InputResult::Cancel,
            KeyCode::Backspace => {
                self.value.pop();
                InputResult::Continue
            }
            KeyCode::Char('j') if control && self.field.is_multiline() => {
                self.value.push('\n');
                InputResult::Continue
            }
            KeyCode::Char('u') if control => {
                self.value.clear();
                InputResult::Continue
            }
            KeyCode::Char(c) if !control => {
                self.value.push(c);
                InputResult::Continue
            }
            KeyCode::Tab if self.field.is_multiline() => {
                self.value.push('\t');
                InputResult::Continue
            }
            _ => InputResult::Continue,
        }
    }

    /// Append pasted text (bracketed paste)
    pub fn paste(&mut self, text: &str) {
        if self.field.is_multiline() {
            self.value.push_str(text);
        } else {
            self.value.push_str(text.lines().next().unwrap_or_default().trim());
        }
    }
}

/// What the keyboard currently drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppMode {
    /// A wizard step
    Step(WizardStep),
    /// A text field is open
    TextEntry(EditField),
    /// The wizard has finished; only help and quit remain
    Finished,
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Step(step) => write!(f, "{}", step.title()),
            Self::TextEntry(field) => write!(f, "Editing: {}", field.title()),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

/// Main application state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Open text field, if any
    pub input: Option<TextInput>,
    /// Cursor in the template list
    pub template_cursor: usize,
    /// Cursor in the plan list
    pub plan_cursor: usize,
    /// Cursor in the suggested skills list
    pub skill_cursor: usize,
    /// Whether the help overlay is visible
    pub help_visible: bool,
    /// Last notification, shown in the status bar
    pub notification: Option<Notification>,
    /// Format used by the next download
    pub download_format: ExportFormat,
    /// Where the last download was written
    pub last_export: Option<PathBuf>,
}

impl AppState {
    pub fn new(download_format: ExportFormat) -> Self {
        Self {
            download_format,
            ..Default::default()
        }
    }

    /// Keyboard mode for the given wizard position
    pub fn mode(&self, step: WizardStep, finished: bool) -> AppMode {
        match &self.input {
            Some(input) => AppMode::TextEntry(input.field),
            None if finished => AppMode::Finished,
            None => AppMode::Step(step),
        }
    }

    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    /// Switch between PDF and Word
    pub fn toggle_format(&mut self) {
        self.download_format = match self.download_format {
            ExportFormat::Pdf => ExportFormat::Docx,
            ExportFormat::Docx => ExportFormat::Pdf,
        };
    }
}

/// Move a list cursor by one, wrapping at both ends
pub fn step_cursor(cursor: usize, len: usize, down: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if down {
        (cursor + 1) % len
    } else {
        (cursor + len - 1) % len
    }
}
