//! Key bindings per wizard step and input mode

use crate::app::AppMode;
use crate::wizard::WizardStep;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Everything a key press can ask the wizard to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    NavigateUp,
    NavigateDown,
    Select,
    Continue,
    Back,
    BrowseFile,
    PasteText,
    EditText,
    Rescore,
    CancelPayment,
    AddSkill,
    RemoveSkill,
    StartBuild,
    ToggleFormat,
    Download,
    Confirm,
    Cancel,
    Help,
    Quit,
}

/// One key, the action it triggers, and its nav-bar label
#[derive(Debug, Clone)]
pub struct Keybinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: KeyAction,
    pub display: String,
    pub description: String,
}

impl Keybinding {
    pub fn new(key: KeyCode, action: KeyAction, display: &str, description: &str) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::NONE,
            action,
            display: display.to_string(),
            description: description.to_string(),
        }
    }

    /// Binding that needs `modifiers` held
    pub fn with_modifiers(
        key: KeyCode,
        modifiers: KeyModifiers,
        action: KeyAction,
        display: &str,
        description: &str,
    ) -> Self {
        Self {
            key,
            modifiers,
            action,
            display: display.to_string(),
            description: description.to_string(),
        }
    }

    /// Whether `event` triggers this binding. Shift is ignored so that
    /// uppercase letters work; Control must match exactly.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let control = event.modifiers.contains(KeyModifiers::CONTROL);
        let wants_control = self.modifiers.contains(KeyModifiers::CONTROL);
        if control != wants_control {
            return false;
        }
        match (self.key, event.code) {
            (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        }
    }
}

/// Registry of bindings for every step, text entry and global keys.
///
/// The app dispatches through it, and the nav bar and help overlay are
/// drawn from it, so a key that is not shown is never handled.
pub struct KeybindingContext {
    /// Step-specific keybindings
    step_bindings: HashMap<WizardStep, Vec<Keybinding>>,
    /// Bindings while a text field is open
    text_entry_bindings: Vec<Keybinding>,
    /// Global keybindings (available outside text entry)
    global_bindings: Vec<Keybinding>,
}

impl Default for KeybindingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingContext {
    /// Registry with the wizard's bindings
    pub fn new() -> Self {
        let mut ctx = Self {
            step_bindings: HashMap::new(),
            text_entry_bindings: Vec::new(),
            global_bindings: Vec::new(),
        };
        ctx.register_defaults();
        ctx
    }

    /// Register default keybindings for every step
    fn register_defaults(&mut self) {
        self.global_bindings = vec![
            Keybinding::new(KeyCode::Char('?'), KeyAction::Help, "?", "Help"),
            Keybinding::new(KeyCode::Char('q'), KeyAction::Quit, "Q", "Quit"),
        ];

        self.text_entry_bindings = vec![
            Keybinding::new(KeyCode::Enter, KeyAction::Confirm, "Enter", "Save"),
            Keybinding::new(KeyCode::Esc, KeyAction::Cancel, "Esc", "Discard"),
            Keybinding::with_modifiers(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
                KeyAction::Quit,
                "Ctrl+C",
                "Quit",
            ),
        ];

        let continue_key = || Keybinding::new(KeyCode::Char('n'), KeyAction::Continue, "N", "Continue");
        let back_key = || Keybinding::new(KeyCode::Char('b'), KeyAction::Back, "B", "Back");
        let list_keys = |select: &str| {
            vec![
                Keybinding::new(KeyCode::Up, KeyAction::NavigateUp, "Up", "Navigate up"),
                Keybinding::new(KeyCode::Down, KeyAction::NavigateDown, "Down", "Navigate down"),
                Keybinding::new(KeyCode::Enter, KeyAction::Select, "Enter", select),
            ]
        };

        self.step_bindings.insert(
            WizardStep::Upload,
            vec![
                Keybinding::new(KeyCode::Char('u'), KeyAction::BrowseFile, "U", "Upload a file"),
                Keybinding::new(KeyCode::Char('p'), KeyAction::PasteText, "P", "Paste resume text"),
                continue_key(),
                back_key(),
            ],
        );

        self.step_bindings.insert(
            WizardStep::JobDescription,
            vec![
                Keybinding::new(KeyCode::Char('e'), KeyAction::EditText, "E", "Edit job description"),
                continue_key(),
                back_key(),
            ],
        );

        let mut template = list_keys("Choose template");
        template.extend([continue_key(), back_key()]);
        self.step_bindings.insert(WizardStep::Template, template);

        self.step_bindings.insert(
            WizardStep::AtsScore,
            vec![
                Keybinding::new(KeyCode::Char('r'), KeyAction::Rescore, "R", "Rescore"),
                continue_key(),
                back_key(),
            ],
        );

        let mut payment = list_keys("Buy plan");
        payment.extend([
            Keybinding::new(KeyCode::Char('c'), KeyAction::CancelPayment, "C", "Cancel payment"),
            back_key(),
        ]);
        self.step_bindings.insert(WizardStep::Payment, payment);

        let mut building = list_keys("Toggle skill");
        building.extend([
            Keybinding::new(KeyCode::Char('a'), KeyAction::AddSkill, "A", "Add a skill"),
            Keybinding::new(KeyCode::Char('x'), KeyAction::RemoveSkill, "X", "Remove last skill"),
            Keybinding::new(KeyCode::Char('s'), KeyAction::StartBuild, "S", "Optimize resume"),
            back_key(),
        ]);
        self.step_bindings.insert(WizardStep::Building, building);

        self.step_bindings.insert(
            WizardStep::Preview,
            vec![
                Keybinding::new(KeyCode::Char('f'), KeyAction::ToggleFormat, "F", "Switch format"),
                Keybinding::new(KeyCode::Char('d'), KeyAction::Download, "D", "Download"),
                Keybinding::new(KeyCode::Char('n'), KeyAction::Continue, "N", "Finish"),
                back_key(),
            ],
        );
    }

    /// Bindings active in `mode`, globals last
    pub fn get_bindings(&self, mode: &AppMode) -> Vec<&Keybinding> {
        let mut bindings: Vec<&Keybinding> = Vec::new();

        match mode {
            AppMode::TextEntry(_) => {
                bindings.extend(self.text_entry_bindings.iter());
                return bindings;
            }
            AppMode::Step(step) => {
                if let Some(step_bindings) = self.step_bindings.get(step) {
                    bindings.extend(step_bindings.iter().filter(|b| match b.action {
                        KeyAction::Continue => step.shows_continue(),
                        KeyAction::Back => step.shows_back(),
                        _ => true,
                    }));
                }
            }
            AppMode::Finished => {}
        }

        bindings.extend(self.global_bindings.iter());
        bindings
    }

    /// Action bound to `event` in `mode`, if any
    pub fn action_for(&self, mode: &AppMode, event: &KeyEvent) -> Option<KeyAction> {
        self.get_bindings(mode)
            .into_iter()
            .find(|b| b.matches(event))
            .map(|b| b.action)
    }

    /// Nav bar entries for `mode`
    pub fn get_nav_items(&self, mode: &AppMode) -> Vec<NavBarItem> {
        let bindings = self.get_bindings(mode);

        // Up and Down share one entry
        let mut items: Vec<NavBarItem> = Vec::new();
        let mut has_nav = false;

        for binding in bindings {
            let is_nav = matches!(
                binding.action,
                KeyAction::NavigateUp | KeyAction::NavigateDown
            );
            if is_nav {
                if !has_nav {
                    items.push(NavBarItem {
                        key_display: "Up/Dn".to_string(),
                        action_label: "Navigate".to_string(),
                    });
                    has_nav = true;
                }
                continue;
            }
            items.push(NavBarItem {
                key_display: binding.display.clone(),
                action_label: binding.description.clone(),
            });
        }

        items
    }

    /// Help overlay sections for `mode`
    pub fn get_help_content(&self, mode: &AppMode) -> Vec<HelpSection> {
        let bindings = self.get_bindings(mode);
        let mut sections = Vec::new();

        let mut push_section = |title: &str, filter: fn(KeyAction) -> bool| {
            let items: Vec<(String, String)> = bindings
                .iter()
                .filter(|b| filter(b.action))
                .map(|b| (b.display.clone(), b.description.clone()))
                .collect();
            if !items.is_empty() {
                sections.push(HelpSection {
                    title: title.to_string(),
                    items,
                });
            }
        };

        push_section("Navigation", |a| {
            matches!(a, KeyAction::NavigateUp | KeyAction::NavigateDown)
        });
        push_section("Actions", |a| {
            !matches!(
                a,
                KeyAction::NavigateUp
                    | KeyAction::NavigateDown
                    | KeyAction::Continue
                    | KeyAction::Back
                    | KeyAction::Help
                    | KeyAction::Quit
            )
        });
        push_section("General", |a| {
            matches!(
                a,
                KeyAction::Continue | KeyAction::Back | KeyAction::Help | KeyAction::Quit
            )
        });

        sections
    }
}

#[derive(Debug, Clone)]
pub struct NavBarItem {
    pub key_display: String,
    pub action_label: String,
}

/// Titled group of (key, description) rows
#[derive(Debug, Clone)]
pub struct HelpSection {
    pub title: String,
    pub items: Vec<(String, String)>,
}
