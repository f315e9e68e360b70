//! User interface rendering module
//!
//! This module is organized into submodules for better maintainability:
//! - `header` - Title, step indicator, progress gauge, status and nav bars
//! - `screens` - One body renderer per wizard step plus the text field popup

mod header;
pub mod screens;

use crate::app::{AppMode, AppState};
use crate::components::help_overlay::HelpOverlay;
use crate::components::keybindings::KeybindingContext;
use crate::session::WizardSession;
use crate::theme::UiConstants;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

/// Draws the whole wizard for one frame
#[derive(Debug, Default)]
pub struct UiRenderer;

impl UiRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render the header, the current step, the status line and the nav bar
    pub fn render(
        &self,
        f: &mut Frame,
        state: &AppState,
        session: &WizardSession,
        keybinding_ctx: &KeybindingContext,
    ) {
        let controller = session.controller();
        let mode = state.mode(controller.current_step(), controller.is_finished());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(UiConstants::HEADER_HEIGHT),
                Constraint::Min(5),
                Constraint::Length(UiConstants::STATUS_BAR_HEIGHT),
                Constraint::Length(UiConstants::NAV_BAR_HEIGHT),
            ])
            .split(f.area());

        header::render_header(f, chunks[0], controller);
        screens::render_step(f, chunks[1], state, session);
        header::render_status(f, chunks[2], state.notification.as_ref());
        header::render_nav_bar(f, chunks[3], &keybinding_ctx.get_nav_items(&mode));

        let area = f.area();
        if let Some(input) = &state.input {
            screens::render_text_input(f, area, input);
        }
        if state.help_visible {
            render_help_overlay(f, &mode, keybinding_ctx);
        }
    }
}

/// Render the help overlay
fn render_help_overlay(f: &mut Frame, mode: &AppMode, keybinding_ctx: &KeybindingContext) {
    let area = f.area();
    HelpOverlay::new(mode, keybinding_ctx).render(f, area);
}
