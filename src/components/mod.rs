//! Reusable TUI components
//!
//! - `keybindings` - Step-aware key registry (dispatch, nav bar, help)
//! - `help_overlay` - Help popup built from the registry

pub mod help_overlay;
pub mod keybindings;

pub use help_overlay::HelpOverlay;
pub use keybindings::{HelpSection, KeyAction, Keybinding, KeybindingContext, NavBarItem};
