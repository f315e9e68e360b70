//! Colors, styles and layout constants for the wizard screens.
//!
//! Screens never build colors inline; they pick from [`Colors`], the
//! ready-made [`Styles`], or the lookups on [`Theme`] that map wizard
//! values (notification level, step marker, ATS rating) to a style.
//!
//! ```rust
//! use resume_wizard::theme::{Colors, Styles, Theme};
//! use resume_wizard::types::NotificationLevel;
//! use ratatui::style::Style;
//!
//! let accent = Style::default().fg(Colors::PRIMARY);
//! let heading = Styles::title();
//! let failure = Theme::notification_style(NotificationLevel::Error);
//! # let _ = (accent, heading, failure);
//! ```

use ratatui::style::{Color, Modifier, Style};

use crate::collaborators::ScoreRating;
use crate::types::NotificationLevel;
use crate::wizard::StepMarker;

// =============================================================================
// COLOR PALETTE
// =============================================================================

/// Wizard palette. Indigo brand accent on a dark slate background.
pub struct Colors;

impl Colors {
    /// Popup and text-entry background
    pub const BG_PRIMARY: Color = Color::Rgb(22, 24, 38);
    /// Unfilled part of a gauge
    pub const BG_GAUGE: Color = Color::Rgb(45, 48, 66);

    pub const FG_PRIMARY: Color = Color::White;
    pub const FG_SECONDARY: Color = Color::Gray;
    pub const FG_MUTED: Color = Color::DarkGray;

    /// Brand accent: titles, keys, focused borders
    pub const PRIMARY: Color = Color::Rgb(129, 140, 248);
    /// Values the user picked (template, plan, score)
    pub const SECONDARY: Color = Color::LightYellow;

    pub const SUCCESS: Color = Color::LightGreen;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::LightRed;
    pub const INFO: Color = Color::LightBlue;

    pub const BORDER_ACTIVE: Color = Self::PRIMARY;
    pub const BORDER_INACTIVE: Color = Color::DarkGray;

    /// Highlighted list row
    pub const SELECTED_BG: Color = Self::PRIMARY;
    pub const SELECTED_FG: Color = Color::Black;
    pub const UNSELECTED: Color = Color::Gray;

    /// Gauge fill (wizard progress, build progress)
    pub const PROGRESS: Color = Color::LightGreen;
    pub const NAV_HINT: Color = Color::DarkGray;

    // Step indicator
    pub const STEP_ACTIVE: Color = Self::PRIMARY;
    pub const STEP_COMPLETE: Color = Color::LightGreen;
    pub const STEP_PENDING: Color = Color::DarkGray;
}

// =============================================================================
// PRE-BUILT STYLES
// =============================================================================

/// Styles shared across screens.
pub struct Styles;

impl Styles {
    pub fn text() -> Style {
        Style::default().fg(Colors::FG_PRIMARY)
    }

    /// Hints, placeholders, pending steps
    pub fn text_muted() -> Style {
        Style::default().fg(Colors::FG_MUTED)
    }

    pub fn text_secondary() -> Style {
        Style::default().fg(Colors::FG_SECONDARY)
    }

    /// Block titles and the app title
    pub fn title() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// A value the user chose
    pub fn emphasis() -> Style {
        Style::default()
            .fg(Colors::SECONDARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_active() -> Style {
        Style::default().fg(Colors::BORDER_ACTIVE)
    }

    pub fn border_inactive() -> Style {
        Style::default().fg(Colors::BORDER_INACTIVE)
    }

    /// Row under the cursor
    pub fn selected() -> Style {
        Style::default()
            .fg(Colors::SELECTED_FG)
            .bg(Colors::SELECTED_BG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn unselected() -> Style {
        Style::default().fg(Colors::UNSELECTED)
    }

    pub fn success() -> Style {
        Style::default().fg(Colors::SUCCESS)
    }

    pub fn error() -> Style {
        Style::default().fg(Colors::ERROR)
    }

    pub fn progress() -> Style {
        Style::default().fg(Colors::PROGRESS).bg(Colors::BG_GAUGE)
    }

    /// Action labels in the navigation bar
    pub fn nav_hint() -> Style {
        Style::default().fg(Colors::NAV_HINT)
    }

    /// Key label in the navigation bar
    pub fn nav_key() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }
}

// =============================================================================
// THEME CONTEXT
// =============================================================================

/// Maps wizard values to styles.
pub struct Theme;

impl Theme {
    /// Status bar style for a notification
    pub fn notification_style(level: NotificationLevel) -> Style {
        match level {
            NotificationLevel::Info => Style::default().fg(Colors::INFO),
            NotificationLevel::Success => Style::default().fg(Colors::SUCCESS),
            NotificationLevel::Warning => Style::default().fg(Colors::WARNING),
            NotificationLevel::Error => Style::default()
                .fg(Colors::ERROR)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Prefix shown before a notification
    pub fn notification_icon(level: NotificationLevel) -> &'static str {
        match level {
            NotificationLevel::Info => "i",
            NotificationLevel::Success => "✓",
            NotificationLevel::Warning => "!",
            NotificationLevel::Error => "✗",
        }
    }

    /// Style of one entry in the step indicator
    pub fn step_style(marker: StepMarker) -> Style {
        match marker {
            StepMarker::Done => Style::default().fg(Colors::STEP_COMPLETE),
            StepMarker::Active => Style::default()
                .fg(Colors::STEP_ACTIVE)
                .add_modifier(Modifier::BOLD),
            StepMarker::Pending => Style::default().fg(Colors::STEP_PENDING),
        }
    }

    /// Color for an ATS score band
    pub fn score_color(rating: ScoreRating) -> Color {
        match rating {
            ScoreRating::Excellent => Colors::SUCCESS,
            ScoreRating::Average => Colors::WARNING,
            ScoreRating::NeedsImprovement => Colors::ERROR,
        }
    }
}

// =============================================================================
// UI CONSTANTS
// =============================================================================

/// Layout sizes.
pub struct UiConstants;

impl UiConstants {
    /// Help popup width percentage
    pub const DIALOG_WIDTH_PCT: u16 = 60;

    /// Help popup height percentage
    pub const DIALOG_HEIGHT_PCT: u16 = 70;

    /// Minimum popup width
    pub const DIALOG_MIN_WIDTH: u16 = 50;

    /// Maximum popup width
    pub const DIALOG_MAX_WIDTH: u16 = 80;

    pub const NAV_BAR_HEIGHT: u16 = 1;

    /// Title, step indicator and progress gauge
    pub const HEADER_HEIGHT: u16 = 6;

    /// Notification line (with borders)
    pub const STATUS_BAR_HEIGHT: u16 = 3;

    /// Characters of resume/job text shown in previews
    pub const PREVIEW_CHARS: usize = 600;
}

// =============================================================================
// TEXT CONSTANTS
// =============================================================================

/// Fixed strings shown on several screens.
pub struct UiText;

impl UiText {
    pub const APP_TITLE: &'static str = "Resume Wizard";
    pub const PRESS_ENTER: &'static str = "Press Enter to confirm";
    pub const PRESS_ESC: &'static str = "Esc discards changes";
    pub const PROCESSING: &'static str = "Processing payment...";
    pub const NOTHING_YET: &'static str = "(nothing yet)";
}
