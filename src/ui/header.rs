//! Header and common widget rendering
//!
//! This module contains the title with the step counter, the step indicator
//! row, the progress gauge, the status line and the navigation bar.

use crate::components::keybindings::NavBarItem;
use crate::theme::{Styles, Theme, UiText};
use crate::wizard::{Notification, WizardController, WizardStep};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

/// Render the title, step indicator and progress gauge
pub fn render_header(f: &mut Frame, area: Rect, controller: &WizardController) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let progress = controller.progress();
    let step = controller.current_step();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(3),
        ])
        .split(area);

    let title = Line::from(vec![
        Span::styled(UiText::APP_TITLE, Styles::title()),
        Span::styled(
            format!(
                "  Step {} of {}: {}",
                progress.step_number,
                progress.total_steps,
                step.title()
            ),
            Styles::text_secondary(),
        ),
    ]);
    f.render_widget(Paragraph::new(title).alignment(Alignment::Center), rows[0]);

    let mut indicator = Vec::with_capacity(WizardStep::TOTAL * 2);
    for (i, (step, marker)) in WizardStep::SEQUENCE
        .iter()
        .zip(progress.markers.iter())
        .enumerate()
    {
        if i > 0 {
            indicator.push(Span::styled(" ─ ", Styles::text_muted()));
        }
        indicator.push(Span::styled(
            format!("{} {}", i + 1, step.label().short),
            Theme::step_style(*marker),
        ));
    }
    f.render_widget(
        Paragraph::new(Line::from(indicator)).alignment(Alignment::Center),
        rows[1],
    );

    let percent = progress.percent_rounded();
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Styles::progress())
        .percent(percent.min(100))
        .label(format!("{}%", percent));
    f.render_widget(gauge, rows[2]);
}

/// Render the last notification
pub fn render_status(f: &mut Frame, area: Rect, notification: Option<&Notification>) {
    let line = match notification {
        Some(note) => Line::from(vec![Span::styled(
            format!("{} {}", Theme::notification_icon(note.level), note.message),
            Theme::notification_style(note.level),
        )]),
        None => Line::from(""),
    };
    let status = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border_inactive()),
    );
    f.render_widget(status, area);
}

/// Render the navigation bar
pub fn render_nav_bar(f: &mut Frame, area: Rect, items: &[NavBarItem]) {
    let mut spans = Vec::with_capacity(items.len() * 3);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", Styles::nav_hint()));
        }
        spans.push(Span::styled(item.key_display.clone(), Styles::nav_key()));
        spans.push(Span::styled(format!(" {}", item.action_label), Styles::nav_hint()));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}
