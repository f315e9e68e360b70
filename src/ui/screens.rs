//! Wizard step screens
//!
//! One body renderer per [`WizardStep`]. Every screen reads the session's
//! state and the screen-local [`AppState`]; none of them mutate anything.

use crate::app::{AppState, TextInput};
use crate::catalog::{PLANS, SUGGESTED_SKILLS, TEMPLATES, find_plan};
use crate::collaborators::upload::format_size;
use crate::session::WizardSession;
use crate::theme::{Colors, Styles, Theme, UiConstants, UiText};
use crate::wizard::{BuildPhase, PaymentStatus, WizardState, WizardStep};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
};

/// Render the body for the current step
pub fn render_step(f: &mut Frame, area: Rect, state: &AppState, session: &WizardSession) {
    let wizard = session.state();
    let step = wizard.current;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .title(Span::styled(format!(" {} ", step.title()), Styles::title()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);
    f.render_widget(
        Paragraph::new(step.label().hint)
            .style(Styles::text_secondary())
            .wrap(Wrap { trim: true }),
        chunks[0],
    );

    let body = chunks[1];
    match step {
        WizardStep::Upload => render_upload(f, body, wizard, session.config().max_upload_bytes),
        WizardStep::JobDescription => render_job_description(f, body, wizard),
        WizardStep::Template => render_templates(f, body, state, wizard),
        WizardStep::AtsScore => render_ats_score(f, body, wizard),
        WizardStep::Payment => render_plans(f, body, state, wizard),
        WizardStep::Building => render_building(f, body, state, wizard),
        WizardStep::Preview => render_preview(f, body, state, wizard),
    }
}

fn render_upload(f: &mut Frame, area: Rect, wizard: &WizardState, max_bytes: u64) {
    let mut lines = vec![Line::from(vec![
        Span::styled("Resume: ", Styles::text_muted()),
        match &wizard.resume {
            Some(resume) => Span::styled(resume.describe(), Styles::success()),
            None => Span::styled(UiText::NOTHING_YET, Styles::text_muted()),
        },
    ])];
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Accepted files: PDF, DOC, DOCX (max {})", format_size(max_bytes)),
        Styles::text_muted(),
    )));
    lines.push(Line::from(""));
    lines.extend(preview_lines(wizard.resume_text()));

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_job_description(f: &mut Frame, area: Rect, wizard: &WizardState) {
    let lines = if wizard.job_description.trim().is_empty() {
        vec![Line::from(Span::styled(
            "Paste the job description here...",
            Styles::text_muted(),
        ))]
    } else {
        preview_lines(&wizard.job_description)
    };
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_templates(f: &mut Frame, area: Rect, state: &AppState, wizard: &WizardState) {
    let chosen = wizard.template.as_ref().map(|t| t.as_str());
    let items: Vec<ListItem> = TEMPLATES
        .iter()
        .map(|t| {
            let mark = if chosen == Some(t.id) { "✓ " } else { "  " };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(mark, Styles::success()),
                    Span::styled(t.name, Styles::text()),
                ]),
                Line::from(Span::styled(format!("    {}", t.description), Styles::text_muted())),
            ])
        })
        .collect();

    render_list(f, area, items, state.template_cursor);
}

fn render_ats_score(f: &mut Frame, area: Rect, wizard: &WizardState) {
    let Some(report) = &wizard.ats_report else {
        f.render_widget(Paragraph::new("Calculating your ATS score..."), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let rating = report.rating();
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!("ATS Score: {}", rating)))
        .gauge_style(Style::default().fg(Theme::score_color(rating)).bg(Colors::BG_GAUGE))
        .percent(u16::from(report.score.min(100)))
        .label(format!("{}%", report.score));
    f.render_widget(gauge, chunks[0]);

    let mut lines = vec![Line::from(Span::styled(
        format!(
            "Keyword Matches ({}/{})",
            report.matched_count(),
            report.keyword_matches.len()
        ),
        Styles::emphasis(),
    ))];
    for m in &report.keyword_matches {
        let (mark, style) = if m.found {
            ("✓", Styles::success())
        } else {
            ("✗", Styles::error())
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", mark), style),
            Span::styled(m.keyword.clone(), Styles::text()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Feedback", Styles::emphasis())));
    for line in &report.feedback {
        lines.push(Line::from(Span::styled(format!("  • {}", line), Styles::text())));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[1]);
}

fn render_plans(f: &mut Frame, area: Rect, state: &AppState, wizard: &WizardState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let items: Vec<ListItem> = PLANS
        .iter()
        .map(|p| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<10}", p.name), Styles::text()),
                Span::styled(format!("${} {}", p.price_usd, p.billing), Styles::emphasis()),
            ]))
        })
        .collect();
    render_list(f, chunks[0], items, state.plan_cursor);

    let mut lines = Vec::new();
    if let Some(plan) = PLANS.get(state.plan_cursor) {
        lines.push(Line::from(Span::styled(plan.description, Styles::text())));
        lines.push(Line::from(Span::styled(plan.allowance.to_string(), Styles::success())));
        for feature in plan.features {
            lines.push(Line::from(Span::styled(format!("  • {}", feature), Styles::text_secondary())));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(plan.call_to_action(), Styles::nav_key())));
    }
    lines.push(Line::from(""));
    lines.push(payment_status_line(&wizard.payment));

    f.render_widget(
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).border_style(Styles::border_inactive()))
            .wrap(Wrap { trim: false }),
        chunks[1],
    );
}

fn payment_status_line(payment: &PaymentStatus) -> Line<'static> {
    let plan_name = |id: &str| find_plan(id).map(|p| p.name).unwrap_or("unknown");
    match payment {
        PaymentStatus::Unpaid => Line::from(""),
        PaymentStatus::Pending { .. } => {
            Line::from(Span::styled(UiText::PROCESSING, Styles::emphasis()))
        }
        PaymentStatus::Confirmed(receipt) => Line::from(Span::styled(
            format!("Paid for the {} plan ({})", plan_name(receipt.plan.as_str()), receipt.reference),
            Styles::success(),
        )),
        PaymentStatus::Cancelled { plan } => Line::from(Span::styled(
            format!("Payment for the {} plan was cancelled.", plan_name(plan.as_str())),
            Styles::error(),
        )),
    }
}

fn render_building(f: &mut Frame, area: Rect, state: &AppState, wizard: &WizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(2), Constraint::Length(3)])
        .split(area);

    let items: Vec<ListItem> = SUGGESTED_SKILLS
        .iter()
        .map(|skill| {
            let added = wizard
                .additional_skills
                .iter()
                .any(|s| s.eq_ignore_ascii_case(skill));
            let mark = if added { "[x] " } else { "[ ] " };
            ListItem::new(Line::from(format!("{}{}", mark, skill)))
        })
        .collect();
    render_list(f, chunks[0], items, state.skill_cursor);

    let skills = if wizard.additional_skills.is_empty() {
        UiText::NOTHING_YET.to_string()
    } else {
        wizard.additional_skills.join(", ")
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Additional skills: ", Styles::text_muted()),
            Span::styled(skills, Styles::text()),
        ]))
        .wrap(Wrap { trim: true }),
        chunks[1],
    );

    match wizard.build {
        BuildPhase::Collecting => f.render_widget(
            Paragraph::new("Press S to optimize your resume.").style(Styles::nav_key()),
            chunks[2],
        ),
        BuildPhase::Optimizing { percent, .. } => {
            let gauge = Gauge::default()
                .block(Block::default().borders(Borders::ALL).title("Optimizing"))
                .gauge_style(Styles::progress())
                .percent(u16::from(percent.min(100)));
            f.render_widget(gauge, chunks[2]);
        }
    }
}

fn render_preview(f: &mut Frame, area: Rect, state: &AppState, wizard: &WizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(area);

    let content = match &wizard.optimized {
        Some(optimized) => optimized.content.as_str(),
        None => "No optimized resume yet.",
    };
    f.render_widget(
        Paragraph::new(content)
            .block(Block::default().borders(Borders::ALL).border_style(Styles::border_inactive()))
            .wrap(Wrap { trim: false }),
        chunks[0],
    );

    let mut spans = vec![
        Span::styled("Download as: ", Styles::text_muted()),
        Span::styled(state.download_format.label(), Styles::emphasis()),
    ];
    if let Some(path) = &state.last_export {
        spans.push(Span::styled(
            format!("   Saved to {}", path.display()),
            Styles::success(),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), chunks[1]);
}

/// Render the open text field as a popup
pub fn render_text_input(f: &mut Frame, parent: Rect, input: &TextInput) {
    let width = parent.width.saturating_sub(8).min(UiConstants::DIALOG_MAX_WIDTH);
    let height: u16 = if input.field.is_multiline() { 12 } else { 5 };
    let height = height.min(parent.height);
    let area = Rect {
        x: parent.x + (parent.width - width) / 2,
        y: parent.y + (parent.height - height) / 2,
        width,
        height,
    };

    let footer = if input.field.is_multiline() {
        format!("{}, Ctrl+J for a new line. {}", UiText::PRESS_ENTER, UiText::PRESS_ESC)
    } else {
        format!("{}. {}", UiText::PRESS_ENTER, UiText::PRESS_ESC)
    };

    let mut lines: Vec<Line> = input.value.split('\n').map(|l| Line::from(l.to_string())).collect();
    if let Some(last) = lines.last_mut() {
        last.push_span(Span::styled("▏", Styles::nav_key()));
    }

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Styles::border_active())
                    .title(format!(" {} ", input.field.title()))
                    .title_bottom(Line::from(Span::styled(footer, Styles::text_muted())))
                    .style(Style::default().bg(Colors::BG_PRIMARY)),
            )
            .wrap(Wrap { trim: false }),
        area,
    );
}

/// List with the cursor row highlighted
fn render_list(f: &mut Frame, area: Rect, items: Vec<ListItem>, cursor: usize) {
    let mut list_state = ListState::default();
    list_state.select(Some(cursor));
    let list = List::new(items)
        .style(Styles::unselected())
        .highlight_style(Styles::selected())
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut list_state);
}

/// First few hundred characters of `text`, one line per source line
fn preview_lines(text: &str) -> Vec<Line<'static>> {
    let mut preview: String = text.chars().take(UiConstants::PREVIEW_CHARS).collect();
    if text.chars().count() > UiConstants::PREVIEW_CHARS {
        preview.push('…');
    }
    preview
        .lines()
        .map(|l| Line::from(Span::styled(l.to_string(), Styles::text())))
        .collect()
}
