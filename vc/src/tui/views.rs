//! TUI views and rendering
//!
//! All rendering logic is contained here. The views module draws the UI
//! from AppState and only writes back viewport-derived scroll limits.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph, Tabs, Wrap};
use tracing::trace;

use super::form::{self, Control, ControlKind};
use super::state::{ApiStatus, AppState, InteractionMode, View};
use crate::domain::{Gap, GapSeverity, ScoreBand, SeverityFilter};
use crate::present::{GapPresentation, NO_GAPS_MESSAGE, PlanPresentation};
use crate::validation::FieldPath;
use crate::wizard::Wizard;

/// Palette
mod colors {
    use ratatui::style::Color;

    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const SELECTED_BG: Color = Color::Rgb(40, 40, 40);
    pub const DIM: Color = Color::DarkGray;

    pub const OK: Color = Color::Rgb(50, 205, 50); // Lime green
    pub const WARN: Color = Color::Rgb(255, 215, 0); // Gold
    pub const ORANGE: Color = Color::Rgb(255, 140, 0);
    pub const HIGH: Color = Color::Rgb(255, 69, 0); // Orange red
    pub const FAILED: Color = Color::Rgb(220, 20, 60); // Crimson
    pub const LOW: Color = Color::Rgb(100, 149, 237); // Cornflower blue
}

fn severity_color(severity: GapSeverity) -> Color {
    match severity {
        GapSeverity::Critical => colors::FAILED,
        GapSeverity::High => colors::HIGH,
        GapSeverity::Medium => colors::WARN,
        GapSeverity::Low => colors::LOW,
    }
}

fn score_color(score: u8) -> Color {
    match ScoreBand::from_score(score) {
        ScoreBand::Excellent => colors::OK,
        ScoreBand::Good => colors::WARN,
        ScoreBand::NeedsImprovement => colors::ORANGE,
        ScoreBand::CriticalGaps => colors::FAILED,
    }
}

/// Main render function
pub fn render(state: &mut AppState, frame: &mut Frame) {
    trace!(?state.current_view, "render: called");
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(state, frame, chunks[0]);

    match state.current_view {
        View::Wizard => render_wizard(state, frame, chunks[1]),
        View::Plan => render_plan(state, frame, chunks[1]),
        View::GapAnalysis => render_gaps(state, frame, chunks[1]),
    }

    render_footer(state, frame, chunks[2]);

    match &state.interaction_mode {
        InteractionMode::Help => render_help_overlay(state.current_view, frame, frame.area()),
        InteractionMode::Alert { title, message } => render_alert(title, message, frame, frame.area()),
        InteractionMode::Normal => {}
    }
}

/// Header: service indicator, title, view and context
fn render_header(state: &AppState, frame: &mut Frame, area: Rect) {
    let indicator_color = match state.api_status {
        ApiStatus::Healthy => colors::OK,
        ApiStatus::Unknown => colors::WARN,
        ApiStatus::Unreachable => colors::FAILED,
    };

    let left = Line::from(vec![
        Span::raw(" "),
        Span::styled("●", Style::default().fg(indicator_color)),
        Span::styled(" vCISO", Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD)),
        Span::raw(" │ "),
        Span::styled(
            state.current_view.display_name(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);

    let context = match state.current_view {
        View::Wizard => format!(
            "{} · {}% complete ",
            state.wizard.step(),
            state.wizard.percent_complete()
        ),
        View::Plan => state
            .plan
            .as_ref()
            .map(|p| format!("{} ", p.plan().company_name()))
            .unwrap_or_default(),
        View::GapAnalysis => state
            .gaps
            .as_ref()
            .map(|g| format!("{} • {} ", g.analysis().company_name, g.analysis().analysis_date()))
            .unwrap_or_default(),
    };
    let right = Line::from(Span::styled(context, Style::default().fg(colors::DIM)));

    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(right.width() as u16)])
        .split(inner);
    frame.render_widget(Paragraph::new(left), chunks[0]);
    frame.render_widget(Paragraph::new(right), chunks[1]);
}

/// Questionnaire: step title, progress, banner, controls and navigation
fn render_wizard(state: &mut AppState, frame: &mut Frame, area: Rect) {
    trace!(step = ?state.wizard.step(), focus = state.focus, "render_wizard: called");
    let wizard = &state.wizard;
    let step = wizard.step();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title + subtitle
            Constraint::Length(1), // Progress
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Controls
            Constraint::Length(1), // Navigation
        ])
        .split(area.inner(Margin {
            horizontal: 2,
            vertical: 1,
        }));

    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            step.title(),
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(step.subtitle(), Style::default().fg(colors::DIM))),
    ]);
    frame.render_widget(title, chunks[0]);

    let percent = wizard.percent_complete();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(colors::HEADER).bg(colors::SELECTED_BG))
        .ratio(f64::from(percent) / 100.0)
        .label(format!("{} · {}% complete", step, percent));
    frame.render_widget(gauge, chunks[1]);

    let controls = state.controls();
    let (lines, focused_line) = control_lines(wizard, &controls, state.focus);

    // Keep the focused control in view
    let viewport = chunks[3].height as usize;
    let scroll = focused_line.saturating_sub(viewport.saturating_sub(2));
    let body = Paragraph::new(lines).scroll((scroll as u16, 0));
    frame.render_widget(body, chunks[3]);

    frame.render_widget(Paragraph::new(navigation_line(state)), chunks[4]);
}

/// Lines for the step's controls, plus the index of the focused line
fn control_lines<'a>(wizard: &'a Wizard, controls: &[Control], focus: usize) -> (Vec<Line<'a>>, usize) {
    let mut lines = Vec::new();
    if let Some(banner) = wizard.banner() {
        lines.push(Line::from(Span::styled(
            format!("! {}", banner),
            Style::default().fg(colors::FAILED).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }

    let mut focused_line = 0;
    for (i, control) in controls.iter().enumerate() {
        let starts_group = i == 0 || controls[i - 1].field != control.field;
        if starts_group {
            if i > 0 {
                push_field_error(&mut lines, wizard, controls[i - 1].field);
            }
            if let Some(heading) = form::heading(control.field) {
                if i > 0 {
                    lines.push(Line::from(""));
                }
                lines.push(Line::from(Span::styled(
                    heading,
                    Style::default().add_modifier(Modifier::BOLD),
                )));
            }
        }
        if i == focus {
            focused_line = lines.len();
        }
        lines.push(control_line(wizard, control, i == focus));
    }
    if let Some(last) = controls.last() {
        push_field_error(&mut lines, wizard, last.field);
    }

    (lines, focused_line)
}

fn push_field_error<'a>(lines: &mut Vec<Line<'a>>, wizard: &'a Wizard, field: FieldPath) {
    if let Some(message) = wizard.field_error(field) {
        lines.push(Line::from(Span::styled(
            format!("  ✗ {}", message),
            Style::default().fg(colors::FAILED),
        )));
    }
}

fn control_line<'a>(wizard: &'a Wizard, control: &Control, focused: bool) -> Line<'a> {
    let marker = if focused {
        Span::styled("› ", Style::default().fg(colors::KEYBIND).add_modifier(Modifier::BOLD))
    } else {
        Span::raw("  ")
    };

    let mut spans = vec![marker];
    match control.kind {
        ControlKind::Text => {
            let value = wizard.text(control.field);
            spans.push(Span::raw("["));
            if value.is_empty() {
                spans.push(Span::styled(control.label, Style::default().fg(colors::DIM)));
            } else {
                spans.push(Span::raw(value));
            }
            if focused {
                spans.push(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)));
            }
            spans.push(Span::raw("]"));
        }
        ControlKind::Radio => {
            let on = wizard.selected(control.field) == control.value;
            spans.push(check_span(if on { "(•) " } else { "( ) " }, on));
            spans.push(Span::raw(control.label));
        }
        ControlKind::Checkbox => {
            let on = wizard.checked(control.field).iter().any(|l| l == control.value);
            spans.push(check_span(if on { "[x] " } else { "[ ] " }, on));
            spans.push(Span::raw(control.label));
        }
    }

    let line = Line::from(spans);
    if focused {
        line.style(Style::default().bg(colors::SELECTED_BG))
    } else {
        line
    }
}

fn check_span(mark: &'static str, on: bool) -> Span<'static> {
    if on {
        Span::styled(mark, Style::default().fg(colors::OK).add_modifier(Modifier::BOLD))
    } else {
        Span::styled(mark, Style::default().fg(colors::DIM))
    }
}

/// Back / Next / Generate buttons
fn navigation_line(state: &AppState) -> Line<'static> {
    let wizard = &state.wizard;
    let key = Style::default().fg(colors::KEYBIND).add_modifier(Modifier::BOLD);

    let back = if wizard.step().number() == 1 {
        vec![Span::styled("[Esc] Back", Style::default().fg(colors::DIM))]
    } else {
        vec![Span::styled("[Esc]", key), Span::raw(" Back")]
    };

    let forward = if wizard.is_submitting() {
        vec![Span::styled(
            format!("{} Generating Your Plan...", state.spinner()),
            Style::default().fg(colors::WARN),
        )]
    } else if wizard.step().is_last() {
        vec![
            Span::styled("[Enter]", key),
            Span::styled(" Generate My IR Plan", Style::default().add_modifier(Modifier::BOLD)),
        ]
    } else {
        vec![Span::styled("[Enter]", key), Span::raw(" Next")]
    };

    let mut spans = back;
    spans.push(Span::raw("    "));
    spans.extend(forward);
    Line::from(spans)
}

/// Visual line count once wrapped to `width`
fn wrapped_height(lines: &[Line<'_>], width: usize) -> usize {
    lines
        .iter()
        .map(|line| {
            let line_width = line.width();
            if width == 0 || line_width == 0 {
                1
            } else {
                line_width.div_ceil(width)
            }
        })
        .sum()
}

/// Generated plan as rendered markdown
fn render_plan(state: &mut AppState, frame: &mut Frame, area: Rect) {
    let Some(plan) = state.plan.as_ref() else {
        render_empty_message(frame, area, "No plan generated yet");
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    frame.render_widget(Paragraph::new(plan_status_line(plan, state.spinner())), chunks[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Incident Response Plan ")
        .title_style(Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD));
    let inner = block.inner(chunks[1]).inner(Margin {
        horizontal: 1,
        vertical: 0,
    });
    frame.render_widget(block, chunks[1]);

    if plan.plan().markdown().trim().is_empty() {
        render_empty_message(frame, inner, "The plan service returned an empty plan");
        return;
    }

    let text = plan.rendered();
    let viewport_height = inner.height as usize;
    let max_scroll = wrapped_height(&text.lines, inner.width as usize).saturating_sub(viewport_height);
    let scroll = plan.scroll().min(max_scroll);

    let body = Paragraph::new(text).wrap(Wrap { trim: false }).scroll((scroll as u16, 0));
    frame.render_widget(body, inner);

    state.plan_max_scroll = max_scroll;
    state.viewport_height = viewport_height;
}

/// Busy indicators, the inline analysis error, or plan metadata
///
/// The analysis error stays up until the next analysis starts, alongside an
/// export in progress.
fn plan_status_line(plan: &PlanPresentation, spinner: &str) -> Line<'static> {
    if plan.is_analyzing() {
        return Line::from(Span::styled(
            format!(" {} Analyzing your plan...", spinner),
            Style::default().fg(colors::WARN),
        ));
    }

    let mut spans = Vec::new();
    if plan.is_exporting() {
        spans.push(Span::styled(
            format!(" {} Exporting...", spinner),
            Style::default().fg(colors::WARN),
        ));
    }
    if let Some(error) = plan.analysis_error() {
        spans.push(Span::styled(format!(" {}", error), Style::default().fg(colors::FAILED)));
    }
    if !spans.is_empty() {
        return Line::from(spans);
    }

    let meta = plan.plan().metadata();
    let parts: Vec<String> = [
        (!meta.industry.is_empty()).then(|| meta.industry.clone()),
        (!meta.employee_count.is_empty()).then(|| format!("{} employees", meta.employee_count)),
        (!meta.generated_at.is_empty()).then(|| format!("generated {}", meta.generated_at)),
    ]
    .into_iter()
    .flatten()
    .collect();
    Line::from(Span::styled(format!(" {}", parts.join(" · ")), Style::default().fg(colors::DIM)))
}

/// Gap analysis report: summary on the left, filtered gaps on the right
fn render_gaps(state: &mut AppState, frame: &mut Frame, area: Rect) {
    let Some(gaps) = state.gaps.as_ref() else {
        render_empty_message(frame, area, "No gap analysis yet");
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    render_gap_summary(gaps, frame, columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(columns[1]);

    let analysis = gaps.analysis();
    let titles: Vec<String> = SeverityFilter::ALL
        .iter()
        .enumerate()
        .map(|(i, filter)| {
            let count = match filter {
                SeverityFilter::All => analysis.gaps.len(),
                SeverityFilter::Only(severity) => analysis.count_by_severity(*severity),
            };
            format!("{} {} ({})", i, filter.label(), count)
        })
        .collect();
    let selected = SeverityFilter::ALL.iter().position(|f| *f == gaps.filter());
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(colors::DIM))
        .highlight_style(Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(tabs, right[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", gaps.heading()))
        .title_style(Style::default().add_modifier(Modifier::BOLD));
    let inner = block.inner(right[1]).inner(Margin {
        horizontal: 1,
        vertical: 0,
    });
    frame.render_widget(block, right[1]);

    let visible = gaps.visible_gaps();
    if visible.is_empty() {
        render_empty_message(frame, inner, NO_GAPS_MESSAGE);
        state.gaps_max_scroll = 0;
        return;
    }

    let mut lines = Vec::new();
    for gap in visible {
        lines.extend(gap_card(gap));
    }

    let viewport_height = inner.height as usize;
    let max_scroll = wrapped_height(&lines, inner.width as usize).saturating_sub(viewport_height);
    let scroll = gaps.scroll().min(max_scroll);
    let body = Paragraph::new(lines).wrap(Wrap { trim: false }).scroll((scroll as u16, 0));
    frame.render_widget(body, inner);

    state.gaps_max_scroll = max_scroll;
    state.viewport_height = viewport_height;
}

/// Score, framework bars, strengths and priority actions
fn render_gap_summary(gaps: &GapPresentation, frame: &mut Frame, area: Rect) {
    let analysis = gaps.analysis();
    let score = analysis.overall_score;
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{}", score),
                Style::default().fg(score_color(score)).add_modifier(Modifier::BOLD),
            ),
            Span::styled("/100  ", Style::default().fg(colors::DIM)),
            Span::styled(gaps.score_band().label(), Style::default().fg(score_color(score))),
        ]),
        Line::from(""),
    ];

    if !analysis.framework_compliance.is_empty() {
        lines.push(Line::from(Span::styled("Framework Compliance", bold)));
        for (framework, pct) in &analysis.framework_compliance {
            lines.push(Line::from(framework.as_str()));
            lines.push(Line::from(vec![
                Span::styled(compliance_bar(*pct, 20), Style::default().fg(score_color(*pct))),
                Span::raw(format!(" {}%", pct)),
            ]));
        }
        lines.push(Line::from(""));
    }

    if !analysis.strengths.is_empty() {
        lines.push(Line::from(Span::styled(
            "What You're Doing Well",
            bold.fg(colors::OK),
        )));
        for strength in &analysis.strengths {
            lines.push(Line::from(vec![
                Span::styled("✓ ", Style::default().fg(colors::OK)),
                Span::raw(strength.as_str()),
            ]));
        }
        lines.push(Line::from(""));
    }

    if !analysis.priority_actions.is_empty() {
        lines.push(Line::from(Span::styled("Priority Actions", bold)));
        for (i, action) in analysis.priority_actions.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("{}. ", i + 1), Style::default().fg(colors::KEYBIND)),
                Span::raw(action.as_str()),
            ]));
        }
    }

    let summary = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Compliance Score ")
                .title_style(Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(summary, area);
}

/// `width` cells, filled in proportion to `pct`
fn compliance_bar(pct: u8, width: usize) -> String {
    let filled = (usize::from(pct.min(100)) * width).div_ceil(100);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn gap_card(gap: &Gap) -> Vec<Line<'_>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let color = severity_color(gap.severity);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(gap.section.as_str(), bold),
            Span::raw("  "),
            Span::styled(
                format!(" {} Priority ", gap.severity.label()),
                Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  Effort: {}", gap.estimated_effort), Style::default().fg(colors::DIM)),
        ]),
        Line::from(Span::styled("What's Missing:", bold)),
        Line::from(format!("  {}", gap.description)),
        Line::from(Span::styled("Recommended Action:", bold)),
        Line::from(format!("  {}", gap.recommendation)),
    ];
    if !gap.framework_references.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Framework References: ", bold),
            Span::styled(gap.framework_references.join(", "), Style::default().fg(colors::DIM)),
        ]));
    }
    lines.push(Line::from(""));
    lines
}

/// Footer: error, notice, or context-sensitive keybinds
fn render_footer(state: &AppState, frame: &mut Frame, area: Rect) {
    if let Some(error) = &state.error_message {
        let footer = Paragraph::new(Line::from(Span::styled(
            format!(" Error: {}", error),
            Style::default().fg(colors::FAILED),
        )))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, area);
        return;
    }
    if let Some(status) = &state.status_message {
        let footer = Paragraph::new(Line::from(Span::styled(
            format!(" {}", status),
            Style::default().fg(colors::OK),
        )))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, area);
        return;
    }

    let keybinds: Vec<(&str, &str)> = match state.current_view {
        View::Wizard => {
            let forward = if state.wizard.step().is_last() {
                "Generate"
            } else {
                "Next"
            };
            vec![
                ("[↑↓]", "Move"),
                ("[Space]", "Select"),
                ("[Enter]", forward),
                ("[Esc]", "Back"),
            ]
        }
        View::Plan => vec![
            ("[j/k]", "Scroll"),
            ("[c]", "Copy"),
            ("[p]", "Export as PDF"),
            ("[a]", "Gap Analysis"),
            ("[n]", "New Plan"),
        ],
        View::GapAnalysis => vec![
            ("[←→]", "Filter"),
            ("[j/k]", "Scroll"),
            ("[e]", "Export Report (JSON)"),
            ("[b]", "Back to Plan"),
        ],
    };

    let key_style = Style::default().fg(colors::KEYBIND).add_modifier(Modifier::BOLD);
    let mut left_spans = vec![Span::raw(" ")];
    for (key, action) in keybinds {
        left_spans.push(Span::styled(key, key_style));
        left_spans.push(Span::raw(format!(" {} ", action)));
    }

    let right_line = Line::from(vec![
        Span::styled("[?]", key_style),
        Span::raw(" Help "),
        Span::styled("[q]", key_style),
        Span::raw(" Quit "),
    ]);

    let footer_block = Block::default().borders(Borders::ALL);
    let inner = footer_block.inner(area);
    frame.render_widget(footer_block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(right_line.width() as u16)])
        .split(inner);

    frame.render_widget(Paragraph::new(Line::from(left_spans)), chunks[0]);
    frame.render_widget(Paragraph::new(right_line), chunks[1]);
}

/// Render help overlay for the current view
fn render_help_overlay(view: View, frame: &mut Frame, area: Rect) {
    trace!(?view, "render_help_overlay: called");
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let section = |title: &'static str| Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD)));

    let mut help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                .fg(colors::HEADER),
        )),
        Line::from(""),
        section("Global"),
        key_line("?", "Toggle help"),
        key_line("q", "Quit (outside text fields)"),
        key_line("Ctrl+C", "Quit immediately"),
        Line::from(""),
    ];

    match view {
        View::Wizard => help_text.extend([
            section("Questionnaire"),
            key_line("Tab/↓", "Next control"),
            key_line("S-Tab/↑", "Previous control"),
            key_line("Space", "Select option / toggle checkbox"),
            key_line("Enter", "Next step, or generate the plan on the last step"),
            key_line("Esc", "Previous step"),
            key_line("Backspace", "Delete in a text field"),
        ]),
        View::Plan => help_text.extend([
            section("Plan"),
            key_line("j/↓ k/↑", "Scroll"),
            key_line("PgDn/PgUp", "Scroll a page"),
            key_line("g / G", "Top / bottom"),
            key_line("c", "Copy plan markdown to the clipboard"),
            key_line("p", "Export as PDF"),
            key_line("a", "Run gap analysis"),
            key_line("n", "Start a new plan"),
        ]),
        View::GapAnalysis => help_text.extend([
            section("Gap Analysis"),
            key_line("←/h →/l", "Cycle severity filter"),
            key_line("0-4", "All / Critical / High / Medium / Low"),
            key_line("j/↓ k/↑", "Scroll gaps"),
            key_line("e", "Export report as JSON"),
            key_line("b/Esc", "Back to plan"),
        ]),
    }

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help (? to close) ")
                .style(Style::default().bg(Color::Black)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(help, popup_area);
}

/// Helper to create a key binding line
fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<12}", key), Style::default().fg(colors::KEYBIND)),
        Span::raw(desc),
    ])
}

/// Modal notice
fn render_alert(title: &str, message: &str, frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(50, 20, area);
    frame.render_widget(Clear, popup_area);

    let content = vec![
        Line::from(""),
        Line::from(message),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to continue",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let alert = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", title))
                .style(Style::default().bg(Color::Black)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(alert, popup_area);
}

/// Render empty state message
fn render_empty_message(frame: &mut Frame, area: Rect, message: &str) {
    let inner = area.inner(Margin {
        horizontal: 2,
        vertical: 2,
    });

    let empty = Paragraph::new(message)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);

    frame.render_widget(empty, inner);
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
