//! UI rendering for the live view.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::core::{format_clock, Clock};
use crate::features::tracker::{format_duration, format_hms, TimerPhase};
use crate::storage::KeyValueStore;
use crate::tui::app::{App, BreakPrompt};

/// Render the application UI.
pub fn render<S: KeyValueStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>) {
    // Header, timer, totals, history, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_timer(frame, app, chunks[1]);
    render_totals(frame, app, chunks[2]);
    render_history(frame, app, chunks[3]);
    render_status_bar(frame, app, chunks[4]);

    if let Some(prompt) = &app.prompt {
        render_prompt(frame, prompt);
    }
}

fn phase_color(phase: TimerPhase) -> Color {
    match phase {
        TimerPhase::Idle => Color::White,
        TimerPhase::Reading { .. } => Color::Green,
        TimerPhase::OnBreakPendingConfirmation { .. } => Color::Yellow,
    }
}

fn render_header<S: KeyValueStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect) {
    let status = app.status();
    let title = format!(" readtime  {}  {} ", status.today, app.headline());

    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(phase_color(status.phase))
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    frame.render_widget(header, area);
}

fn render_timer<S: KeyValueStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect) {
    let status = app.status();
    let (label, seconds) = match status.pending_break_seconds {
        Some(seconds) => ("Break", seconds),
        None => ("Session", status.elapsed_seconds),
    };

    let line = Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::DarkGray)),
        Span::styled(
            format_hms(seconds),
            Style::default()
                .fg(phase_color(status.phase))
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let timer = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(timer, area);
}

fn render_totals<S: KeyValueStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect) {
    let status = app.status();
    let lines = vec![
        Line::from(vec![
            Span::raw("Reading today: "),
            Span::styled(
                format_duration(status.totals.reading_seconds),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(vec![
            Span::raw("Breaks today:  "),
            Span::styled(
                format_duration(status.totals.break_seconds),
                Style::default().fg(Color::Yellow),
            ),
        ]),
    ];

    let totals = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Totals "),
    );
    frame.render_widget(totals, area);
}

fn render_history<S: KeyValueStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect) {
    let sessions = app.todays_sessions();

    let items: Vec<ListItem<'_>> = sessions
        .iter()
        .rev()
        .map(|session| {
            let color = if session.is_break() {
                Color::Yellow
            } else {
                Color::Green
            };
            let mut spans = vec![
                Span::styled(
                    format!(
                        "{}-{} ",
                        format_clock(session.start),
                        format_clock(session.end)
                    ),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:<8}", session.kind.to_string()),
                    Style::default().fg(color),
                ),
                Span::raw(format_duration(session.duration_seconds)),
            ];

            if !session.activities.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", session.activities.join(", ")),
                    Style::default().fg(Color::Blue),
                ));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Today ({} sessions) ", sessions.len())),
    );

    frame.render_widget(list, area);
}

fn render_status_bar<S: KeyValueStore, C: Clock>(
    frame: &mut Frame<'_>,
    app: &App<S, C>,
    area: Rect,
) {
    let status_text = app
        .message
        .as_deref()
        .unwrap_or("s:start | x:stop | ?:help | q:quit");

    let status = Paragraph::new(status_text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status, area);
}

fn render_prompt(frame: &mut Frame<'_>, prompt: &BreakPrompt) {
    let height = u16::try_from(prompt.options.len()).unwrap_or(u16::MAX).saturating_add(4);
    let area = centered(frame.area(), 44, height);

    let items: Vec<ListItem<'_>> = prompt
        .options
        .iter()
        .zip(&prompt.checked)
        .map(|(label, checked)| {
            let mark = if *checked { "[x]" } else { "[ ]" };
            ListItem::new(format!("{mark} {label}"))
        })
        .collect();

    let title = format!(" Break {} ", format_duration(prompt.break_seconds));
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(title)
                .title_bottom(" Enter:confirm  Esc:dismiss "),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(prompt.selected));

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut state);
}

fn centered(outer: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(outer.width);
    let height = height.min(outer.height);
    Rect {
        x: outer.x + (outer.width - width) / 2,
        y: outer.y + (outer.height - height) / 2,
        width,
        height,
    }
}
