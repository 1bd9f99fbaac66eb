mod feed_list;
mod popup;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, InputMode};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    feed_list::render(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    if app.mode == InputMode::Query {
        popup::render_input(frame, "Query", &app.query_input);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        format!("scrollfeed - {}", app.feed.query()),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(geometry) = app.feed.geometry() {
        spans.push(Span::styled(
            format!(
                "  {}x{} {} {}",
                geometry.width(),
                geometry.height(),
                geometry.class(),
                geometry.orientation()
            ),
            Style::default().fg(Color::Gray),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(error) = app.error.as_deref().or(app.feed.error()) {
        Line::from(vec![Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )])
    } else if let Some(notice) = &app.notice {
        Line::from(vec![Span::styled(
            notice.as_str(),
            Style::default().fg(Color::Green),
        )])
    } else if let Some(request) = app.feed.in_flight() {
        let text = if request.after.is_empty() {
            format!("Loading {}...", request.query)
        } else {
            format!("Loading more of {}...", request.query)
        };
        Line::from(vec![Span::styled(text, Style::default().fg(Color::Yellow))])
    } else {
        let help = match app.mode {
            InputMode::Normal => {
                "j/k/g/G: nav | Ctrl+d/u: page | Enter: open | y: yank | /: query | r: random | R: refresh | q: quit"
            }
            InputMode::Query => "Enter: load | Esc: cancel",
        };
        let mut spans = vec![Span::styled(help, Style::default().fg(Color::Gray))];
        if app.feed.is_exhausted() {
            spans.push(Span::styled(
                "  end of feed",
                Style::default().fg(Color::DarkGray),
            ));
        }
        if let Some(at) = app.last_loaded {
            spans.push(Span::styled(
                format!("  updated {}", at.format("%H:%M:%S")),
                Style::default().fg(Color::DarkGray),
            ));
        }
        Line::from(spans)
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}

/// Cut `s` to at most `width` characters, marking the cut with "...".
pub(crate) fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let keep = width.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str(&"..."[..width.min(3)]);
    out
}
