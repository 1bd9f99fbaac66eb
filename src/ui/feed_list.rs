use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::truncate;
use crate::app::{App, CARD_HEIGHT};
use crate::types::{Item, MediaKind};
use crate::viewport::DeviceClass;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let class = app
        .feed
        .geometry()
        .map(|g| g.class())
        .unwrap_or(DeviceClass::Desktop);
    let area = centered_column(area, class.column_percent());

    let block = Block::default().borders(Borders::ALL).title(format!(
        " {} ({}) ",
        app.feed.query(),
        app.feed.items().len()
    ));

    if app.feed.items().is_empty() {
        let text = if app.feed.is_loading() {
            "Loading..."
        } else {
            "Nothing here"
        };
        let empty = Paragraph::new(text)
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let w = area.width.saturating_sub(2) as usize;
    let mut lines = Vec::with_capacity(app.feed.items().len() * CARD_HEIGHT);
    for (i, item) in app.feed.items().iter().enumerate() {
        lines.extend(card(item, i == app.selected, w));
    }

    let scroll = u16::try_from(app.scroll_top).unwrap_or(u16::MAX);
    let list = Paragraph::new(lines).block(block).scroll((scroll, 0));
    frame.render_widget(list, area);
}

/// Exactly `CARD_HEIGHT` lines for one item.
fn card(item: &Item, selected: bool, width: usize) -> [Line<'static>; CARD_HEIGHT] {
    let title_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let marker = if selected { "> " } else { "  " };
    let fixed = 10; // marker(2) + score(7) + space(1)
    let flex = width.saturating_sub(fixed).max(10);

    let media = match item.kind {
        MediaKind::Image => &item.image,
        MediaKind::Gif | MediaKind::Video => {
            if item.media_src.is_empty() {
                &item.embed
            } else {
                &item.media_src
            }
        }
        MediaKind::Link | MediaKind::Unknown => &item.link,
    };

    [
        Line::from(vec![
            Span::styled(marker, title_style),
            Span::styled(
                format!("▲{:>6} ", item.score),
                Style::default().fg(Color::Magenta),
            ),
            Span::styled(truncate(&item.title, flex), title_style),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("[{}] ", item.kind), Style::default().fg(Color::Cyan)),
            Span::styled(
                truncate(&item.display_url(), flex),
                Style::default().fg(Color::Gray),
            ),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(truncate(media, flex), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
    ]
}

fn centered_column(area: Rect, percent: u16) -> Rect {
    let side = (100 - percent.min(100)) / 2;
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(side),
            Constraint::Percentage(percent),
            Constraint::Min(0),
        ])
        .split(area)[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::item;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn card_shows_media_for_kind() {
        let mut it = item("a");
        it.image = "https://i.example.com/a.png".to_string();
        let lines = card(&it, false, 80);
        assert!(text(&lines[0]).contains("title a"));
        assert!(text(&lines[1]).contains("[image]"));
        assert!(text(&lines[2]).contains("a.png"));
        assert!(text(&lines[3]).is_empty());
    }

    #[test]
    fn gif_falls_back_to_embed() {
        let mut it = item("a");
        it.kind = MediaKind::Gif;
        it.embed = "https://embed.example.com/a".to_string();
        let lines = card(&it, true, 80);
        assert!(text(&lines[0]).starts_with("> "));
        assert!(text(&lines[2]).contains("embed.example.com"));
    }

    #[test]
    fn column_width_follows_class() {
        let area = Rect::new(0, 0, 100, 10);
        assert_eq!(centered_column(area, 100).width, 100);
        assert_eq!(centered_column(area, 60).width, 60);
        assert_eq!(centered_column(area, 60).x, 20);
    }
}
