//! Modal prompts: kill confirmation and label entry.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::ui::theme::{DIM_FG, ERROR_FG, HEADER_FG};
use crate::ui::util::centered;

pub fn draw_confirm_kill(f: &mut ratatui::Frame<'_>, area: Rect, port: u16, name: &str) {
    let rect = centered(area, 52, 5);
    f.render_widget(Clear, rect);
    let lines = vec![
        Line::from(vec![
            Span::raw("Kill everything listening on port "),
            Span::styled(port.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("?"),
        ]),
        Line::from(Span::styled(format!("({name})"), Style::default().fg(DIM_FG))),
        Line::from(Span::styled("y = kill, any other key = cancel", Style::default().fg(DIM_FG))),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Confirm")
        .border_style(Style::default().fg(ERROR_FG));
    f.render_widget(Paragraph::new(lines).block(block), rect);
}

pub fn draw_rename(f: &mut ratatui::Frame<'_>, area: Rect, port: u16, buffer: &str) {
    let rect = centered(area, 52, 5);
    f.render_widget(Clear, rect);
    let lines = vec![
        Line::from(vec![
            Span::styled("> ", Style::default().fg(HEADER_FG)),
            Span::raw(buffer.to_string()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Enter = save, empty clears, Esc = cancel",
            Style::default().fg(DIM_FG),
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Name for port {port}"))
        .border_style(Style::default().fg(HEADER_FG));
    f.render_widget(Paragraph::new(lines).block(block), rect);
}
