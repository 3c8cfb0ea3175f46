//! Top header (port count, active filters, last refresh) and the bottom status line.

use chrono::{DateTime, Local};
use porttop_core::{PortFilter, ServiceKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::theme::{DIM_FG, ERROR_FG, HEADER_FG};

pub struct HeaderView<'a> {
    /// Latest summary poll: listener count or scan error.
    pub summary: Option<&'a Result<usize, String>>,
    pub filter: &'a PortFilter,
    pub editing_filter: bool,
    pub counts: &'a [(ServiceKind, usize)],
    pub last_refresh: Option<DateTime<Local>>,
}

pub fn summary_text(summary: Option<&Result<usize, String>>) -> String {
    match summary {
        None => "scanning...".into(),
        Some(Ok(1)) => "1 port".into(),
        Some(Ok(n)) => format!("{n} ports"),
        Some(Err(e)) => format!("scan failed: {e}"),
    }
}

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, h: &HeaderView<'_>) {
    let summary_style = match h.summary {
        Some(Err(_)) => Style::default().fg(ERROR_FG),
        _ => Style::default().fg(HEADER_FG).add_modifier(Modifier::BOLD),
    };
    let mut top = vec![
        Span::styled("porttop ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(summary_text(h.summary), summary_style),
    ];
    if h.editing_filter || !h.filter.text.is_empty() {
        let cursor = if h.editing_filter { "_" } else { "" };
        top.push(Span::raw(format!("  filter: {}{cursor}", h.filter.text)));
    }
    if let Some(t) = h.last_refresh {
        top.push(Span::styled(
            format!("  updated {}", t.format("%H:%M:%S")),
            Style::default().fg(DIM_FG),
        ));
    }
    top.push(Span::styled(
        "  (q quit, / filter, t type, K kill, n name, o open, y copy kill, r refresh)",
        Style::default().fg(DIM_FG),
    ));

    let mut chips: Vec<Span> = vec![Span::styled("types: ", Style::default().fg(DIM_FG))];
    if h.counts.is_empty() {
        chips.push(Span::styled("none", Style::default().fg(DIM_FG)));
    }
    for (kind, n) in h.counts {
        let style = if h.filter.kind == Some(*kind) {
            Style::default()
                .fg(HEADER_FG)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default()
        };
        chips.push(Span::styled(format!("{} {} {n}", kind.icon(), kind.label()), style));
        chips.push(Span::raw("  "));
    }

    f.render_widget(Paragraph::new(vec![Line::from(top), Line::from(chips)]), area);
}

pub fn draw_status(f: &mut ratatui::Frame<'_>, area: Rect, status: Option<&str>) {
    let line = match status {
        Some(s) if s.starts_with("error") => {
            Line::from(Span::styled(s.to_string(), Style::default().fg(ERROR_FG)))
        }
        Some(s) => Line::from(s.to_string()),
        None => Line::from(Span::styled(
            "a toggle list refresh, d toggle detail refresh, T clear type filter",
            Style::default().fg(DIM_FG),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}
