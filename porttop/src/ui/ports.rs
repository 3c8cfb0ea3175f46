//! Listening ports table with per-cell coloring, selection highlight and a scrollbar.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use porttop_core::EnrichedPort;

use crate::ui::theme::{DIM_FG, HEADER_FG, LABEL_FG, SB_ARROW, SB_THUMB, SB_TRACK, SELECTED_BG};
use crate::ui::util::{cpu_color, truncate_middle};

const COLS: [Constraint; 8] = [
    Constraint::Length(6),      // Port
    Constraint::Length(8),      // PID
    Constraint::Length(17),     // Type
    Constraint::Percentage(25), // Command
    Constraint::Length(10),     // User
    Constraint::Length(10),     // Memory
    Constraint::Length(7),      // CPU
    Constraint::Min(8),         // Name
];

pub struct PortsView<'a> {
    pub ports: &'a [EnrichedPort],
    /// Indices into `ports` that pass the filter, in display order.
    pub visible: &'a [usize],
    /// Position within `visible`.
    pub selected: usize,
    pub scroll_offset: usize,
    pub auto_refresh: bool,
}

/// Rows of data that fit in `area` (borders and header excluded).
pub fn page_size(area: Rect) -> usize {
    area.height.saturating_sub(3).max(1) as usize
}

/// Row under a mouse position, as an index into the visible list.
pub fn row_at(area: Rect, column: u16, row: u16, scroll_offset: usize) -> Option<usize> {
    let first = area.y + 2; // border + header
    let last = area.y + area.height.saturating_sub(1);
    if column <= area.x || column >= area.x + area.width.saturating_sub(1) {
        return None;
    }
    if row < first || row >= last {
        return None;
    }
    Some(scroll_offset + (row - first) as usize)
}

pub fn draw_ports(f: &mut ratatui::Frame<'_>, area: Rect, v: &PortsView<'_>) {
    let shown = v.visible.len();
    let total = v.ports.len();
    let mut title = if shown == total {
        format!("Listening Ports ({total})")
    } else {
        format!("Listening Ports ({shown} of {total})")
    };
    if !v.auto_refresh {
        title.push_str(" [paused]");
    }
    f.render_widget(Block::default().borders(Borders::ALL).title(title), area);

    // Inner area and content area (reserve 2 columns for scrollbar)
    let inner = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };
    if inner.height < 1 || inner.width < 3 {
        return;
    }
    let content = Rect {
        x: inner.x,
        y: inner.y,
        width: inner.width.saturating_sub(2),
        height: inner.height,
    };

    if shown == 0 {
        let msg = if total == 0 {
            "No listening ports found"
        } else {
            "No ports match the filter"
        };
        f.render_widget(
            Paragraph::new(Span::styled(msg, Style::default().fg(DIM_FG))),
            content,
        );
        return;
    }

    let viewport_rows = content.height.saturating_sub(1) as usize;
    let max_off = shown.saturating_sub(viewport_rows);
    let offset = v.scroll_offset.min(max_off);

    let rows = v
        .visible
        .iter()
        .enumerate()
        .skip(offset)
        .take(viewport_rows)
        .map(|(pos, &ix)| {
            let p = &v.ports[ix];
            let name = match &p.custom_name {
                Some(n) => Cell::from(n.clone()).style(Style::default().fg(LABEL_FG)),
                None => Cell::from(""),
            };
            let row = Row::new(vec![
                Cell::from(p.port().to_string()).style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(p.pid().to_string()).style(Style::default().fg(DIM_FG)),
                Cell::from(format!("{} {}", p.icon, p.service_type)),
                Cell::from(truncate_middle(&p.record.command, 24)),
                Cell::from(truncate_middle(&p.record.user, 10)),
                Cell::from(p.memory.clone()),
                Cell::from(p.cpu.clone()).style(Style::default().fg(cpu_color(&p.cpu))),
                name,
            ]);
            if pos == v.selected {
                row.style(Style::default().bg(SELECTED_BG).add_modifier(Modifier::BOLD))
            } else {
                row
            }
        });

    let header = Row::new(vec!["Port", "PID", "Type", "Command", "User", "Memory", "CPU", "Name"])
        .style(Style::default().fg(HEADER_FG).add_modifier(Modifier::BOLD));

    let table = Table::new(rows, COLS.to_vec())
        .header(header)
        .column_spacing(1);
    f.render_widget(table, content);

    let scroll_area = Rect {
        x: inner.x + inner.width.saturating_sub(1),
        y: inner.y,
        width: 1,
        height: inner.height,
    };
    draw_scrollbar(f, scroll_area, shown, viewport_rows, offset);
}

fn draw_scrollbar(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    total_rows: usize,
    viewport_rows: usize,
    offset: usize,
) {
    if area.height < 3 {
        return;
    }
    let track = (area.height - 2) as usize;
    let total = total_rows.max(1);
    let view = viewport_rows.clamp(1, total);
    let max_off = total.saturating_sub(view);

    let thumb_len = (track * view).div_ceil(total).max(1).min(track);
    let thumb_top = if max_off == 0 {
        0
    } else {
        ((track - thumb_len) * offset + max_off / 2) / max_off
    };

    let mut lines: Vec<Line> = Vec::with_capacity(area.height as usize);
    lines.push(Line::from(Span::styled("▲", Style::default().fg(SB_ARROW))));
    for i in 0..track {
        let (glyph, color) = if i >= thumb_top && i < thumb_top + thumb_len {
            ("█", SB_THUMB)
        } else {
            ("│", SB_TRACK)
        };
        lines.push(Line::from(Span::styled(glyph, Style::default().fg(color))));
    }
    lines.push(Line::from(Span::styled("▼", Style::default().fg(SB_ARROW))));
    f.render_widget(Paragraph::new(lines), area);
}

/// Keep `selected` inside the viewport by moving `offset`.
pub fn ensure_visible(selected: usize, offset: &mut usize, page: usize) {
    if page == 0 {
        return;
    }
    if selected < *offset {
        *offset = selected;
    } else if selected >= *offset + page {
        *offset = selected + 1 - page;
    }
}
