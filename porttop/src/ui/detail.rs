//! Detail panel for the selected port.

use porttop_core::EnrichedPort;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::ui::theme::{DIM_FG, HEADER_FG, LABEL_FG};
use crate::ui::util::cpu_color;

fn field<'a>(name: &'a str, value: String, style: Style) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{name:<9}"), Style::default().fg(HEADER_FG)),
        Span::styled(value, style),
    ])
}

pub fn draw_detail(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    p: Option<&EnrichedPort>,
    auto_refresh: bool,
) {
    let title = if auto_refresh {
        "Details".to_string()
    } else {
        "Details [paused]".to_string()
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let Some(p) = p else {
        f.render_widget(
            Paragraph::new(Span::styled("No port selected", Style::default().fg(DIM_FG)))
                .block(block),
            area,
        );
        return;
    };

    let plain = Style::default();
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} {}", p.icon, p.display_name()),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field("Port", p.port().to_string(), plain),
        field("PID", p.pid().to_string(), plain),
        field("Type", p.service_type.to_string(), plain),
        field("Command", p.record.command.clone(), plain),
        field("User", p.record.user.clone(), plain),
        field("Uptime", p.uptime.clone(), plain),
        field("Memory", p.memory.clone(), plain),
        field("CPU", p.cpu.clone(), Style::default().fg(cpu_color(&p.cpu))),
    ];
    if let Some(name) = &p.custom_name {
        lines.push(field("Label", name.clone(), Style::default().fg(LABEL_FG)));
    }
    lines.push(Line::from(""));
    lines.push(field("URL", p.record.url(), plain));
    lines.push(field("Kill", p.kill_command(), Style::default().fg(DIM_FG)));

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}
