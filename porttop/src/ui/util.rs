//! Small UI helpers: truncation, value coloring, centered popups.

use ratatui::{layout::Rect, style::Color};

/// Shorten to at most `max` chars, keeping both ends. Counts chars, not bytes.
pub fn truncate_middle(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max {
        return s.to_string();
    }
    if max <= 3 {
        return "...".into();
    }
    let keep = max - 3;
    let left = keep / 2;
    let right = keep - left;
    let head: String = s.chars().take(left).collect();
    let tail: String = s.chars().skip(len - right).collect();
    format!("{head}...{tail}")
}

/// Color for a `ps`-style CPU string such as `"12.5%"`; unparsable reads as idle.
pub fn cpu_color(cpu: &str) -> Color {
    let v = cpu.trim_end_matches('%').parse::<f32>().unwrap_or(0.0);
    match v {
        x if x < 25.0 => Color::Green,
        x if x < 60.0 => Color::Yellow,
        _ => Color::Red,
    }
}

pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}
