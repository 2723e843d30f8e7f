//! 帮助浮层

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::centered_rect;
use crate::view::theme::Styles;

const BINDINGS: [(&str, &str); 10] = [
    ("tab", "Sidebar → content"),
    ("←", "Back to sidebar"),
    ("↑↓/jk", "Move between pages"),
    ("enter/→", "Open page"),
    ("1-9", "Jump to page"),
    ("p", "Select project"),
    ("b", "Select board"),
    ("?", "Toggle this help"),
    ("q", "Quit"),
    ("ctrl+c", "Quit (closes picker when open)"),
];

/// 渲染帮助浮层
pub fn render(frame: &mut Frame) {
    let height = u16::try_from(BINDINGS.len()).unwrap_or(u16::MAX) + 6;
    let area = centered_rect(48, height, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Styles::border(true));
    let inner = Rect::new(
        area.x + 2,
        area.y + 1,
        area.width.saturating_sub(4),
        area.height.saturating_sub(2),
    );
    frame.render_widget(block, area);

    let mut lines = vec![Line::styled("Global shortcuts", Styles::title()), Line::default()];
    lines.extend(BINDINGS.iter().map(|(key, desc)| {
        Line::from(vec![
            Span::styled(format!("  {key:<9}"), Styles::hint_key()),
            Span::styled(*desc, Styles::value()),
        ])
    }));
    lines.push(Line::default());
    lines.push(Line::styled("Press any key to close", Styles::muted()));

    frame.render_widget(Paragraph::new(lines), inner);
}
