//! 顶部项目栏

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::model::App;
use crate::view::theme::Styles;

/// 渲染项目栏
pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    frame.render_widget(Paragraph::new(line(app)).style(Styles::statusbar()), area);
}

/// `Project: X  Board: Y`，侧边栏聚焦时提示 `[p] change`
pub fn line(app: &App) -> Line<'static> {
    let value = |v: &str| {
        if v.is_empty() {
            Span::styled("(none)", Styles::muted())
        } else {
            Span::styled(v.to_string(), Styles::accent())
        }
    };
    let mut spans = vec![
        Span::styled(" Project: ", Styles::hint_desc()),
        value(&app.selection.project),
        Span::styled("  Board: ", Styles::hint_desc()),
        value(&app.selection.board),
    ];
    if !app.selection.shield.is_empty() {
        spans.push(Span::styled("  Shield: ", Styles::hint_desc()));
        spans.push(value(&app.selection.shield));
    }
    if app.focus.is_sidebar() {
        spans.push(Span::styled("  [p] change", Styles::hint_key()));
    }
    Line::from(spans)
}
