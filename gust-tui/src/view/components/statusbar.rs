//! 底部状态栏

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::model::{App, FocusArea};
use crate::pages::KeyHint;
use crate::view::theme::Styles;

/// 渲染状态栏
pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = Vec::new();
    for (i, (key, desc)) in hints(app).iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(*key, Styles::hint_key()));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(*desc, Styles::hint_desc()));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Styles::statusbar());
    frame.render_widget(paragraph, area);
}

/// 根据焦点生成快捷键提示
pub fn hints(app: &App) -> Vec<KeyHint> {
    if app.picker.is_some() {
        return vec![("↑/↓", "move"), ("enter", "select"), ("esc", "close")];
    }

    let mut hints = match app.focus {
        FocusArea::Sidebar => vec![
            ("↑/↓", "navigate"),
            ("enter", "select"),
            ("p", "project"),
            ("b", "board"),
        ],
        FocusArea::Content => app.active_page().short_help(),
    };
    hints.extend([("tab", "focus"), ("?", "help"), ("q", "quit")]);
    hints
}

#[cfg(test)]
mod tests {
    use gust_core::GustConfig;

    use super::*;
    use crate::model::PageId;
    use crate::pages::testing::harness;

    #[test]
    fn test_hints_follow_focus() {
        let h = harness(GustConfig::default());
        let mut app = App::new(h.services.clone(), &GustConfig::default());

        let sidebar: Vec<&str> = hints(&app).iter().map(|(k, _)| *k).collect();
        assert_eq!(sidebar, ["↑/↓", "enter", "p", "b", "tab", "?", "q"]);

        app.focus = FocusArea::Content;
        app.active = PageId::Flash;
        let content: Vec<&str> = hints(&app).iter().map(|(k, _)| *k).collect();
        assert_eq!(content, ["f", "c", "tab", "?", "q"]);
    }
}
