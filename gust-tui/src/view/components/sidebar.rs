//! 左侧页面导航

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::model::{App, PAGE_ORDER};
use crate::view::theme::Styles;

/// 渲染侧边栏
pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" gust ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border(app.focus.is_sidebar()));

    let items: Vec<ListItem> = app
        .pages
        .iter()
        .enumerate()
        .map(|(i, (id, page))| {
            let is_active = id == app.active;
            let prefix = if is_active { "▶ " } else { "  " };
            let content = format!("{prefix}{} {} {}", i + 1, id.icon(), page.name());
            let style = if is_active {
                Styles::selected()
            } else {
                Styles::value()
            };
            ListItem::new(Line::from(Span::styled(content, style)))
        })
        .collect();

    let mut state = ListState::default();
    state.select(PAGE_ORDER.iter().position(|id| *id == app.active));

    frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
}
