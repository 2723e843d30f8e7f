//! 主布局渲染

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::components;
use super::theme::Styles;
use crate::model::{App, SIDEBAR_WIDTH};

/// 渲染主布局
pub fn render(app: &App, frame: &mut Frame) {
    let size = frame.area();

    // 三层布局：项目栏 + 主内容区 + 状态栏
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(size);

    components::project_bar::render(app, frame, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
        .split(rows[1]);

    components::sidebar::render(app, frame, columns[0]);
    render_page(app, frame, columns[1]);
    components::statusbar::render(app, frame, rows[2]);

    if app.show_help {
        components::help::render(frame);
    }
}

/// 当前页面放进带边框的内容区；选择框打开时代替页面居中显示
fn render_page(app: &App, frame: &mut Frame, area: Rect) {
    let page = app.active_page();
    let block = Block::default()
        .title(format!(" {} {} ", app.active.icon(), page.name()))
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border(app.focus.is_content()));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    match &app.picker {
        Some(picker) => components::picker::render(picker, frame, inner),
        None => frame.render_widget(Paragraph::new(page.view()), inner),
    }
}
