//! 选择框浮层

use ratatui::{
    layout::Rect,
    widgets::{Clear, Paragraph},
    Frame,
};

use super::centered_rect;
use crate::model::Picker;

/// 选择框自带边框，这里只负责在 `area` 内居中和清底
pub fn render(picker: &Picker, frame: &mut Frame, area: Rect) {
    let text = picker.view();
    let width = text.width();
    let height = text.height();
    let area = centered_rect(
        u16::try_from(width).unwrap_or(u16::MAX),
        u16::try_from(height).unwrap_or(u16::MAX),
        area,
    );
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(text), area);
}
