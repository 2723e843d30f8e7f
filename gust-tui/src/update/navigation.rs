//! 侧边栏按键

use crossterm::event::{KeyCode, KeyEvent};

use super::picker;
use crate::backend::Cmd;
use crate::event::keymap::{any, DefaultKeymap};
use crate::model::{App, FocusArea, PageId, PickerKind};

/// 焦点在侧边栏时的按键
pub fn handle_key(app: &mut App, key: &KeyEvent) -> Vec<Cmd> {
    if DefaultKeymap::PROJECT_PICKER.matches(key) {
        return picker::open(app, PickerKind::Project);
    }
    if DefaultKeymap::BOARD_PICKER.matches(key) {
        return picker::open(app, PickerKind::Board);
    }

    if any(&DefaultKeymap::NAV_UP, key) {
        app.active = app.active.prev();
    } else if any(&DefaultKeymap::NAV_DOWN, key) {
        app.active = app.active.next();
    } else if any(&DefaultKeymap::FOCUS_CONTENT, key)
        || DefaultKeymap::TOGGLE_FOCUS.matches(key)
    {
        app.focus = FocusArea::Content;
    } else if let KeyCode::Char(c @ '1'..='9') = key.code {
        // 数字跳转，越界忽略
        let index = c as usize - '1' as usize;
        if let Some(page) = PageId::nth(index) {
            app.active = page;
        }
    }
    Vec::new()
}
