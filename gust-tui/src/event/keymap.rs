//! 快捷键配置

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// 快捷键绑定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub modifiers: KeyModifiers,
    pub code: KeyCode,
}

impl KeyBinding {
    pub const fn new(modifiers: KeyModifiers, code: KeyCode) -> Self {
        Self { modifiers, code }
    }

    pub const fn key(code: KeyCode) -> Self {
        Self::new(KeyModifiers::NONE, code)
    }

    pub const fn char(c: char) -> Self {
        Self::key(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyModifiers::CONTROL, KeyCode::Char(c))
    }

    /// 检查按键事件是否匹配此快捷键绑定
    ///
    /// 字符键忽略 SHIFT：`?` 在多数终端上带 SHIFT 上报
    pub fn matches(&self, key: &KeyEvent) -> bool {
        if key.code != self.code {
            return false;
        }
        let modifiers = match key.code {
            KeyCode::Char(_) => key.modifiers - KeyModifiers::SHIFT,
            _ => key.modifiers,
        };
        modifiers == self.modifiers
    }
}

/// 任意一个绑定匹配
pub fn any(bindings: &[KeyBinding], key: &KeyEvent) -> bool {
    bindings.iter().any(|b| b.matches(key))
}

/// 默认快捷键配置
pub struct DefaultKeymap;

impl DefaultKeymap {
    // 全局
    pub const FORCE_QUIT: KeyBinding = KeyBinding::ctrl('c');
    pub const QUIT: KeyBinding = KeyBinding::char('q');
    pub const HELP: KeyBinding = KeyBinding::char('?');
    pub const TOGGLE_FOCUS: KeyBinding = KeyBinding::key(KeyCode::Tab);

    // 侧边栏
    pub const PROJECT_PICKER: KeyBinding = KeyBinding::char('p');
    pub const BOARD_PICKER: KeyBinding = KeyBinding::char('b');
    pub const NAV_UP: [KeyBinding; 2] = [KeyBinding::key(KeyCode::Up), KeyBinding::char('k')];
    pub const NAV_DOWN: [KeyBinding; 2] = [KeyBinding::key(KeyCode::Down), KeyBinding::char('j')];
    pub const FOCUS_CONTENT: [KeyBinding; 2] =
        [KeyBinding::key(KeyCode::Enter), KeyBinding::key(KeyCode::Right)];

    // 内容区
    pub const FOCUS_SIDEBAR: KeyBinding = KeyBinding::key(KeyCode::Left);

    // 页面内通用
    pub const UP: [KeyBinding; 2] = [KeyBinding::key(KeyCode::Up), KeyBinding::char('k')];
    pub const DOWN: [KeyBinding; 2] = [KeyBinding::key(KeyCode::Down), KeyBinding::char('j')];
    pub const CONFIRM: KeyBinding = KeyBinding::key(KeyCode::Enter);
    pub const CANCEL: KeyBinding = KeyBinding::key(KeyCode::Esc);
    pub const REFRESH: KeyBinding = KeyBinding::char('r');
    pub const CLEAR: KeyBinding = KeyBinding::char('c');

    // 页面操作
    pub const BUILD: KeyBinding = KeyBinding::ctrl('b');
    pub const FLASH: KeyBinding = KeyBinding::char('f');
    pub const RUN_TESTS: KeyBinding = KeyBinding::char('t');
    pub const WEST_UPDATE: KeyBinding = KeyBinding::char('u');
    pub const SEARCH: KeyBinding = KeyBinding::char('/');
    pub const EDIT: KeyBinding = KeyBinding::char('e');
    pub const SAVE: KeyBinding = KeyBinding::char('s');
    pub const NEXT_TAB: [KeyBinding; 2] = [KeyBinding::char('l'), KeyBinding::key(KeyCode::Tab)];
    pub const PREV_TAB: [KeyBinding; 2] =
        [KeyBinding::char('h'), KeyBinding::key(KeyCode::BackTab)];
}
