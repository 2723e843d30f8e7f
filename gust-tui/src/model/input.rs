//! 单行文本输入状态

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::view::theme::Styles;

/// 单行输入框，光标按字符计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: &str) -> Self {
        let mut input = Self::new();
        input.set_value(value);
        input
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// 替换内容，光标移到末尾
    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// 处理编辑键，返回内容是否改变
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let len = self.value.chars().count();
        match key.code {
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let changed = !self.value.is_empty();
                self.clear();
                changed
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                let at = self.byte_index(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
                true
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                let at = self.byte_index(self.cursor);
                self.value.remove(at);
                true
            }
            KeyCode::Delete if self.cursor < len => {
                let at = self.byte_index(self.cursor);
                self.value.remove(at);
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(len);
                false
            }
            KeyCode::Home => {
                self.cursor = 0;
                false
            }
            KeyCode::End => {
                self.cursor = len;
                false
            }
            _ => false,
        }
    }

    /// 渲染为 span；聚焦时显示光标，空内容显示占位符
    pub fn spans(&self, focused: bool, placeholder: &str) -> Vec<Span<'static>> {
        let cursor_style = Style::default().add_modifier(Modifier::REVERSED);
        if self.value.is_empty() {
            let mut rest = placeholder.chars();
            return match (focused, rest.next()) {
                (true, Some(first)) => vec![
                    Span::styled(first.to_string(), Styles::muted().patch(cursor_style)),
                    Span::styled(rest.as_str().to_string(), Styles::muted()),
                ],
                (true, None) => vec![Span::styled(" ", cursor_style)],
                (false, _) => vec![Span::styled(placeholder.to_string(), Styles::muted())],
            };
        }
        if !focused {
            return vec![Span::styled(self.value.clone(), Styles::value())];
        }

        let at = self.byte_index(self.cursor);
        let (before, rest) = self.value.split_at(at);
        let mut chars = rest.chars();
        let under = chars.next().map_or_else(|| " ".to_string(), String::from);
        vec![
            Span::styled(before.to_string(), Styles::value()),
            Span::styled(under, cursor_style),
            Span::styled(chars.as_str().to_string(), Styles::value()),
        ]
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(input: &mut TextInput, s: &str) {
        for c in s.chars() {
            input.handle_key(&key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_insert_and_backspace() {
        let mut input = TextInput::new();
        type_str(&mut input, "blinky");
        assert_eq!(input.value(), "blinky");

        assert!(input.handle_key(&key(KeyCode::Backspace)));
        assert_eq!(input.value(), "blink");
    }

    #[test]
    fn test_cursor_movement_edits_in_place() {
        let mut input = TextInput::with_value("ac");
        input.handle_key(&key(KeyCode::Left));
        type_str(&mut input, "b");
        assert_eq!(input.value(), "abc");

        input.handle_key(&key(KeyCode::Home));
        assert!(input.handle_key(&key(KeyCode::Delete)));
        assert_eq!(input.value(), "bc");
    }

    #[test]
    fn test_multibyte_chars() {
        let mut input = TextInput::new();
        type_str(&mut input, "构建");
        input.handle_key(&key(KeyCode::Backspace));
        assert_eq!(input.value(), "构");
    }

    #[test]
    fn test_control_chars_are_not_inserted() {
        let mut input = TextInput::with_value("x");
        let ctrl_b = KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL);
        assert!(!input.handle_key(&ctrl_b));
        assert_eq!(input.value(), "x");

        let ctrl_u = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert!(input.handle_key(&ctrl_u));
        assert!(input.is_empty());
    }

    #[test]
    fn test_shifted_chars_are_inserted() {
        let mut input = TextInput::new();
        input.handle_key(&KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT));
        assert_eq!(input.value(), "D");
    }
}
