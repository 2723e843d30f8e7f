//! 设置页面
//!
//! 编辑后立即写入工作区配置，并广播对应的选择变化；
//! 串口与波特率不在广播集合里，改动以 `Persisted` 通知其他页面

use crossterm::event::KeyEvent;
use gust_core::{GustConfig, DEFAULT_BAUD_RATE};
use ratatui::text::{Line, Span, Text};

use super::{InputCapture, KeyHint, Page};
use crate::backend::{self, Cmd, Services};
use crate::event::keymap::{any, DefaultKeymap};
use crate::message::{BroadcastEvent, Message};
use crate::model::TextInput;
use crate::view::theme::Styles;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    DefaultBoard,
    Shield,
    SerialPort,
    BaudRate,
    BuildDir,
    FlashRunner,
}

const FIELDS: [Field; 6] = [
    Field::DefaultBoard,
    Field::Shield,
    Field::SerialPort,
    Field::BaudRate,
    Field::BuildDir,
    Field::FlashRunner,
];

impl Field {
    const fn label(self) -> &'static str {
        match self {
            Self::DefaultBoard => "Default Board",
            Self::Shield => "Shield",
            Self::SerialPort => "Serial Port",
            Self::BaudRate => "Baud Rate",
            Self::BuildDir => "Build Directory",
            Self::FlashRunner => "Flash Runner",
        }
    }

    fn get(self, config: &GustConfig) -> String {
        match self {
            Self::DefaultBoard => config.default_board.clone(),
            Self::Shield => config.last_shield.clone(),
            Self::SerialPort => config.serial_port.clone(),
            Self::BaudRate => {
                if config.serial_baud_rate == 0 {
                    DEFAULT_BAUD_RATE.to_string()
                } else {
                    config.serial_baud_rate.to_string()
                }
            }
            Self::BuildDir => config.build_dir.clone(),
            Self::FlashRunner => config.flash_runner.clone(),
        }
    }

    /// 校验并写入；返回需要广播的事件
    fn set(self, config: &mut GustConfig, value: &str) -> Result<Option<BroadcastEvent>, String> {
        let value = value.trim().to_string();
        let event = match self {
            Self::DefaultBoard => {
                config.default_board.clone_from(&value);
                Some(BroadcastEvent::BoardSelected(value))
            }
            Self::Shield => {
                config.last_shield.clone_from(&value);
                Some(BroadcastEvent::ShieldSelected(value))
            }
            Self::SerialPort => {
                config.serial_port = value;
                None
            }
            Self::BaudRate => {
                let baud = value
                    .parse::<u32>()
                    .ok()
                    .filter(|b| *b > 0)
                    .ok_or_else(|| format!("Invalid baud rate: {value}"))?;
                config.serial_baud_rate = baud;
                None
            }
            Self::BuildDir => {
                config.build_dir.clone_from(&value);
                Some(BroadcastEvent::BuildDirChanged(value))
            }
            Self::FlashRunner => {
                config.flash_runner.clone_from(&value);
                Some(BroadcastEvent::FlashRunnerChanged(value))
            }
        };
        Ok(event)
    }
}

pub struct SettingsPage {
    services: Services,
    values: GustConfig,
    cursor: usize,
    /// Some 表示正在编辑
    input: Option<TextInput>,
    message: Option<String>,
}

impl SettingsPage {
    pub fn new(services: Services, config: &GustConfig) -> Self {
        Self {
            services,
            values: config.clone(),
            cursor: 0,
            input: None,
            message: None,
        }
    }

    fn field(&self) -> Field {
        FIELDS[self.cursor]
    }

    fn apply(&mut self, value: &str) -> Option<Cmd> {
        let field = self.field();
        let mut next = self.values.clone();
        let event = match field.set(&mut next, value) {
            Ok(event) => event,
            Err(e) => {
                self.message = Some(e);
                return None;
            }
        };

        let saved = self.services.config.update(&mut |c: &mut GustConfig| {
            // 只改本字段，其余字段以磁盘为准
            let _ = field.set(c, value);
        });
        match saved {
            Ok(_) => {
                self.values = next;
                self.message = Some(format!("{} updated", field.label()));
                let msg = event.map_or(Message::Persisted, Message::Broadcast);
                Some(backend::emit(msg))
            }
            Err(e) => {
                log::warn!("Failed to save {}: {e}", field.label());
                self.message = Some(format!("Error saving: {e}"));
                None
            }
        }
    }

    /// 以磁盘为准刷新显示的值
    fn reload(&mut self) {
        match self.services.config.load() {
            Ok(config) => self.values = config,
            Err(e) => log::warn!("Failed to reload config: {e}"),
        }
    }

    /// 把页面上的全部值写回工作区配置
    fn save_all(&mut self) -> Option<Cmd> {
        let values = self.values.clone();
        let saved = self.services.config.update(&mut |c: &mut GustConfig| {
            c.default_board.clone_from(&values.default_board);
            c.last_shield.clone_from(&values.last_shield);
            c.serial_port.clone_from(&values.serial_port);
            c.serial_baud_rate = values.serial_baud_rate;
            c.build_dir.clone_from(&values.build_dir);
            c.flash_runner.clone_from(&values.flash_runner);
        });
        match saved {
            Ok(_) => {
                self.message = Some("Settings saved to workspace".to_string());
                Some(backend::emit(Message::Persisted))
            }
            Err(e) => {
                log::warn!("Failed to save settings: {e}");
                self.message = Some(format!("Error saving: {e}"));
                None
            }
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Option<Cmd> {
        if let Some(input) = &mut self.input {
            if DefaultKeymap::CANCEL.matches(key) {
                self.input = None;
            } else if DefaultKeymap::CONFIRM.matches(key) {
                let value = input.value().to_string();
                self.input = None;
                return self.apply(&value);
            } else {
                input.handle_key(key);
            }
            return None;
        }

        if any(&DefaultKeymap::UP, key) {
            self.cursor = self.cursor.saturating_sub(1);
        } else if any(&DefaultKeymap::DOWN, key) {
            self.cursor = (self.cursor + 1).min(FIELDS.len() - 1);
        } else if DefaultKeymap::CONFIRM.matches(key) || DefaultKeymap::EDIT.matches(key) {
            self.input = Some(TextInput::with_value(&self.field().get(&self.values)));
            self.message = None;
        } else if DefaultKeymap::SAVE.matches(key) {
            return self.save_all();
        }
        None
    }
}

impl Page for SettingsPage {
    fn init(&mut self) -> Option<Cmd> {
        None
    }

    fn update(&mut self, msg: &Message) -> Option<Cmd> {
        match msg {
            Message::Broadcast(event) => match event {
                BroadcastEvent::BoardSelected(v) => self.values.default_board.clone_from(v),
                BroadcastEvent::ShieldSelected(v) => self.values.last_shield.clone_from(v),
                BroadcastEvent::BuildDirChanged(v) => self.values.build_dir.clone_from(v),
                BroadcastEvent::FlashRunnerChanged(v) => self.values.flash_runner.clone_from(v),
                BroadcastEvent::ProjectSelected(v) => self.values.last_project.clone_from(v),
            },
            Message::Persisted => self.reload(),
            Message::Key(key) => return self.handle_key(key),
            _ => {}
        }
        None
    }

    fn view(&self) -> Text<'static> {
        let mut lines: Vec<Line<'static>> = FIELDS
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let selected = i == self.cursor;
                let marker = if selected { "▸ " } else { "  " };
                let value = field.get(&self.values);
                let value = if value.is_empty() {
                    Span::styled("(not set)", Styles::muted())
                } else {
                    Span::styled(value, Styles::value())
                };
                let label_style = if selected { Styles::selected() } else { Styles::label() };
                Line::from(vec![
                    Span::styled(marker, Styles::accent()),
                    Span::styled(format!("{:<20}", field.label()), label_style),
                    Span::raw(" "),
                    value,
                ])
            })
            .collect();

        if let Some(input) = &self.input {
            lines.push(Line::default());
            lines.push(Line::styled(
                format!("  Edit {}:", self.field().label()),
                Styles::title(),
            ));
            let mut spans = vec![Span::raw("  > ")];
            spans.extend(input.spans(true, ""));
            lines.push(Line::from(spans));
        }
        if let Some(message) = &self.message {
            lines.push(Line::default());
            lines.push(Line::styled(format!("  {message}"), Styles::accent()));
        }
        Text::from(lines)
    }

    fn name(&self) -> &'static str {
        "Settings"
    }

    fn short_help(&self) -> Vec<KeyHint> {
        if self.input.is_some() {
            vec![("enter", "apply"), ("esc", "cancel")]
        } else {
            vec![("enter", "edit"), ("s", "save to disk")]
        }
    }

    fn set_size(&mut self, _width: u16, _height: u16) {}

    fn as_input_capture(&self) -> Option<&dyn InputCapture> {
        Some(self)
    }
}

impl InputCapture for SettingsPage {
    fn input_captured(&self) -> bool {
        self.input.is_some()
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;
    use gust_core::ConfigService;

    use super::*;
    use crate::pages::testing::{ch, ctrl, harness, key, plain, run};

    fn type_text(page: &mut SettingsPage, text: &str) {
        for c in text.chars() {
            page.update(&ch(c));
        }
    }

    #[test]
    fn test_edit_board_saves_and_broadcasts() {
        let h = harness(GustConfig::default());
        let mut page = SettingsPage::new(h.services.clone(), &GustConfig::default());

        page.update(&key(KeyCode::Enter));
        assert!(page.input_captured());
        type_text(&mut page, "nrf5340dk");
        let cmd = page.update(&key(KeyCode::Enter)).unwrap();

        assert!(!page.input_captured());
        assert_eq!(h.config.load().unwrap().default_board, "nrf5340dk");
        let Message::Broadcast(event) = run(cmd) else {
            panic!("expected a broadcast");
        };
        assert_eq!(event, BroadcastEvent::BoardSelected("nrf5340dk".to_string()));
        assert!(plain(&page).contains("Default Board updated"));
    }

    #[test]
    fn test_escape_cancels_edit() {
        let h = harness(GustConfig::default());
        let mut page = SettingsPage::new(h.services.clone(), &GustConfig::default());

        page.update(&ch('j'));
        page.update(&ch('e'));
        type_text(&mut page, "arduino_uno_r3");
        assert!(page.update(&key(KeyCode::Esc)).is_none());

        assert!(!page.input_captured());
        assert!(h.config.load().unwrap().last_shield.is_empty());
    }

    #[test]
    fn test_invalid_baud_rate_is_rejected() {
        let h = harness(GustConfig::default());
        let mut page = SettingsPage::new(h.services.clone(), &GustConfig::default());
        for _ in 0..3 {
            page.update(&ch('j'));
        }
        page.update(&key(KeyCode::Enter));
        page.update(&ctrl('u'));
        type_text(&mut page, "fast");

        assert!(page.update(&key(KeyCode::Enter)).is_none());
        assert!(plain(&page).contains("Invalid baud rate: fast"));
        assert_eq!(h.config.load().unwrap().serial_baud_rate, 115_200);

        page.update(&key(KeyCode::Enter));
        page.update(&ctrl('u'));
        type_text(&mut page, "921600");
        let next = page.update(&key(KeyCode::Enter)).unwrap();
        assert!(matches!(run(next), Message::Persisted));
        assert_eq!(h.config.load().unwrap().serial_baud_rate, 921_600);
    }

    #[test]
    fn test_broadcast_updates_shown_values() {
        let h = harness(GustConfig::default());
        let mut page = SettingsPage::new(h.services.clone(), &GustConfig::default());
        page.update(&Message::Broadcast(BroadcastEvent::FlashRunnerChanged(
            "openocd".to_string(),
        )));
        assert!(plain(&page).contains("openocd"));
    }

    #[test]
    fn test_save_writes_all_fields() {
        let config = GustConfig {
            build_dir: "out".to_string(),
            flash_runner: "jlink".to_string(),
            ..GustConfig::default()
        };
        let h = harness(GustConfig::default());
        let mut page = SettingsPage::new(h.services.clone(), &config);

        assert!(page.update(&ch('s')).is_some());
        let saved = h.config.load().unwrap();
        assert_eq!(saved.build_dir, "out");
        assert_eq!(saved.flash_runner, "jlink");
        assert!(plain(&page).contains("Settings saved to workspace"));
    }

    #[test]
    fn test_reloads_values_written_elsewhere() {
        let h = harness(GustConfig::default());
        let mut page = SettingsPage::new(h.services.clone(), &GustConfig::default());

        h.config
            .update(&mut |c: &mut GustConfig| c.serial_port = "/dev/ttyUSB0".to_string())
            .unwrap();
        page.update(&Message::Persisted);
        assert!(plain(&page).contains("/dev/ttyUSB0"));

        page.update(&ch('s'));
        assert_eq!(h.config.load().unwrap().serial_port, "/dev/ttyUSB0");
    }
}
