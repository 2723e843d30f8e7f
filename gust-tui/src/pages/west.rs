//! West 命令页面

use crossterm::event::KeyEvent;
use ratatui::text::{Line, Span, Text};

use super::console::{self, format_duration, Console};
use super::{KeyHint, Page};
use crate::backend::{Cmd, Services};
use crate::event::keymap::{any, DefaultKeymap};
use crate::message::Message;
use crate::view::theme::Styles;

/// (子命令, 说明)
const COMMANDS: [(&str, &str); 4] = [
    ("status", "Show workspace status"),
    ("list", "List workspace projects"),
    ("diff", "Show workspace diffs"),
    ("update", "Update workspace"),
];

pub struct WestPage {
    services: Services,
    cursor: usize,
    console: Console,
    /// 正在运行或最近运行的子命令
    command: &'static str,
    status: Option<(bool, String)>,
    width: u16,
    height: u16,
}

impl WestPage {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            cursor: 0,
            console: Console::new("west"),
            command: "",
            status: None,
            width: 0,
            height: 0,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Option<Cmd> {
        if self.console.is_running() {
            return None;
        }
        if any(&DefaultKeymap::UP, key) {
            self.cursor = self.cursor.saturating_sub(1);
        } else if any(&DefaultKeymap::DOWN, key) {
            self.cursor = (self.cursor + 1).min(COMMANDS.len() - 1);
        } else if DefaultKeymap::CONFIRM.matches(key) {
            let (name, _) = COMMANDS[self.cursor];
            self.command = name;
            self.status = None;
            return Some(self.console.start(&self.services.runner, vec![name.to_string()]));
        } else if DefaultKeymap::CLEAR.matches(key) {
            self.console.clear();
            self.status = None;
        }
        None
    }
}

impl Page for WestPage {
    fn init(&mut self) -> Option<Cmd> {
        None
    }

    fn update(&mut self, msg: &Message) -> Option<Cmd> {
        match msg {
            Message::CommandResult(result) => {
                if self.console.finish(result) {
                    self.console.push_line(&format!(
                        "\nCompleted in {} (exit code: {})",
                        format_duration(result.duration),
                        result.exit_code
                    ));
                    self.status = Some((
                        result.success(),
                        format!("west {} {}", self.command, console::outcome(result)),
                    ));
                }
            }
            Message::Tick => self.console.tick(),
            Message::Key(key) => return self.handle_key(key),
            _ => {}
        }
        None
    }

    fn view(&self) -> Text<'static> {
        let mut lines: Vec<Line<'static>> = COMMANDS
            .iter()
            .enumerate()
            .map(|(i, (name, desc))| {
                let selected = i == self.cursor;
                let marker = if selected { "▸ " } else { "  " };
                let name_style = if selected { Styles::selected() } else { Styles::value() };
                Line::from(vec![
                    Span::styled(marker, Styles::accent()),
                    Span::styled(format!("{name:<8}"), name_style),
                    Span::styled(format!("  {desc}"), Styles::muted()),
                ])
            })
            .collect();

        if self.console.is_running() {
            lines.push(Line::default());
            lines.push(Line::styled(
                format!("  Running... {}", format_duration(self.console.elapsed())),
                Styles::warning(),
            ));
        } else if let Some((success, text)) = &self.status {
            lines.push(Line::default());
            lines.push(console::status_line(*success, text));
        }
        if !self.console.output().is_empty() {
            lines.push(Line::default());
            let rows = usize::from(self.height).saturating_sub(lines.len());
            lines.extend(self.console.tail(self.width, rows));
        }
        Text::from(lines)
    }

    fn name(&self) -> &'static str {
        "West"
    }

    fn short_help(&self) -> Vec<KeyHint> {
        vec![("↑/↓", "select"), ("enter", "run"), ("c", "clear")]
    }

    fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;
    use gust_core::GustConfig;

    use super::*;
    use crate::pages::testing::{ch, harness, key, plain, result, run};

    #[test]
    fn test_cursor_stays_in_bounds() {
        let h = harness(GustConfig::default());
        let mut page = WestPage::new(h.services.clone());

        page.update(&key(KeyCode::Up));
        assert_eq!(page.cursor, 0);
        for _ in 0..10 {
            page.update(&ch('j'));
        }
        assert_eq!(page.cursor, COMMANDS.len() - 1);
    }

    #[test]
    fn test_enter_runs_selected_command() {
        let h = harness(GustConfig::default());
        let mut page = WestPage::new(h.services.clone());
        page.set_size(80, 20);
        page.update(&key(KeyCode::Down));
        page.update(&key(KeyCode::Down));

        run(page.update(&key(KeyCode::Enter)).unwrap());
        assert_eq!(h.runner.calls.lock().unwrap()[0], ["diff"]);

        page.update(&result("west-1", 0, "diff --git a/x b/x\n"));
        let view = plain(&page);
        assert!(view.contains("$ west diff"));
        assert!(view.contains("Completed in 1.5s (exit code: 0)"));
    }

    #[test]
    fn test_failure_is_shown_without_output_rows() {
        let h = harness(GustConfig::default());
        let mut page = WestPage::new(h.services.clone());
        page.update(&key(KeyCode::Enter));
        page.update(&result("west-1", 1, "FATAL ERROR: not a west workspace\n"));

        let view = plain(&page);
        assert!(view.contains("west status failed (exit code: 1)"));
        assert!(!view.contains("FATAL ERROR"));
    }
}
