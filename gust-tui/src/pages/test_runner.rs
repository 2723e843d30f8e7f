//! 测试页面

use chrono::{DateTime, Utc};
use crossterm::event::KeyEvent;
use gust_core::west::commands::test_args;
use gust_core::{CommandResult, GustConfig, TestRecord};
use ratatui::text::{Line, Span, Text};

use super::console::{self, duration_ms, format_duration, Console};
use super::{KeyHint, Page};
use crate::backend::{self, Cmd, Services};
use crate::event::keymap::DefaultKeymap;
use crate::message::{Message, Selection};
use crate::view::theme::Styles;

pub struct TestPage {
    services: Services,
    selection: Selection,
    console: Console,
    started_at: Option<DateTime<Utc>>,
    /// 最近一次结果：(是否通过, 提示文字)
    status: Option<(bool, String)>,
    width: u16,
    height: u16,
}

impl TestPage {
    pub fn new(services: Services, config: &GustConfig) -> Self {
        Self {
            services,
            selection: Selection::from_config(config),
            console: Console::new("test"),
            started_at: None,
            status: None,
            width: 0,
            height: 0,
        }
    }

    fn start(&mut self) -> Option<Cmd> {
        let project = (!self.selection.project.is_empty())
            .then(|| self.services.workspace.root.join(&self.selection.project));
        let args = test_args(
            &self.selection.board,
            &self.selection.build_dir,
            project.as_deref(),
        );
        self.started_at = Some(Utc::now());
        self.status = None;
        Some(self.console.start(&self.services.runner, args))
    }

    fn complete(&mut self, result: &CommandResult) -> Cmd {
        let success = result.success();
        let summary = if success {
            "Tests passed".to_string()
        } else {
            format!("Tests failed (exit code: {})", result.exit_code)
        };
        self.console
            .push_line(&format!("\n{summary} in {}", format_duration(result.duration)));
        self.status = Some((success, summary));

        let record = TestRecord {
            board: self.selection.board.clone(),
            timestamp: self.started_at.take().unwrap_or_else(Utc::now),
            success,
            duration_ms: duration_ms(result.duration),
        };
        if let Err(e) = self.services.store.add_test(record) {
            log::warn!("Failed to record test run: {e}");
            self.status = Some((
                success,
                format!("Tests completed, but history save failed: {e}"),
            ));
        }
        backend::emit(Message::Persisted)
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Option<Cmd> {
        if self.console.is_running() {
            return None;
        }
        if DefaultKeymap::RUN_TESTS.matches(key) || DefaultKeymap::CONFIRM.matches(key) {
            return self.start();
        }
        if DefaultKeymap::CLEAR.matches(key) {
            self.console.clear();
            self.status = None;
        }
        None
    }
}

impl Page for TestPage {
    fn init(&mut self) -> Option<Cmd> {
        None
    }

    fn update(&mut self, msg: &Message) -> Option<Cmd> {
        match msg {
            Message::Broadcast(event) => self.selection.apply(event),
            Message::CommandResult(result) => {
                if self.console.finish(result) {
                    return Some(self.complete(result));
                }
            }
            Message::Tick => self.console.tick(),
            Message::Key(key) => return self.handle_key(key),
            _ => {}
        }
        None
    }

    fn view(&self) -> Text<'static> {
        let mut lines = Vec::new();
        for (label, value) in [
            ("Project", &self.selection.project),
            ("Board", &self.selection.board),
            ("Dir", &self.selection.build_dir),
        ] {
            if !value.is_empty() {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {label:<8} "), Styles::label()),
                    Span::styled(value.clone(), Styles::value()),
                ]));
            }
        }

        if self.console.is_running() {
            lines.push(Line::styled(
                format!("  Running tests... {}", format_duration(self.console.elapsed())),
                Styles::warning(),
            ));
        } else if let Some((success, summary)) = &self.status {
            lines.push(console::status_line(*success, summary));
        }
        if !self.console.is_running() && self.console.output().is_empty() {
            lines.push(Line::styled("  Press t or Enter to run tests.", Styles::muted()));
        }

        if !self.console.output().is_empty() {
            lines.push(Line::default());
            let rows = usize::from(self.height).saturating_sub(lines.len());
            lines.extend(self.console.tail(self.width, rows));
        }
        Text::from(lines)
    }

    fn name(&self) -> &'static str {
        "Test"
    }

    fn short_help(&self) -> Vec<KeyHint> {
        vec![("t", "run tests"), ("c", "clear")]
    }

    fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }
}
