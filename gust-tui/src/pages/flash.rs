//! 烧录页面

use chrono::{DateTime, Utc};
use crossterm::event::KeyEvent;
use gust_core::west::commands::flash_args;
use gust_core::{BuildRecord, CommandResult, FlashRecord, GustConfig, DEFAULT_BUILD_DIR};
use ratatui::text::{Line, Span, Text};

use super::console::{self, duration_ms, format_duration, Console};
use super::{KeyHint, Page};
use crate::backend::{self, Cmd, Services};
use crate::event::keymap::DefaultKeymap;
use crate::message::{Message, Selection};
use crate::view::theme::Styles;

pub struct FlashPage {
    services: Services,
    selection: Selection,
    last_build: Option<BuildRecord>,
    console: Console,
    /// 本次烧录的目标板与开始时间
    target: Option<(String, DateTime<Utc>)>,
    /// 最近一次结果：(是否成功, 提示文字)
    status: Option<(bool, String)>,
    message: Option<String>,
    width: u16,
    height: u16,
}

impl FlashPage {
    pub fn new(services: Services, config: &GustConfig) -> Self {
        Self {
            services,
            selection: Selection::from_config(config),
            last_build: None,
            console: Console::new("flash"),
            target: None,
            status: None,
            message: None,
            width: 0,
            height: 0,
        }
    }

    /// 从历史中取最近一次构建
    fn refresh_last_build(&mut self) {
        match self.services.store.builds() {
            Ok(mut builds) => self.last_build = builds.pop(),
            Err(e) => {
                log::warn!("Failed to read build history: {e}");
                self.last_build = None;
            }
        }
    }

    fn board(&self) -> String {
        self.last_build
            .as_ref()
            .map_or_else(|| self.selection.board.clone(), |b| b.board.clone())
    }

    fn start_flash(&mut self) -> Option<Cmd> {
        self.refresh_last_build();
        let build_dir = if self.selection.build_dir.is_empty() {
            DEFAULT_BUILD_DIR
        } else {
            &self.selection.build_dir
        };
        let args = flash_args(build_dir, &self.selection.flash_runner);
        self.target = Some((self.board(), Utc::now()));
        self.status = None;
        self.message = None;
        Some(self.console.start(&self.services.runner, args))
    }

    fn complete(&mut self, result: &CommandResult) -> Cmd {
        self.console.push_line(&format!(
            "\nFlash {} in {}",
            console::outcome(result),
            format_duration(result.duration)
        ));
        self.status = Some((result.success(), format!("Flash {}", console::outcome(result))));
        let (board, timestamp) = self.target.take().unwrap_or_else(|| (self.board(), Utc::now()));
        let record = FlashRecord {
            board,
            timestamp,
            success: result.success(),
            duration_ms: duration_ms(result.duration),
            runner: self.selection.flash_runner.clone(),
        };
        if let Err(e) = self.services.store.add_flash(record) {
            log::warn!("Failed to record flash: {e}");
            self.message = Some(format!("History save failed: {e}"));
        }
        backend::emit(Message::Persisted)
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Option<Cmd> {
        if DefaultKeymap::FLASH.matches(key) || DefaultKeymap::CONFIRM.matches(key) {
            return self.start_flash();
        }
        if DefaultKeymap::CLEAR.matches(key) && !self.console.is_running() {
            self.console.clear();
            self.status = None;
            self.message = None;
        }
        None
    }
}

impl Page for FlashPage {
    fn init(&mut self) -> Option<Cmd> {
        self.refresh_last_build();
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
            // 构建页可能刚写入历史
            Message::Persisted => self.refresh_last_build(),
            Message::Tick => self.console.tick(),
            Message::Key(key) => return self.handle_key(key),
            _ => {}
        }
        None
    }

    fn view(&self) -> Text<'static> {
        let mut lines = Vec::new();
        if !self.selection.project.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("  Project:    ", Styles::label()),
                Span::styled(self.selection.project.clone(), Styles::value()),
            ]));
        }
        match &self.last_build {
            Some(build) => {
                lines.push(Line::from(vec![
                    Span::styled("  Last build: ", Styles::label()),
                    Span::styled(
                        format!(
                            "{} ({})",
                            build.board,
                            build.timestamp.format("%Y-%m-%d %H:%M:%S")
                        ),
                        Styles::value(),
                    ),
                ]));
                let (badge, style) = if build.success {
                    ("OK", Styles::success())
                } else {
                    ("FAILED", Styles::error())
                };
                lines.push(Line::from(vec![
                    Span::styled("  Status:     ", Styles::label()),
                    Span::styled(badge, style),
                ]));
            }
            None => lines.push(Line::styled(
                "  No recent builds found. Build first.",
                Styles::muted(),
            )),
        }
        if !self.selection.flash_runner.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("  Runner:     ", Styles::label()),
                Span::styled(self.selection.flash_runner.clone(), Styles::value()),
            ]));
        }
        lines.push(Line::default());

        if self.console.is_running() {
            lines.push(Line::styled(
                format!("  Flashing {}... {}", self.board(), format_duration(self.console.elapsed())),
                Styles::warning(),
            ));
        } else if let Some((success, text)) = &self.status {
            lines.push(console::status_line(*success, text));
        }
        if let Some(message) = &self.message {
            lines.push(Line::styled(format!("  {message}"), Styles::warning()));
        }
        if !self.console.output().is_empty() {
            let rows = usize::from(self.height).saturating_sub(lines.len());
            lines.extend(self.console.tail(self.width, rows));
        }
        Text::from(lines)
    }

    fn name(&self) -> &'static str {
        "Flash"
    }

    fn short_help(&self) -> Vec<KeyHint> {
        vec![("f", "flash"), ("c", "clear")]
    }

    fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }
}
