//! 构建页面

use std::fs;

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use gust_core::west::commands::{build_args, BuildRequest};
use gust_core::{BuildRecord, CommandResult, GustConfig, DEFAULT_BUILD_DIR, LAUNCH_FAILURE};
use ratatui::text::{Line, Span, Text};

use super::console::{self, duration_ms, format_duration, Console};
use super::{InputCapture, KeyHint, Page};
use crate::backend::{self, Cmd, Services};
use crate::event::keymap::{any, DefaultKeymap};
use crate::message::{Message, Selection};
use crate::model::TextInput;
use crate::view::theme::Styles;

pub const BOARD_REQUIRED: &str =
    "Board is required. Press b in the sidebar to pick one, or set Default Board in Settings.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Pristine,
    CMake,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Boards {
    Loading,
    Loaded(usize),
    Failed(String),
}

/// 构建开始时的参数快照，用于结果记录
#[derive(Debug, Clone, Default)]
struct Snapshot {
    board: String,
    project: String,
    shield: String,
    build_dir: String,
    pristine: bool,
    cmake_args: String,
    started_at: Option<chrono::DateTime<Utc>>,
}

pub struct BuildPage {
    services: Services,
    selection: Selection,
    pristine: bool,
    cmake: TextInput,
    field: Field,
    boards: Boards,
    console: Console,
    /// 最近一次完成的构建是否成功
    last_success: Option<bool>,
    message: Option<String>,
    snapshot: Snapshot,
    width: u16,
    height: u16,
}

impl BuildPage {
    pub fn new(services: Services, config: &GustConfig) -> Self {
        Self {
            services,
            selection: Selection::from_config(config),
            pristine: false,
            cmake: TextInput::new(),
            field: Field::Pristine,
            boards: Boards::Loading,
            console: Console::new("build"),
            last_success: None,
            message: None,
            snapshot: Snapshot::default(),
            width: 0,
            height: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.console.is_running()
    }

    fn build_dir(&self) -> &str {
        if self.selection.build_dir.is_empty() {
            DEFAULT_BUILD_DIR
        } else {
            &self.selection.build_dir
        }
    }

    fn start_build(&mut self) -> Option<Cmd> {
        if self.selection.board.is_empty() {
            self.message = Some(BOARD_REQUIRED.to_string());
            return None;
        }

        let project_dir = (!self.selection.project.is_empty())
            .then(|| self.services.workspace.root.join(&self.selection.project));
        let args = build_args(&BuildRequest {
            board: &self.selection.board,
            project: project_dir.as_deref(),
            build_dir: self.build_dir(),
            pristine: self.pristine,
            shield: &self.selection.shield,
            cmake_args: self.cmake.value(),
        });

        self.snapshot = Snapshot {
            board: self.selection.board.clone(),
            project: self.selection.project.clone(),
            shield: self.selection.shield.clone(),
            build_dir: self.build_dir().to_string(),
            pristine: self.pristine,
            cmake_args: self.cmake.value().to_string(),
            started_at: Some(Utc::now()),
        };
        self.message = None;
        self.last_success = None;
        Some(self.console.start(&self.services.runner, args))
    }

    fn complete(&mut self, result: &CommandResult) -> Cmd {
        let success = result.success();
        self.last_success = Some(success);
        self.console.push_line(&format!(
            "\nBuild {} in {}",
            console::outcome(result),
            format_duration(result.duration)
        ));
        if result.exit_code == LAUNCH_FAILURE {
            self.message = Some("Could not start west; check the Workspace page.".to_string());
        }

        let snapshot = std::mem::take(&mut self.snapshot);
        let binary_size = if success {
            fs::metadata(
                self.services
                    .workspace
                    .root
                    .join(&snapshot.build_dir)
                    .join("zephyr")
                    .join("zephyr.bin"),
            )
            .map(|m| m.len())
            .unwrap_or(0)
        } else {
            0
        };

        let record = BuildRecord {
            board: snapshot.board.clone(),
            app: snapshot.project,
            timestamp: snapshot.started_at.unwrap_or_else(Utc::now),
            success,
            duration_ms: duration_ms(result.duration),
            shield: snapshot.shield,
            pristine: snapshot.pristine,
            cmake_args: snapshot.cmake_args,
            build_dir: snapshot.build_dir,
            binary_size,
        };
        if let Err(e) = self.services.store.add_build(record) {
            log::warn!("Failed to record build: {e}");
            self.message = Some(format!("Build recorded, but history save failed: {e}"));
        }

        if success {
            let board = snapshot.board;
            if let Err(e) = self
                .services
                .config
                .update(&mut |c: &mut GustConfig| c.default_board.clone_from(&board))
            {
                log::warn!("Failed to save default board: {e}");
                self.message = Some(format!("Build succeeded, but config save failed: {e}"));
            }
        }
        backend::emit(Message::Persisted)
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Option<Cmd> {
        if DefaultKeymap::BUILD.matches(key) {
            return self.start_build();
        }
        if matches!(key.code, KeyCode::Tab | KeyCode::BackTab) {
            self.field = match self.field {
                Field::Pristine => Field::CMake,
                Field::CMake => Field::Pristine,
            };
            return None;
        }

        match self.field {
            Field::CMake => {
                if DefaultKeymap::CANCEL.matches(key) {
                    self.field = Field::Pristine;
                } else if DefaultKeymap::CONFIRM.matches(key) {
                    return self.start_build();
                } else {
                    self.cmake.handle_key(key);
                }
            }
            Field::Pristine => {
                if key.code == KeyCode::Char(' ') {
                    self.pristine = !self.pristine;
                } else if DefaultKeymap::CONFIRM.matches(key) {
                    return self.start_build();
                } else if any(&DefaultKeymap::DOWN, key) {
                    self.field = Field::CMake;
                } else if DefaultKeymap::CLEAR.matches(key) && !self.is_running() {
                    self.console.clear();
                    self.last_success = None;
                    self.message = None;
                }
            }
        }
        None
    }

    fn field_line(&self, field: Field, label: &str, value: Vec<Span<'static>>) -> Line<'static> {
        let marker = if self.field == field { "▸ " } else { "  " };
        let mut spans = vec![
            Span::styled(marker, Styles::accent()),
            Span::styled(format!("{label:<9}"), Styles::label()),
            Span::raw(" "),
        ];
        spans.extend(value);
        Line::from(spans)
    }
}

fn info_line(label: &str, value: &str) -> Line<'static> {
    let shown = if value.is_empty() { "(none)" } else { value };
    Line::from(vec![
        Span::styled(format!("  {label:<9} "), Styles::label()),
        Span::styled(shown.to_string(), Styles::value()),
    ])
}

impl Page for BuildPage {
    fn init(&mut self) -> Option<Cmd> {
        Some(backend::load_boards(&self.services.runner))
    }

    fn update(&mut self, msg: &Message) -> Option<Cmd> {
        match msg {
            Message::Broadcast(event) => self.selection.apply(event),
            Message::BoardsLoaded(Ok(boards)) => self.boards = Boards::Loaded(boards.len()),
            Message::BoardsLoaded(Err(e)) => self.boards = Boards::Failed(e.clone()),
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
        let mut lines = vec![
            info_line("Project", &self.selection.project),
            info_line("Board", &self.selection.board),
            info_line("Shield", &self.selection.shield),
            info_line("Dir", self.build_dir()),
        ];
        lines.push(match &self.boards {
            Boards::Loading => Line::styled("  Loading board list...", Styles::muted()),
            Boards::Loaded(n) => Line::styled(format!("  {n} boards available"), Styles::muted()),
            Boards::Failed(e) => Line::styled(format!("  Failed to load boards: {e}"), Styles::error()),
        });
        lines.push(Line::default());

        let check = if self.pristine { "[x]" } else { "[ ]" };
        lines.push(self.field_line(
            Field::Pristine,
            "Pristine",
            vec![Span::styled(check, Styles::value())],
        ));
        lines.push(self.field_line(
            Field::CMake,
            "CMake",
            self.cmake
                .spans(self.field == Field::CMake, "extra CMake args, e.g. -DCONFIG_DEBUG=y"),
        ));
        lines.push(Line::default());

        if self.is_running() {
            lines.push(Line::styled(
                format!("  Building... {}", format_duration(self.console.elapsed())),
                Styles::warning(),
            ));
        } else if let Some(success) = self.last_success {
            let style = if success { Styles::success() } else { Styles::error() };
            let status = if success { "Build succeeded" } else { "Build failed" };
            lines.push(Line::styled(format!("  {status}"), style));
        }
        if let Some(message) = &self.message {
            lines.push(Line::styled(format!("  {message}"), Styles::warning()));
        }

        if !self.console.output().is_empty() {
            lines.push(Line::styled(
                "─".repeat(usize::from(self.width)),
                Styles::muted(),
            ));
            let rows = usize::from(self.height).saturating_sub(lines.len());
            lines.extend(self.console.tail(self.width, rows));
        }
        Text::from(lines)
    }

    fn name(&self) -> &'static str {
        "Build"
    }

    fn short_help(&self) -> Vec<KeyHint> {
        match self.field {
            Field::CMake => vec![("enter/ctrl+b", "build"), ("tab", "next field"), ("esc", "leave field")],
            Field::Pristine => vec![
                ("ctrl+b", "build"),
                ("space", "toggle pristine"),
                ("tab", "next field"),
                ("c", "clear"),
            ],
        }
    }

    fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    fn as_input_capture(&self) -> Option<&dyn InputCapture> {
        Some(self)
    }
}

impl InputCapture for BuildPage {
    fn input_captured(&self) -> bool {
        self.field == Field::CMake
    }
}
