//! 历史记录页面

use std::time::Duration;

use chrono::{DateTime, Utc};
use crossterm::event::KeyEvent;
use gust_core::{BuildRecord, CoreResult, FlashRecord, SerialLog, TestRecord};
use ratatui::text::{Line, Span, Text};

use super::console::format_duration;
use super::{KeyHint, Page};
use crate::backend::{Cmd, Services};
use crate::event::keymap::{any, DefaultKeymap};
use crate::message::Message;
use crate::util::text;
use crate::view::theme::Styles;

const TABS: [&str; 4] = ["Builds", "Flashes", "Tests", "Serial Logs"];

/// 从存储读取的快照
#[derive(Debug, Default)]
struct History {
    builds: Vec<BuildRecord>,
    flashes: Vec<FlashRecord>,
    tests: Vec<TestRecord>,
    serial_logs: Vec<SerialLog>,
}

pub struct ArtifactsPage {
    services: Services,
    tab: usize,
    history: History,
    error: Option<String>,
    height: u16,
}

impl ArtifactsPage {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            tab: 0,
            history: History::default(),
            error: None,
            height: 0,
        }
    }

    fn reload(&mut self) {
        match self.read_history() {
            Ok(history) => {
                self.history = history;
                self.error = None;
            }
            Err(e) => {
                log::warn!("Failed to read history: {e}");
                self.error = Some(e.to_string());
            }
        }
    }

    fn read_history(&self) -> CoreResult<History> {
        let store = &self.services.store;
        Ok(History {
            builds: store.builds()?,
            flashes: store.flashes()?,
            tests: store.tests()?,
            serial_logs: store.serial_logs()?,
        })
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        if any(&DefaultKeymap::NEXT_TAB, key) {
            self.tab = (self.tab + 1) % TABS.len();
        } else if any(&DefaultKeymap::PREV_TAB, key) {
            self.tab = (self.tab + TABS.len() - 1) % TABS.len();
        } else if DefaultKeymap::REFRESH.matches(key) {
            self.reload();
        }
    }

    fn rows(&self) -> Vec<Line<'static>> {
        let (rows, empty): (Vec<Line<'static>>, &str) = match self.tab {
            0 => (
                self.history
                    .builds
                    .iter()
                    .rev()
                    .map(|r| {
                        let target = if r.app.is_empty() {
                            r.board.clone()
                        } else {
                            format!("{} · {}", r.board, r.app)
                        };
                        row(r.timestamp, &target, Some(r.duration_ms), Some(r.success))
                    })
                    .collect(),
                "No build records yet.",
            ),
            1 => (
                self.history
                    .flashes
                    .iter()
                    .rev()
                    .map(|r| row(r.timestamp, &r.board, Some(r.duration_ms), Some(r.success)))
                    .collect(),
                "No flash records yet.",
            ),
            2 => (
                self.history
                    .tests
                    .iter()
                    .rev()
                    .map(|r| row(r.timestamp, &r.board, Some(r.duration_ms), Some(r.success)))
                    .collect(),
                "No test records yet.",
            ),
            _ => (
                self.history
                    .serial_logs
                    .iter()
                    .rev()
                    .map(|r| row(r.timestamp, &format!("{} @ {}", r.port, r.baud_rate), None, None))
                    .collect(),
                "No serial logs yet.",
            ),
        };
        if rows.is_empty() {
            vec![Line::styled(format!("  {empty}"), Styles::muted())]
        } else {
            rows
        }
    }
}

fn row(
    timestamp: DateTime<Utc>,
    target: &str,
    duration_ms: Option<u64>,
    success: Option<bool>,
) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format!("  {}  ", timestamp.format("%b %d %H:%M")),
            Styles::muted(),
        ),
        Span::styled(text::pad(target, 30), Styles::value()),
    ];
    if let Some(ms) = duration_ms {
        spans.push(Span::styled(
            format!("  {:>7}", format_duration(Duration::from_millis(ms))),
            Styles::label(),
        ));
    }
    match success {
        Some(true) => spans.push(Span::styled("  OK", Styles::success())),
        Some(false) => spans.push(Span::styled("  FAIL", Styles::error())),
        None => {}
    }
    Line::from(spans)
}

impl Page for ArtifactsPage {
    fn init(&mut self) -> Option<Cmd> {
        self.reload();
        None
    }

    fn update(&mut self, msg: &Message) -> Option<Cmd> {
        match msg {
            // 命令完成或其他页面写入后历史都可能变化
            Message::CommandResult(_) | Message::Persisted => self.reload(),
            Message::Key(key) => self.handle_key(key),
            _ => {}
        }
        None
    }

    fn view(&self) -> Text<'static> {
        let tabs: Vec<Span<'static>> = TABS
            .iter()
            .enumerate()
            .map(|(i, name)| {
                if i == self.tab {
                    Span::styled(format!(" [{name}] "), Styles::title())
                } else {
                    Span::styled(format!("  {name}  "), Styles::muted())
                }
            })
            .collect();
        let mut lines = vec![Line::from(tabs), Line::default()];

        if let Some(error) = &self.error {
            lines.push(Line::styled(format!("  Error: {error}"), Styles::error()));
            return Text::from(lines);
        }
        let rows = usize::from(self.height).saturating_sub(lines.len()).max(1);
        lines.extend(self.rows().into_iter().take(rows));
        Text::from(lines)
    }

    fn name(&self) -> &'static str {
        "Artifacts"
    }

    fn short_help(&self) -> Vec<KeyHint> {
        vec![("h/l", "switch tab"), ("r", "refresh")]
    }

    fn set_size(&mut self, _width: u16, height: u16) {
        self.height = height;
    }
}
