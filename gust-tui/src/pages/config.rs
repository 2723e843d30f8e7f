//! Kconfig 浏览页面
//!
//! 读取当前项目的 `prj.conf`，`/` 按名称或值过滤

use crossterm::event::KeyEvent;
use gust_core::west::KconfigEntry;
use gust_core::GustConfig;
use ratatui::text::{Line, Span, Text};

use super::{InputCapture, KeyHint, Page};
use crate::backend::{self, Cmd, Services};
use crate::event::keymap::{any, DefaultKeymap};
use crate::message::{BroadcastEvent, Message};
use crate::model::TextInput;
use crate::view::theme::Styles;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entries {
    NoProject,
    Loading,
    Loaded(Vec<KconfigEntry>),
    Failed(String),
}

pub struct ConfigPage {
    services: Services,
    project: String,
    entries: Entries,
    search: TextInput,
    searching: bool,
    cursor: usize,
    height: u16,
}

impl ConfigPage {
    pub fn new(services: Services, config: &GustConfig) -> Self {
        Self {
            services,
            project: config.last_project.clone(),
            entries: Entries::NoProject,
            search: TextInput::new(),
            searching: false,
            cursor: 0,
            height: 0,
        }
    }

    fn load(&mut self) -> Option<Cmd> {
        self.cursor = 0;
        if self.project.is_empty() {
            self.entries = Entries::NoProject;
            return None;
        }
        self.entries = Entries::Loading;
        Some(backend::load_kconfig(&self.services.workspace, &self.project))
    }

    fn filtered(&self) -> Vec<&KconfigEntry> {
        let Entries::Loaded(entries) = &self.entries else {
            return Vec::new();
        };
        let query = self.search.value().to_lowercase();
        entries
            .iter()
            .filter(|e| {
                query.is_empty()
                    || e.name.to_lowercase().contains(&query)
                    || e.value.to_lowercase().contains(&query)
            })
            .collect()
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Option<Cmd> {
        if self.searching {
            if DefaultKeymap::CONFIRM.matches(key) || DefaultKeymap::CANCEL.matches(key) {
                self.searching = false;
            } else if self.search.handle_key(key) {
                self.cursor = 0;
            }
            return None;
        }

        if DefaultKeymap::SEARCH.matches(key) {
            self.searching = true;
        } else if any(&DefaultKeymap::UP, key) {
            self.cursor = self.cursor.saturating_sub(1);
        } else if any(&DefaultKeymap::DOWN, key) {
            if self.cursor + 1 < self.filtered().len() {
                self.cursor += 1;
            }
        } else if DefaultKeymap::REFRESH.matches(key) {
            return self.load();
        } else if DefaultKeymap::CANCEL.matches(key) && !self.search.is_empty() {
            self.search.clear();
            self.cursor = 0;
        }
        None
    }
}

impl Page for ConfigPage {
    fn init(&mut self) -> Option<Cmd> {
        self.load()
    }

    fn update(&mut self, msg: &Message) -> Option<Cmd> {
        match msg {
            Message::Broadcast(BroadcastEvent::ProjectSelected(project)) => {
                if *project != self.project || self.entries == Entries::NoProject {
                    self.project.clone_from(project);
                    return self.load();
                }
            }
            Message::KconfigLoaded { project, result } => {
                if *project != self.project {
                    log::trace!("Dropping prj.conf of {project}; current project is {}", self.project);
                    return None;
                }
                self.entries = match result {
                    Ok(entries) => Entries::Loaded(entries.clone()),
                    Err(e) => Entries::Failed(e.clone()),
                };
            }
            Message::Key(key) => return self.handle_key(key),
            _ => {}
        }
        None
    }

    fn view(&self) -> Text<'static> {
        let mut lines = Vec::new();
        if self.searching || !self.search.is_empty() {
            let mut spans = vec![Span::styled("  / ", Styles::accent())];
            spans.extend(self.search.spans(self.searching, "filter symbols"));
            lines.push(Line::from(spans));
            lines.push(Line::default());
        }

        match &self.entries {
            Entries::NoProject => {
                lines.push(Line::styled(
                    "  No project selected. Press p in the sidebar to pick one.",
                    Styles::muted(),
                ));
                return Text::from(lines);
            }
            Entries::Loading => {
                lines.push(Line::styled(
                    format!("  Loading {}/prj.conf...", self.project),
                    Styles::muted(),
                ));
                return Text::from(lines);
            }
            Entries::Failed(e) => {
                lines.push(Line::styled(
                    format!("  Failed to read {}/prj.conf: {e}", self.project),
                    Styles::error(),
                ));
                return Text::from(lines);
            }
            Entries::Loaded(_) => {}
        }

        let filtered = self.filtered();
        if filtered.is_empty() {
            lines.push(Line::styled("  No matching symbols.", Styles::muted()));
            return Text::from(lines);
        }

        // 光标保持在可见窗口内
        let visible = usize::from(self.height).saturating_sub(lines.len() + 2).max(1);
        let start = (self.cursor + 1).saturating_sub(visible);
        for (i, entry) in filtered.iter().enumerate().skip(start).take(visible) {
            let selected = i == self.cursor;
            let marker = if selected { "▸ " } else { "  " };
            let name_style = if selected { Styles::selected() } else { Styles::label() };
            let mut spans = vec![
                Span::styled(marker, Styles::accent()),
                Span::styled(entry.name.clone(), name_style),
                Span::raw("="),
                Span::styled(entry.value.clone(), Styles::value()),
            ];
            if !entry.comment.is_empty() {
                spans.push(Span::styled(format!("  # {}", entry.comment), Styles::muted()));
            }
            lines.push(Line::from(spans));
        }

        lines.push(Line::default());
        let mut summary = format!("  {}/{} symbols", self.cursor + 1, filtered.len());
        if !self.search.is_empty() {
            summary.push_str(&format!(" (filter: {})", self.search.value()));
        }
        lines.push(Line::styled(summary, Styles::muted()));
        Text::from(lines)
    }

    fn name(&self) -> &'static str {
        "Config"
    }

    fn short_help(&self) -> Vec<KeyHint> {
        if self.searching {
            vec![("enter", "apply"), ("esc", "done")]
        } else {
            vec![("/", "search"), ("↑/↓", "move"), ("r", "reload")]
        }
    }

    fn set_size(&mut self, _width: u16, height: u16) {
        self.height = height;
    }

    fn as_input_capture(&self) -> Option<&dyn InputCapture> {
        Some(self)
    }
}

impl InputCapture for ConfigPage {
    fn input_captured(&self) -> bool {
        self.searching
    }
}
