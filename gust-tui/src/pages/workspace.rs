//! 工作区页面
//!
//! 显示工作区根目录、manifest 与健康检查；`u` 运行 `west update`

use crossterm::event::KeyEvent;
use gust_core::west::WorkspaceHealth;
use ratatui::text::{Line, Span, Text};

use super::console::{self, format_duration, Console};
use super::{KeyHint, Page};
use crate::backend::{self, Cmd, Services};
use crate::event::keymap::DefaultKeymap;
use crate::message::Message;
use crate::view::theme::Styles;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Projects {
    Unknown,
    Found(usize),
    Failed(String),
}

pub struct WorkspacePage {
    services: Services,
    /// None 表示检查进行中
    health: Option<WorkspaceHealth>,
    projects: Projects,
    console: Console,
    /// 最近一次 `west update` 的结果
    status: Option<(bool, String)>,
    width: u16,
    height: u16,
}

impl WorkspacePage {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            health: None,
            projects: Projects::Unknown,
            console: Console::new("update"),
            status: None,
            width: 0,
            height: 0,
        }
    }

    fn refresh(&mut self) -> Cmd {
        self.health = None;
        backend::check_health(&self.services.workspace)
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Option<Cmd> {
        if DefaultKeymap::REFRESH.matches(key) {
            return Some(self.refresh());
        }
        if DefaultKeymap::WEST_UPDATE.matches(key) && !self.console.is_running() {
            self.status = None;
            return Some(
                self.console
                    .start(&self.services.runner, vec!["update".to_string()]),
            );
        }
        if DefaultKeymap::CLEAR.matches(key) && !self.console.is_running() {
            self.console.clear();
            self.status = None;
        }
        None
    }
}

fn check_line(ok: bool, label: &str) -> Line<'static> {
    let (mark, style) = if ok {
        ("✓", Styles::success())
    } else {
        ("✗", Styles::error())
    };
    Line::from(vec![
        Span::styled(format!("  {mark} "), style),
        Span::styled(label.to_string(), Styles::value()),
    ])
}

impl Page for WorkspacePage {
    fn init(&mut self) -> Option<Cmd> {
        Some(self.refresh())
    }

    fn update(&mut self, msg: &Message) -> Option<Cmd> {
        match msg {
            Message::HealthChecked(health) => {
                self.health = Some(*health);
                // 健康检查之后再扫描项目
                return Some(backend::load_projects(&self.services.workspace));
            }
            Message::ProjectsLoaded(Ok(projects)) => self.projects = Projects::Found(projects.len()),
            Message::ProjectsLoaded(Err(e)) => self.projects = Projects::Failed(e.clone()),
            Message::CommandResult(result) => {
                if self.console.finish(result) {
                    self.console.push_line(&format!(
                        "\nUpdate {} in {}",
                        console::outcome(result),
                        format_duration(result.duration)
                    ));
                    self.status = Some(if result.success() {
                        (true, "Workspace updated".to_string())
                    } else {
                        (false, format!("west update failed (exit code: {})", result.exit_code))
                    });
                    return Some(self.refresh());
                }
            }
            Message::Tick => self.console.tick(),
            Message::Key(key) => return self.handle_key(key),
            _ => {}
        }
        None
    }

    fn view(&self) -> Text<'static> {
        let workspace = &self.services.workspace;
        let manifest = workspace
            .manifest_path
            .as_ref()
            .map_or_else(|| "(not resolved)".to_string(), |p| p.display().to_string());
        let mut lines = vec![
            Line::from(vec![
                Span::styled("  Root:     ", Styles::label()),
                Span::styled(workspace.root.display().to_string(), Styles::value()),
            ]),
            Line::from(vec![
                Span::styled("  Manifest: ", Styles::label()),
                Span::styled(manifest, Styles::value()),
            ]),
            Line::from(vec![
                Span::styled("  Projects: ", Styles::label()),
                match &self.projects {
                    Projects::Unknown => Span::styled("scanning...", Styles::muted()),
                    Projects::Found(n) => Span::styled(n.to_string(), Styles::value()),
                    Projects::Failed(e) => Span::styled(format!("scan failed: {e}"), Styles::error()),
                },
            ]),
            Line::default(),
            Line::styled("  Health", Styles::title()),
        ];

        match &self.health {
            None => lines.push(Line::styled("  Checking...", Styles::muted())),
            Some(h) => {
                lines.push(check_line(h.west_initialized, "West initialized (.west/)"));
                lines.push(check_line(h.modules_updated, "Modules updated (zephyr/)"));
                lines.push(check_line(h.zephyr_exported, "Zephyr CMake package exported"));
                lines.push(check_line(h.python_env, "Python virtual environment"));
                lines.push(check_line(h.sdk_installed, "Zephyr SDK installed"));
                if h.all_ok() {
                    lines.push(Line::styled("  Workspace is ready.", Styles::success()));
                }
            }
        }

        lines.push(Line::default());
        if self.console.is_running() {
            lines.push(Line::styled(
                format!("  Updating... {}", format_duration(self.console.elapsed())),
                Styles::warning(),
            ));
        } else if let Some((success, text)) = &self.status {
            lines.push(console::status_line(*success, text));
        }
        if !self.console.output().is_empty() {
            let rows = usize::from(self.height).saturating_sub(lines.len());
            lines.extend(self.console.tail(self.width, rows));
        }
        Text::from(lines)
    }

    fn name(&self) -> &'static str {
        "Workspace"
    }

    fn short_help(&self) -> Vec<KeyHint> {
        vec![("r", "refresh"), ("u", "west update"), ("c", "clear")]
    }

    fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }
}

#[cfg(test)]
mod tests {
    use gust_core::west::Project;
    use gust_core::GustConfig;

    use super::*;
    use crate::pages::testing::{ch, harness, plain, result, run};

    fn healthy() -> WorkspaceHealth {
        WorkspaceHealth {
            west_initialized: true,
            modules_updated: true,
            zephyr_exported: true,
            python_env: true,
            sdk_installed: true,
        }
    }

    #[tokio::test]
    async fn test_init_checks_health() {
        let h = harness(GustConfig::default());
        std::fs::create_dir(h.dir.path().join(".west")).unwrap();
        let mut page = WorkspacePage::new(h.services.clone());

        let msg = page.init().unwrap().await;
        let Message::HealthChecked(health) = msg else {
            panic!("expected a health check");
        };
        assert!(health.west_initialized);
        assert!(!health.modules_updated);
    }

    #[test]
    fn test_health_checklist_view() {
        let h = harness(GustConfig::default());
        let mut page = WorkspacePage::new(h.services.clone());
        assert!(plain(&page).contains("Checking..."));

        let next = page.update(&Message::HealthChecked(healthy()));
        assert!(next.is_some());
        page.update(&Message::ProjectsLoaded(Ok(vec![Project {
            name: "blinky".to_string(),
            path: "app/blinky".to_string(),
        }])));

        let view = plain(&page);
        assert!(view.contains("✓ Zephyr SDK installed"));
        assert!(view.contains("Workspace is ready."));
        assert!(view.contains("Projects: 1"));
    }

    #[test]
    fn test_update_rechecks_health() {
        let h = harness(GustConfig::default());
        let mut page = WorkspacePage::new(h.services.clone());
        page.update(&Message::HealthChecked(WorkspaceHealth::default()));

        run(page.update(&ch('u')).unwrap());
        assert_eq!(h.runner.calls.lock().unwrap()[0], ["update"]);

        assert!(page.update(&result("west-1", 0, "")).is_none());
        let recheck = page.update(&result("update-1", 0, "=== updating zephyr\n"));
        assert!(recheck.is_some());
        let view = plain(&page);
        assert!(view.contains("Workspace updated"));
        assert!(view.contains("Checking..."));
    }

    #[test]
    fn test_failed_update_shows_exit_code() {
        let h = harness(GustConfig::default());
        let mut page = WorkspacePage::new(h.services.clone());
        page.update(&ch('u'));
        page.update(&result("update-1", 128, "fatal: unable to access\n"));

        let view = plain(&page);
        assert!(view.contains("west update failed (exit code: 128)"));
        assert!(!view.contains("fatal: unable to access"));
    }
}
