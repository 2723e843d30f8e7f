//! 命令输出面板
//!
//! 运行 west 命令的页面共用：负责 RequestId 关联、输出累积、
//! 运行计时以及按宽度折行取尾部

use std::sync::Arc;
use std::time::{Duration, Instant};

use gust_core::west::commands;
use gust_core::{CommandResult, CommandRunner, RequestTracker};
use ratatui::text::Line;

use crate::backend::{self, Cmd, WEST};
use crate::util::text;
use crate::view::theme::Styles;

/// 单一操作类型的命令面板
#[derive(Debug, Clone)]
pub struct Console {
    tracker: RequestTracker,
    output: String,
    started: Option<Instant>,
    elapsed: Duration,
}

impl Console {
    pub const fn new(prefix: &'static str) -> Self {
        Self {
            tracker: RequestTracker::new(prefix),
            output: String::new(),
            started: None,
            elapsed: Duration::ZERO,
        }
    }

    /// 启动 `west <args>`，之前未完成的同类请求结果将被丢弃
    pub fn start(&mut self, runner: &Arc<dyn CommandRunner>, args: Vec<String>) -> Cmd {
        let id = self.tracker.begin();
        self.output = format!("{}\n\n", commands::echo(WEST, &args));
        self.started = Some(Instant::now());
        self.elapsed = Duration::ZERO;
        backend::run_west(runner, id, args)
    }

    /// 若是正在等待的结果则接收并追加输出
    pub fn finish(&mut self, result: &CommandResult) -> bool {
        if !self.tracker.complete(result) {
            return false;
        }
        self.started = None;
        self.elapsed = result.duration;
        self.output.push_str(&result.output);
        true
    }

    pub fn is_running(&self) -> bool {
        self.tracker.is_waiting()
    }

    pub fn tick(&mut self) {
        if let Some(started) = self.started {
            self.elapsed = started.elapsed();
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn push_line(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }

    pub fn clear(&mut self) {
        self.output.clear();
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    /// 折行后最后 `rows` 行
    pub fn tail(&self, width: u16, rows: usize) -> Vec<Line<'static>> {
        let wrapped: Vec<String> = self
            .output
            .lines()
            .flat_map(|line| text::wrap(line, usize::from(width)))
            .collect();
        let skip = wrapped.len().saturating_sub(rows);
        wrapped.into_iter().skip(skip).map(Line::from).collect()
    }
}

/// `success` 或 `failed (exit code: N)`
pub fn outcome(result: &CommandResult) -> String {
    if result.success() {
        "success".to_string()
    } else {
        format!("failed (exit code: {})", result.exit_code)
    }
}

/// 结果状态行，输出尾部被挤掉时也能看到成败
pub fn status_line(success: bool, text: &str) -> Line<'static> {
    let style = if success { Styles::success() } else { Styles::error() };
    Line::styled(format!("  {text}"), style)
}

pub fn format_duration(d: Duration) -> String {
    format!("{:.1}s", d.as_secs_f64())
}

pub fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
