//! gust
//!
//! Zephyr west 工作区的终端控制台
//!
//! ## 架构
//!
//! 采用 Elm Architecture (TEA) 模式：
//! - **Model**: 运行时状态 (`model/`)
//! - **Message**: 事件消息 (`message/`)
//! - **Update**: 消息路由 (`update/`)
//! - **View**: UI 渲染 (`view/`)
//! - **Event**: 输入处理 (`event/`)
//! - **Pages**: 各页面的状态与行为 (`pages/`)
//! - **Backend**: 后台任务与服务句柄 (`backend/`)
//!
//!
//! main.rs
//! 程序入口
//!
//! fn `main()` {
//!
//!     init_logging()          // 日志写入 <cache>/gust/gust.log，终端归 TUI 所有
//!     Workspace::detect()     // 从当前目录向上查找 west 工作区，找不到直接退出
//!     Services { .. }         // 配置、历史记录、命令执行器
//!     tokio Runtime           // 后台任务运行在这里
//!     init_terminal()
//!     app::run()              // 主循环
//!     restore_terminal()      // 无论成功与否，都恢复终端
//!
//! }

mod app;
mod backend;
mod event;
mod message;
mod model;
mod pages;
mod update;
mod util;
mod view;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use gust_core::{ConfigService, JsonConfigService, JsonRecordStore, ProcessRunner, Workspace};
use tracing_subscriber::EnvFilter;

use backend::Services;
use util::{init_terminal, restore_terminal};

/// 日志级别环境变量
const LOG_ENV: &str = "GUST_LOG";

fn main() -> Result<()> {
    // 1. 日志
    init_logging()?;

    // 2. 工作区
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let workspace = Workspace::detect(&cwd)
        .context("gust must be run inside a west workspace (no .west/ or west.yml found)")?;
    tracing::info!(root = %workspace.root.display(), "workspace detected");

    // 3. 服务
    let config_service = Arc::new(JsonConfigService::new(&workspace.root));
    let config = config_service.load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        gust_core::GustConfig::default()
    });
    let venv = (!config.venv_path.is_empty()).then(|| PathBuf::from(&config.venv_path));
    let runner = ProcessRunner::new(workspace.exec_context(venv.as_deref()));
    let services = Services {
        runner: Arc::new(runner),
        config: config_service,
        store: Arc::new(JsonRecordStore::new(&workspace.gust_dir())),
        workspace,
    };

    // 4. 运行时
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    // 5. 终端与主循环
    let mut app = model::App::new(services, &config);
    let mut terminal = init_terminal()?;
    let result = app::run(&mut terminal, &mut app, runtime.handle().clone());
    restore_terminal(&mut terminal)?;

    // 未完成的子进程不等待
    runtime.shutdown_background();

    result
}

/// 日志写入缓存目录下的 gust.log
fn init_logging() -> Result<()> {
    let dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("gust");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory '{}'", dir.display()))?;

    let path = dir.join("gust.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file '{}'", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| "info".into()))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
