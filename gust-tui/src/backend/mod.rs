//! 后端服务层
//!
//! 页面通过 [`Services`] 访问 gust-core 的能力；
//! 所有后台操作都包装成 [`Cmd`]，由主循环调度到 tokio 运行时，
//! 完成后作为 [`Message`](crate::message::Message) 回到主循环

mod commands;

use std::sync::Arc;

use gust_core::{CommandRunner, ConfigService, RecordStore, Workspace};

pub use commands::{
    check_health, emit, load_boards, load_kconfig, load_ports, load_projects, run_west, Cmd, WEST,
};

/// 页面共享的服务句柄
#[derive(Clone)]
pub struct Services {
    pub runner: Arc<dyn CommandRunner>,
    pub config: Arc<dyn ConfigService>,
    pub store: Arc<dyn RecordStore>,
    pub workspace: Workspace,
}
