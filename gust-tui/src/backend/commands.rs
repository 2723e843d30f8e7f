//! 后台操作构造

use std::path::PathBuf;
use std::sync::Arc;

use futures::future::{self, BoxFuture};
use futures::FutureExt;
use gust_core::west::{self, Workspace, WorkspaceHealth};
use gust_core::{with_request_id, CommandRunner, CoreError, RequestId};

use crate::message::Message;

/// 一个后台操作：完成后产生一条消息
pub type Cmd = BoxFuture<'static, Message>;

/// west 可执行文件名（由 ExecContext 解析为实际路径）
pub const WEST: &str = "west";

/// 立即产生一条消息
pub fn emit(msg: Message) -> Cmd {
    future::ready(msg).boxed()
}

/// 运行 west 并用 `id` 标记结果
pub fn run_west(runner: &Arc<dyn CommandRunner>, id: RequestId, args: Vec<String>) -> Cmd {
    let runner = Arc::clone(runner);
    let output = async move { runner.run(WEST, &args).await };
    with_request_id(id, output)
        .map(Message::CommandResult)
        .boxed()
}

/// `west boards`
pub fn load_boards(runner: &Arc<dyn CommandRunner>) -> Cmd {
    let runner = Arc::clone(runner);
    async move {
        let out = runner.run(WEST, &["boards".to_string()]).await;
        let result = if out.success() {
            Ok(west::parse_boards(&out.output))
        } else {
            let detail = out.output.lines().next().unwrap_or_default().to_string();
            Err(format!("west boards failed (exit code: {}) {detail}", out.exit_code))
        };
        Message::BoardsLoaded(result)
    }
    .boxed()
}

/// 扫描工作区中的 Zephyr 应用
pub fn load_projects(workspace: &Workspace) -> Cmd {
    let scan_root = workspace.project_root().to_path_buf();
    let ws_root = workspace.root.clone();
    blocking(
        move || {
            Message::ProjectsLoaded(
                west::discover_projects(&scan_root, &ws_root).map_err(describe),
            )
        },
        |e| Message::ProjectsLoaded(Err(e)),
    )
}

/// 枚举串口
pub fn load_ports() -> Cmd {
    blocking(
        || Message::PortsLoaded(west::list_ports().map_err(describe)),
        |e| Message::PortsLoaded(Err(e)),
    )
}

/// 读取 `<root>/<project>/prj.conf`
pub fn load_kconfig(workspace: &Workspace, project: &str) -> Cmd {
    let path: PathBuf = workspace.root.join(project).join("prj.conf");
    let project = project.to_string();
    let failed_project = project.clone();
    blocking(
        move || Message::KconfigLoaded {
            result: west::read_kconfig(&path).map_err(describe),
            project,
        },
        move |e| Message::KconfigLoaded {
            result: Err(e),
            project: failed_project,
        },
    )
}

/// 工作区健康检查
pub fn check_health(workspace: &Workspace) -> Cmd {
    let workspace = workspace.clone();
    // 检查本身失败时全部视为未通过
    blocking(
        move || Message::HealthChecked(workspace.check_health()),
        |_| Message::HealthChecked(WorkspaceHealth::default()),
    )
}

/// 记录错误并转为界面文本
fn describe(err: CoreError) -> String {
    if err.is_expected() {
        log::warn!("{err}");
    } else {
        log::error!("{err}");
    }
    err.to_string()
}

/// 文件系统类操作放到阻塞线程池
///
/// 任务 panic 或被取消时由 `failed` 构造对应加载消息的错误形式
fn blocking<F, E>(f: F, failed: E) -> Cmd
where
    F: FnOnce() -> Message + Send + 'static,
    E: FnOnce(String) -> Message + Send + 'static,
{
    async move {
        match tokio::task::spawn_blocking(f).await {
            Ok(msg) => msg,
            Err(e) => {
                log::error!("Background task failed: {e}");
                failed(format!("background task failed: {e}"))
            }
        }
    }
    .boxed()
}
