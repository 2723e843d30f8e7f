//! 应用消息

use crossterm::event::KeyEvent;
use gust_core::west::{Board, KconfigEntry, PortInfo, Project, WorkspaceHealth};
use gust_core::CommandResult;

use super::BroadcastEvent;

/// 主循环中流动的唯一消息类型
///
/// 加载类消息的错误以字符串携带，由页面直接显示
#[derive(Debug, Clone)]
pub enum Message {
    /// 按键（只包含 Press）
    Key(KeyEvent),

    /// 终端尺寸变化
    Resize(u16, u16),

    /// 定时心跳
    Tick,

    /// 选择变化广播
    Broadcast(BroadcastEvent),

    /// 带 RequestId 的命令完成结果
    CommandResult(CommandResult),

    /// `west boards` 结果
    BoardsLoaded(Result<Vec<Board>, String>),

    /// 项目扫描结果
    ProjectsLoaded(Result<Vec<Project>, String>),

    /// 串口枚举结果
    PortsLoaded(Result<Vec<PortInfo>, String>),

    /// `prj.conf` 读取结果
    KconfigLoaded {
        project: String,
        result: Result<Vec<KconfigEntry>, String>,
    },

    /// 工作区健康检查结果
    HealthChecked(WorkspaceHealth),

    /// 某个页面写入了配置或历史记录
    ///
    /// 串口、波特率等不在广播集合里的字段靠它同步；收到后从服务重新读取
    Persisted,
}
