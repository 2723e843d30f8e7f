//! 广播事件

/// 选择变化事件，投递给所有页面
///
/// 只携带值；重复投递是幂等的，页面只覆盖自己缓存的副本
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastEvent {
    /// 相对工作区根目录的项目路径
    ProjectSelected(String),
    BoardSelected(String),
    ShieldSelected(String),
    BuildDirChanged(String),
    FlashRunnerChanged(String),
}

/// 各页面缓存的选择值
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub project: String,
    pub board: String,
    pub shield: String,
    pub build_dir: String,
    pub flash_runner: String,
}

impl Selection {
    pub fn from_config(config: &gust_core::GustConfig) -> Self {
        Self {
            project: config.last_project.clone(),
            board: config.default_board.clone(),
            shield: config.last_shield.clone(),
            build_dir: config.build_dir.clone(),
            flash_runner: config.flash_runner.clone(),
        }
    }

    /// 用事件覆盖对应字段
    pub fn apply(&mut self, event: &BroadcastEvent) {
        match event {
            BroadcastEvent::ProjectSelected(v) => self.project.clone_from(v),
            BroadcastEvent::BoardSelected(v) => self.board.clone_from(v),
            BroadcastEvent::ShieldSelected(v) => self.shield.clone_from(v),
            BroadcastEvent::BuildDirChanged(v) => self.build_dir.clone_from(v),
            BroadcastEvent::FlashRunnerChanged(v) => self.flash_runner.clone_from(v),
        }
    }
}
