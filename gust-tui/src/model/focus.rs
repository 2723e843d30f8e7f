//! 焦点状态定义

/// 焦点区域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusArea {
    /// 左侧页面导航
    #[default]
    Sidebar,
    /// 右侧页面内容
    Content,
}

impl FocusArea {
    /// 是否在侧边栏
    pub fn is_sidebar(self) -> bool {
        matches!(self, FocusArea::Sidebar)
    }

    /// 是否在内容区
    pub fn is_content(self) -> bool {
        matches!(self, FocusArea::Content)
    }
}
