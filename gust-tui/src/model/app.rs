//! 运行时主状态

use gust_core::GustConfig;

use super::{FocusArea, PageId, Picker};
use crate::backend::{Cmd, Services};
use crate::message::Selection;
use crate::pages::{Page, PageRegistry};

/// 侧边栏宽度（含边框）
pub const SIDEBAR_WIDTH: u16 = 22;

/// 顶部项目栏与底部状态栏各占一行
const CHROME_ROWS: u16 = 2;

/// 终端尺寸 → 页面内容区可用尺寸（去掉侧边栏与内容区边框）
pub const fn content_size(width: u16, height: u16) -> (u16, u16) {
    (
        width.saturating_sub(SIDEBAR_WIDTH).saturating_sub(2),
        height.saturating_sub(CHROME_ROWS).saturating_sub(2),
    )
}

/// 运行时状态
pub struct App {
    /// 是否应该退出
    pub should_quit: bool,

    /// 当前焦点区域
    pub focus: FocusArea,

    /// 当前页面
    pub active: PageId,

    /// 帮助浮层
    pub show_help: bool,

    /// 终端尺寸
    pub size: (u16, u16),

    /// 全部页面，每个 PageId 一个
    pub pages: PageRegistry,

    /// 打开中的选择框；打开时独占键盘
    pub picker: Option<Picker>,

    /// 项目栏显示的当前选择
    pub selection: Selection,

    pub services: Services,
}

impl App {
    /// 创建带全部正式页面的运行时
    pub fn new(services: Services, config: &GustConfig) -> Self {
        let pages = PageRegistry::standard(&services, config);
        Self::with_pages(services, config, pages)
    }

    pub fn with_pages(services: Services, config: &GustConfig, pages: PageRegistry) -> Self {
        Self {
            should_quit: false,
            focus: FocusArea::Sidebar,
            active: PageId::default(),
            show_help: false,
            size: (0, 0),
            pages,
            picker: None,
            selection: Selection::from_config(config),
            services,
        }
    }

    /// 依次调用每个页面的 init，收集后台任务
    pub fn init(&mut self) -> Vec<Cmd> {
        self.pages
            .iter_mut()
            .filter_map(|page| page.init())
            .collect()
    }

    pub fn active_page(&self) -> &dyn Page {
        self.pages.get(self.active)
    }

    /// 当前页面是否正在占用文本输入
    pub fn input_captured(&self) -> bool {
        self.active_page()
            .as_input_capture()
            .is_some_and(|c| c.input_captured())
    }
}
