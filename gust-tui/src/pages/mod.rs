//! 页面
//!
//! 每个页面自己持有状态、处理消息并渲染为文本：
//!
//! ┌─────────────┐ init()              ┌─────────────┐
//! │             │ ──────────────────▶ │             │
//! │   Runtime   │ update(&Message)    │  dyn Page   │ ──▶ Option<Cmd>
//! │ (update/)   │ ──────────────────▶ │             │
//! │             │ view()              │             │ ──▶ Text<'static>
//! └─────────────┘ ──────────────────▶ └─────────────┘
//!
//! 页面发起的后台命令都带 RequestId（见 `gust_core::request`），
//! 命令结果会广播给所有页面，只有正在等待该 id 的页面会应用它。

mod artifacts;
mod build;
mod config;
mod console;
mod flash;
mod monitor;
mod settings;
mod test_runner;
mod west;
mod workspace;

use ratatui::text::Text;

use gust_core::GustConfig;

use crate::backend::{Cmd, Services};
use crate::message::Message;
use crate::model::{PageId, PAGE_ORDER};

pub use artifacts::ArtifactsPage;
pub use build::BuildPage;
pub use config::ConfigPage;
pub use flash::FlashPage;
pub use monitor::MonitorPage;
pub use settings::SettingsPage;
pub use test_runner::TestPage;
pub use west::WestPage;
pub use workspace::WorkspacePage;

/// 快捷键提示：(按键, 说明)
pub type KeyHint = (&'static str, &'static str);

/// 页面能力
pub trait Page {
    /// 启动时调用一次，可返回后台加载任务
    fn init(&mut self) -> Option<Cmd>;

    /// 处理一条消息；不认识的消息直接忽略
    fn update(&mut self, msg: &Message) -> Option<Cmd>;

    /// 渲染当前状态，不修改状态
    fn view(&self) -> Text<'static>;

    fn name(&self) -> &'static str;

    /// 内容区聚焦时状态栏显示的快捷键
    fn short_help(&self) -> Vec<KeyHint>;

    /// 内容区可用尺寸（不含边框）
    fn set_size(&mut self, width: u16, height: u16);

    /// 可选能力：是否正在占用文本输入
    fn as_input_capture(&self) -> Option<&dyn InputCapture> {
        None
    }
}

/// 含文本输入框的页面实现此能力
///
/// 返回 true 时，除强制退出外的全局快捷键都让给页面
pub trait InputCapture {
    fn input_captured(&self) -> bool;
}

/// 页面注册表，每个 `PageId` 恰好一个实例
pub struct PageRegistry {
    pages: Vec<Box<dyn Page>>,
}

impl PageRegistry {
    /// 按 `PAGE_ORDER` 为每个页面构造实例
    pub fn from_fn(mut make: impl FnMut(PageId) -> Box<dyn Page>) -> Self {
        Self {
            pages: PAGE_ORDER.iter().map(|&id| make(id)).collect(),
        }
    }

    /// 构造全部正式页面
    pub fn standard(services: &Services, config: &GustConfig) -> Self {
        Self::from_fn(|id| -> Box<dyn Page> {
            match id {
                PageId::Workspace => Box::new(WorkspacePage::new(services.clone())),
                PageId::Build => Box::new(BuildPage::new(services.clone(), config)),
                PageId::Flash => Box::new(FlashPage::new(services.clone(), config)),
                PageId::Monitor => Box::new(MonitorPage::new(services.clone(), config)),
                PageId::Test => Box::new(TestPage::new(services.clone(), config)),
                PageId::Artifacts => Box::new(ArtifactsPage::new(services.clone())),
                PageId::West => Box::new(WestPage::new(services.clone())),
                PageId::Config => Box::new(ConfigPage::new(services.clone(), config)),
                PageId::Settings => Box::new(SettingsPage::new(services.clone(), config)),
            }
        })
    }

    pub fn get(&self, id: PageId) -> &dyn Page {
        &*self.pages[id.index()]
    }

    pub fn get_mut(&mut self, id: PageId) -> &mut dyn Page {
        &mut *self.pages[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PageId, &dyn Page)> {
        PAGE_ORDER.iter().copied().zip(self.pages.iter().map(|p| &**p))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Page>> {
        self.pages.iter_mut()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! 页面测试辅助

    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use gust_core::{
        CommandOutput, CommandResult, CommandRunner, InMemoryConfigService, InMemoryRecordStore,
        RequestId, Workspace,
    };

    use super::*;

    /// 记录调用、不真正执行的 runner
    #[derive(Default)]
    pub struct FakeRunner {
        pub calls: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl CommandRunner for FakeRunner {
        async fn run(&self, _program: &str, args: &[String]) -> CommandOutput {
            self.calls.lock().unwrap().push(args.to_vec());
            CommandOutput {
                output: String::new(),
                exit_code: 0,
                duration: Duration::ZERO,
            }
        }
    }

    pub struct Harness {
        pub services: Services,
        pub runner: Arc<FakeRunner>,
        pub config: Arc<InMemoryConfigService>,
        pub store: Arc<InMemoryRecordStore>,
        pub dir: tempfile::TempDir,
    }

    pub fn harness(config: GustConfig) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(FakeRunner::default());
        let config = Arc::new(InMemoryConfigService::new(config));
        let store = Arc::new(InMemoryRecordStore::new());
        let services = Services {
            runner: runner.clone(),
            config: config.clone(),
            store: store.clone(),
            workspace: Workspace {
                root: dir.path().to_path_buf(),
                manifest_path: None,
                initialized: true,
            },
        };
        Harness {
            services,
            runner,
            config,
            store,
            dir,
        }
    }

    pub fn key(code: KeyCode) -> Message {
        Message::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    pub fn ch(c: char) -> Message {
        key(KeyCode::Char(c))
    }

    pub fn ctrl(c: char) -> Message {
        Message::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    pub fn result(id: &str, exit_code: i32, output: &str) -> Message {
        Message::CommandResult(CommandResult {
            request_id: RequestId::from(id),
            output: output.to_string(),
            exit_code,
            duration: Duration::from_millis(1500),
        })
    }

    /// 渲染结果转为纯文本
    pub fn plain(page: &dyn Page) -> String {
        page.view()
            .lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// 驱动一个 Cmd 得到消息
    pub fn run(cmd: Cmd) -> Message {
        futures::executor::block_on(cmd)
    }
}
