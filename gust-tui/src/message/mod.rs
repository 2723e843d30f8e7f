//! 消息定义
//!
//! ┌──────────────┐  Key / Resize   ┌─────────┐
//! │ event::poll  │ ──────────────▶ │         │
//! └──────────────┘                 │         │  按键：按优先级路由给
//! ┌──────────────┐  CommandResult  │ update  │        Picker / 侧边栏 / 当前页面
//! │ 后台任务 Cmd │ ──────────────▶ │         │
//! └──────────────┘  *Loaded        │         │  其余消息：广播给所有页面
//! ┌──────────────┐  Tick           │         │
//! │ 主循环定时器 │ ──────────────▶ │         │
//! └──────────────┘                 └─────────┘

mod app;
mod broadcast;

pub use app::Message;
pub use broadcast::{BroadcastEvent, Selection};
