//! Event 层：终端事件 → Message
//!
//! 有模块结构：
//!     src/event/mod.rs
//!         mod handler;        // 轮询与翻译
//!         pub mod keymap;     // 快捷键定义
//!
//! 这一层不看任何状态，只做翻译；按键该交给谁由 Update 层决定。

mod handler;
pub mod keymap;

pub use handler::{handle_event, poll_event};
