//! View 层：界面渲染
//!
//! 有模块结构：
//!     src/view/mod.rs
//!         mod components;     // 侧边栏、项目栏、状态栏、帮助浮层、选择框浮层
//!         mod layout;         // 主布局
//!         pub mod theme;      // 颜色与样式
//!
//!     ┌──────────────────────── 项目栏 ─────────────────────────┐
//!     ├─ 侧边栏 ─┬──────────────── 当前页面 ─────────────────────┤
//!     │ ⌂ Work.. │                                               │
//!     │ ⚒ Build  │                page.view()                    │
//!     │ ...      │                                               │
//!     ├──────────┴─────────────── 状态栏 ────────────────────────┤
//!
//! 渲染只读取状态；页面内容由 `Page::view` 生成后放进内容区。

mod components;
mod layout;
pub mod theme;

pub use layout::render;
