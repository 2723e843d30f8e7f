//! Model 层：运行时状态
//!
//! 有模块结构：
//!     src/model/mod.rs
//!         mod app;        // 运行时主状态（焦点、当前页、选择框、页面注册表）
//!         mod focus;      // 焦点区域（Sidebar / Content）
//!         mod input;      // 单行文本输入
//!         mod page;       // 页面标识与侧边栏顺序
//!         mod picker;     // 模糊筛选选择框
//!
//! 页面自身的业务状态不在这里：每个页面（src/pages/）拥有自己的子状态，
//! 运行时只通过 `Page` 能力访问它们。
//!
//! 状态只在 Update 层被修改，View 层只读。

mod app;
mod focus;
mod input;
mod page;
mod picker;

pub use app::{content_size, App, SIDEBAR_WIDTH};
pub use focus::FocusArea;
pub use input::TextInput;
pub use page::{PageId, PAGE_ORDER};
pub use picker::{Picker, PickerEvent, PickerItem, PickerKind};
