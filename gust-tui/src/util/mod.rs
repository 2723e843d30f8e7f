//! 工具模块

mod terminal;
pub mod text;

pub use terminal::{init_terminal, restore_terminal, Term};
