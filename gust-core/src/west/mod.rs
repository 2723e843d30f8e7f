//! West workspace helpers
//!
//! Everything gust needs to know about a Zephyr west workspace that does
//! not involve running a long build: locating the workspace, checking its
//! health, listing boards and projects, reading `prj.conf`, and finding
//! serial ports.

mod boards;
pub mod commands;
mod kconfig;
mod projects;
mod serial;
mod workspace;

pub use boards::{parse_boards, Board};
pub use kconfig::{parse_kconfig, read_kconfig, KconfigEntry};
pub use projects::{discover_projects, Project};
pub use serial::{list_ports, PortInfo};
pub use workspace::{Workspace, WorkspaceHealth};
