//! gust Core Library
//!
//! Platform-independent services behind the gust terminal control center:
//! - Command execution with an injected execution context (`executor`)
//! - Request correlation for background operations (`request`)
//! - Layered JSON configuration (`config`)
//! - Build/flash/test history (`store`)
//! - West workspace helpers: detection, health, boards, projects, Kconfig,
//!   serial ports (`west`)
//!
//! Nothing here knows about terminals; storage and process spawning sit
//! behind traits so the UI layer can be tested with in-memory doubles.

pub mod config;
pub mod error;
pub mod executor;
mod fsutil;
pub mod request;
pub mod store;
pub mod west;

// Re-export common types
pub use config::{
    ConfigService, GustConfig, InMemoryConfigService, JsonConfigService, DEFAULT_BAUD_RATE,
    DEFAULT_BUILD_DIR,
};
pub use error::{CoreError, CoreResult};
pub use executor::{CommandOutput, CommandRunner, ExecContext, ProcessRunner, LAUNCH_FAILURE};
pub use request::{with_request_id, CommandResult, RequestId, RequestSeq, RequestTracker};
pub use store::{
    BuildRecord, FlashRecord, InMemoryRecordStore, JsonRecordStore, RecordStore, SerialLog,
    TestRecord,
};
pub use west::Workspace;
