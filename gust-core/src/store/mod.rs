//! Build/flash/test history
//!
//! Records are append-only. [`JsonRecordStore`] keeps one JSON array per
//! record kind under `<workspace>/.gust/history/`.

mod json;
mod memory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;

pub use json::JsonRecordStore;
pub use memory::InMemoryRecordStore;

/// Result of one `west build`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecord {
    pub board: String,
    pub app: String,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub shield: String,
    #[serde(default)]
    pub pristine: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cmake_args: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub build_dir: String,
    /// Size of `zephyr/zephyr.bin` after a successful build
    #[serde(default)]
    pub binary_size: u64,
}

/// Result of one `west flash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashRecord {
    pub board: String,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub runner: String,
}

/// Result of one test run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecord {
    pub board: String,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub duration_ms: u64,
}

/// A serial port selected for monitoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialLog {
    pub port: String,
    pub baud_rate: u32,
    pub timestamp: DateTime<Utc>,
}

/// History persistence
pub trait RecordStore: Send + Sync {
    fn add_build(&self, record: BuildRecord) -> CoreResult<()>;
    fn add_flash(&self, record: FlashRecord) -> CoreResult<()>;
    fn add_test(&self, record: TestRecord) -> CoreResult<()>;
    fn add_serial_log(&self, record: SerialLog) -> CoreResult<()>;

    /// All build records, oldest first
    fn builds(&self) -> CoreResult<Vec<BuildRecord>>;
    fn flashes(&self) -> CoreResult<Vec<FlashRecord>>;
    fn tests(&self) -> CoreResult<Vec<TestRecord>>;
    fn serial_logs(&self) -> CoreResult<Vec<SerialLog>>;
}
