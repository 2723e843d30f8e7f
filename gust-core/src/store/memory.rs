use std::sync::{Mutex, MutexGuard};

use super::{BuildRecord, FlashRecord, RecordStore, SerialLog, TestRecord};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Default)]
struct Records {
    builds: Vec<BuildRecord>,
    flashes: Vec<FlashRecord>,
    tests: Vec<TestRecord>,
    serial_logs: Vec<SerialLog>,
}

/// Record store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: Mutex<Records>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> CoreResult<MutexGuard<'_, Records>> {
        self.records
            .lock()
            .map_err(|_| CoreError::StorageError("record store lock poisoned".to_string()))
    }
}

impl RecordStore for InMemoryRecordStore {
    fn add_build(&self, record: BuildRecord) -> CoreResult<()> {
        self.records()?.builds.push(record);
        Ok(())
    }

    fn add_flash(&self, record: FlashRecord) -> CoreResult<()> {
        self.records()?.flashes.push(record);
        Ok(())
    }

    fn add_test(&self, record: TestRecord) -> CoreResult<()> {
        self.records()?.tests.push(record);
        Ok(())
    }

    fn add_serial_log(&self, record: SerialLog) -> CoreResult<()> {
        self.records()?.serial_logs.push(record);
        Ok(())
    }

    fn builds(&self) -> CoreResult<Vec<BuildRecord>> {
        Ok(self.records()?.builds.clone())
    }

    fn flashes(&self) -> CoreResult<Vec<FlashRecord>> {
        Ok(self.records()?.flashes.clone())
    }

    fn tests(&self) -> CoreResult<Vec<TestRecord>> {
        Ok(self.records()?.tests.clone())
    }

    fn serial_logs(&self) -> CoreResult<Vec<SerialLog>> {
        Ok(self.records()?.serial_logs.clone())
    }
}
