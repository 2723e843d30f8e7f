use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{BuildRecord, FlashRecord, RecordStore, SerialLog, TestRecord};
use crate::error::{CoreError, CoreResult};
use crate::fsutil::write_atomic;

const BUILDS: &str = "builds.json";
const FLASHES: &str = "flashes.json";
const TESTS: &str = "tests.json";
const SERIAL_LOGS: &str = "serial_logs.json";

/// JSON-file record store rooted at a `.gust` directory.
#[derive(Debug)]
pub struct JsonRecordStore {
    history_dir: PathBuf,
    lock: Mutex<()>,
}

impl JsonRecordStore {
    pub fn new(gust_dir: &Path) -> Self {
        Self {
            history_dir: gust_dir.join("history"),
            lock: Mutex::new(()),
        }
    }

    pub fn history_dir(&self) -> &Path {
        &self.history_dir
    }

    fn guard(&self) -> CoreResult<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| CoreError::StorageError("record store lock poisoned".to_string()))
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> CoreResult<Vec<T>> {
        let path = self.history_dir.join(file);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if data.is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&data)
            .map_err(|e| CoreError::StorageError(format!("invalid {}: {e}", path.display())))
    }

    fn append<T: Serialize + DeserializeOwned>(&self, file: &str, record: T) -> CoreResult<()> {
        let _guard = self.guard()?;
        let mut records: Vec<T> = self.read(file)?;
        records.push(record);
        let data = serde_json::to_vec_pretty(&records)?;
        write_atomic(&self.history_dir.join(file), &data)
    }

    fn list<T: DeserializeOwned>(&self, file: &str) -> CoreResult<Vec<T>> {
        let _guard = self.guard()?;
        self.read(file)
    }
}

impl RecordStore for JsonRecordStore {
    fn add_build(&self, record: BuildRecord) -> CoreResult<()> {
        self.append(BUILDS, record)
    }

    fn add_flash(&self, record: FlashRecord) -> CoreResult<()> {
        self.append(FLASHES, record)
    }

    fn add_test(&self, record: TestRecord) -> CoreResult<()> {
        self.append(TESTS, record)
    }

    fn add_serial_log(&self, record: SerialLog) -> CoreResult<()> {
        self.append(SERIAL_LOGS, record)
    }

    fn builds(&self) -> CoreResult<Vec<BuildRecord>> {
        self.list(BUILDS)
    }

    fn flashes(&self) -> CoreResult<Vec<FlashRecord>> {
        self.list(FLASHES)
    }

    fn tests(&self) -> CoreResult<Vec<TestRecord>> {
        self.list(TESTS)
    }

    fn serial_logs(&self) -> CoreResult<Vec<SerialLog>> {
        self.list(SERIAL_LOGS)
    }
}
