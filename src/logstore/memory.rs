use std::sync::RwLock;

use crate::logcommon::{AppError, LogRecord, Result};
use super::LogStore;

/// 进程内存储，用于测试和 `--memory` 运行模式
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<LogRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用已有记录初始化
    pub fn with_records(records: Vec<LogRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl LogStore for MemoryStore {
    fn append(&self, record: LogRecord) -> Result<()> {
        self.records
            .write()
            .map_err(|e| AppError::StoreError(format!("内存存储锁已损坏: {}", e)))?
            .push(record);
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<LogRecord>> {
        let records = self
            .records
            .read()
            .map_err(|e| AppError::StoreError(format!("内存存储锁已损坏: {}", e)))?;
        Ok(records.clone())
    }
}
