use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::logcommon::{AppError, LogRecord, Result};
use super::LogStore;

/// 磁盘上的文档结构：整个集合放在单个顶层键下
#[derive(Debug, Default, Serialize, Deserialize)]
struct LogDocument {
    #[serde(default)]
    logs: Vec<LogRecord>,
}

/// 基于单个 JSON 文件的存储
///
/// 每次写入都完整读出、追加、再整体写回。没有部分写入保护，也没有文件锁，
/// 并发写入时后写者覆盖先写者。
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取文档；文件不存在或为空时视为空集合
    fn load(&self) -> Result<Vec<LogRecord>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "数据文件不存在，按空集合处理");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let document: LogDocument = serde_json::from_str(&content).map_err(|e| {
            AppError::StoreError(format!("数据文件格式错误 {}: {}", self.path.display(), e))
        })?;
        Ok(document.logs)
    }

    /// 整体写回
    fn save(&self, logs: Vec<LogRecord>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string(&LogDocument { logs })?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// 用给定记录替换全部内容
    #[instrument(skip(self, records), fields(path = %self.path.display(), count = records.len()), err)]
    pub fn replace_all(&self, records: Vec<LogRecord>) -> Result<()> {
        self.save(records)
    }
}

impl LogStore for JsonFileStore {
    #[instrument(skip(self, record), fields(path = %self.path.display()), err)]
    fn append(&self, record: LogRecord) -> Result<()> {
        let mut logs = self.load()?;
        logs.push(record);
        let total = logs.len();
        self.save(logs)?;
        debug!(total, "日志已写入数据文件");
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<LogRecord>> {
        self.load()
    }
}
