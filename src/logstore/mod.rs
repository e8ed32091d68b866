//! 日志存储
//!
//! 存储以 trait 形式注入 Web 层，运行时使用 JSON 文件，测试时使用内存实现

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::logcommon::{LogRecord, Result};
use std::sync::Arc;

/// 日志存储后端
///
/// 实现方需要保证：
/// - read_all 在尚无数据时返回空集合而不是错误
/// - append 之后 read_all 能读到该记录，且位于末尾
///
/// 不要求并发安全的读-改-写，多个写入方并发时允许丢失更新
pub trait LogStore: Send + Sync {
    /// 追加一条已校验的记录
    fn append(&self, record: LogRecord) -> Result<()>;

    /// 读取全部记录，保持写入顺序
    fn read_all(&self) -> Result<Vec<LogRecord>>;
}

/// Web 层共享的存储句柄
pub type SharedStore = Arc<dyn LogStore>;
