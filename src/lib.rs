// 导出模块
pub mod logcommon;
pub mod logquery;
pub mod logstore;
pub mod logserver;

// Re-export error types
pub use logcommon::error::{AppError, Result};
