// 导出共享模块
pub mod models;
pub mod error;
pub mod config;
pub mod logging_setup;

// 重新导出常用类型，方便使用
pub use models::{Level, LogCriteria, LogRecord};
pub use error::{Result, AppError, ValidationError};
pub use config::ServerConfig;
pub use logging_setup::init_logging;
