// 导出服务器相关模块
pub mod web;

// 重新导出一些常用模块，方便使用
pub use self::web::server::{create_app, serve, start_web_server, AppState};
pub use crate::logcommon::{AppError, Result, ServerConfig};
pub use crate::logstore::{JsonFileStore, LogStore, MemoryStore, SharedStore};
