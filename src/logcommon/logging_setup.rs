//! 日志系统初始化模块
//!
//! 控制台输出始终开启；配置了 log_dir 时再叠加一个按天滚动的文件输出

use crate::logcommon::{config::LoggingConfig, AppError, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// 日志文件名前缀
const LOG_FILE_PREFIX: &str = "log_server.log";

/// 决定最终使用的过滤字符串，RUST_LOG 环境变量优先
pub fn resolve_log_filter(config: &LoggingConfig) -> String {
    if let Ok(env_log_level) = std::env::var("RUST_LOG") {
        if !env_log_level.trim().is_empty() {
            return env_log_level;
        }
    }

    format!("{},hyper=warn,tower_http=info", config.log_level)
}

/// 初始化日志系统
///
/// 返回的 guard 必须由 main 持有到进程结束，否则文件日志可能丢失尾部内容
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter_str = resolve_log_filter(config);

    let console_layer = fmt::layer()
        .with_target(true)
        .with_filter(EnvFilter::new(&filter_str));

    // 使用 Option<Layer> 处理条件层
    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(EnvFilter::new(&filter_str));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::ConfigError(format!("日志系统初始化失败: {}", e)))?;

    tracing::debug!(filter = %filter_str, file_output = config.log_dir.is_some(), "日志系统初始化完成");

    Ok(guard)
}
