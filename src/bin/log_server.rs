// 日志查询服务主程序
use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use log_query::logcommon::{init_logging, ServerConfig};
use log_query::logserver::start_web_server;
use log_query::logstore::{JsonFileStore, MemoryStore, SharedStore};

#[derive(Parser)]
#[command(name = "log_server")]
#[command(about = "日志接收与查询服务 - POST /logs 写入，GET /logs 过滤查询")]
#[command(version = "0.1.0")]
struct Cli {
    /// 配置文件路径（默认读取 CONFIG_PATH 或 config/LogQueryConfig.toml）
    #[arg(short, long)]
    config: Option<String>,

    /// 监听地址
    #[arg(long)]
    host: Option<String>,

    /// 监听端口
    #[arg(short, long)]
    port: Option<u16>,

    /// JSON数据文件路径
    #[arg(long)]
    data_file: Option<String>,

    /// 只保存在内存中，不读写数据文件
    #[arg(long, default_value_t = false)]
    memory: bool,

    /// 前端页面目录
    #[arg(long)]
    static_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ServerConfig::load(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);
    config.validate()?;

    // guard 持有到进程结束
    let _log_guard = init_logging(&config.logging)?;

    info!("🚀 启动日志查询服务");

    let store: SharedStore = if cli.memory {
        info!("📋 使用内存存储，重启后数据丢失");
        Arc::new(MemoryStore::new())
    } else {
        info!("📋 使用数据文件: {}", config.storage.data_file);
        Arc::new(JsonFileStore::new(&config.storage.data_file))
    };

    print_startup_info(&config);

    start_web_server(&config, store).await?;

    Ok(())
}

/// 命令行参数覆盖配置文件
fn apply_overrides(config: &mut ServerConfig, cli: &Cli) {
    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(data_file) = &cli.data_file {
        config.storage.data_file = data_file.clone();
    }
    if let Some(static_dir) = &cli.static_dir {
        config.web.static_dir = static_dir.clone();
    }
}

/// 打印启动信息
fn print_startup_info(config: &ServerConfig) {
    let port = config.server.port;
    println!();
    println!("📜 日志查询服务");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("🌐 日志浏览页面: http://localhost:{}", port);
    println!("💓 健康检查:     GET  http://localhost:{}/health", port);
    println!("📥 写入日志:     POST http://localhost:{}/logs", port);
    println!("🔍 查询日志:     GET  http://localhost:{}/logs", port);
    println!();
    println!("💡 支持的查询参数:");
    println!("  level, message, resourceId, traceId, spanId, commit,");
    println!("  timestamp_start, timestamp_end");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}
