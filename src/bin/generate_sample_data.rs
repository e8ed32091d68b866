//! 生成示例日志数据
//!
//! 随机生成若干条分布在过去几天内的日志，整体替换数据文件内容

use anyhow::{Context, Result};
use chrono::{Duration, SecondsFormat, Utc};
use clap::Parser;
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::{json, Value};

use log_query::logcommon::{LogRecord, ServerConfig};
use log_query::logquery::validate_log_entry;
use log_query::logstore::JsonFileStore;

const LEVELS: &[&str] = &["error", "warn", "info", "debug"];

const RESOURCE_IDS: &[&str] = &[
    "server-1234",
    "server-5678",
    "api-gateway-01",
    "database-cluster-1",
    "cache-server-01",
];

const MESSAGES: &[&str] = &[
    "Failed to connect to database",
    "User authentication successful",
    "API request processed successfully",
    "Cache miss for key: user_profile_123",
    "Database query timeout exceeded",
    "Memory usage at 85%",
    "New user registration completed",
    "Payment processing failed",
    "Backup job started",
    "Email notification sent",
    "File upload completed",
    "Database connection pool exhausted",
    "Rate limit exceeded for IP: 192.168.1.100",
    "SSL certificate expires in 30 days",
    "Service health check passed",
];

#[derive(Parser)]
#[command(name = "generate_sample_data")]
#[command(about = "生成示例日志并写入数据文件（覆盖已有内容）")]
struct Cli {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 数据文件路径，默认取配置中的 storage.data_file
    #[arg(long)]
    data_file: Option<String>,

    /// 生成条数
    #[arg(long, default_value_t = 50)]
    count: usize,

    /// 时间分布在过去多少天内
    #[arg(long, default_value_t = 7)]
    days: i64,
}

fn random_token<R: Rng>(rng: &mut R, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect()
}

/// 生成一条候选日志（未校验的JSON）
fn sample_candidate<R: Rng>(rng: &mut R, days: i64) -> Value {
    let window_ms = Duration::days(days.max(1)).num_milliseconds();
    let timestamp = Utc::now() - Duration::milliseconds(rng.gen_range(0..window_ms));

    json!({
        "level": LEVELS.choose(rng).copied().unwrap_or("info"),
        "message": MESSAGES.choose(rng).copied().unwrap_or("Service health check passed"),
        "resourceId": RESOURCE_IDS.choose(rng).copied().unwrap_or("server-1234"),
        "timestamp": timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        "traceId": format!("trace-{}", random_token(rng, 9)),
        "spanId": format!("span-{}", random_token(rng, 9)),
        "commit": format!("{:07x}", rng.gen_range(0..0x1000_0000u32)),
        "metadata": {
            "userId": rng.gen_range(0..1000),
            "requestId": format!("req-{}", random_token(rng, 9)),
            "duration": rng.gen_range(0..5000),
            "ipAddress": format!("192.168.1.{}", rng.gen_range(0..255)),
            "userAgent": "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
        }
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref())?;
    let data_file = cli.data_file.unwrap_or(config.storage.data_file);

    println!("正在生成示例日志数据...");

    let mut rng = rand::thread_rng();
    let records = (0..cli.count)
        .map(|_| validate_log_entry(&sample_candidate(&mut rng, cli.days)))
        .collect::<Result<Vec<LogRecord>, _>>()
        .context("生成的示例日志未通过校验")?;

    println!("已生成 {} 条示例日志", records.len());

    let store = JsonFileStore::new(&data_file);
    store
        .replace_all(records.clone())
        .with_context(|| format!("写入数据文件失败: {}", data_file))?;

    println!("示例数据已写入 {}", store.path().display());
    println!("现在可以启动 log_server 并访问接口。");

    println!();
    println!("示例日志:");
    for (index, record) in records.iter().take(3).enumerate() {
        println!(
            "{}. [{}] {} ({})",
            index + 1,
            record.level.as_str().to_uppercase(),
            record.message,
            record.resource_id
        );
    }

    Ok(())
}
