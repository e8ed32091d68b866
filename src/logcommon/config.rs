//! 日志查询服务配置模块

use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::logcommon::{AppError, Result};

/// 配置常量
pub mod constants {
    /// 默认配置文件路径
    pub const DEFAULT_CONFIG_PATH: &str = "config/LogQueryConfig.toml";

    /// 默认监听端口
    pub const DEFAULT_PORT: u16 = 3001;

    /// 默认数据文件
    pub const DEFAULT_DATA_FILE: &str = "logs.json";

    /// 默认静态资源目录
    pub const DEFAULT_STATIC_DIR: &str = "static";
}

use constants::*;

/// 日志查询服务配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听配置
    pub server: ListenConfig,

    /// 存储配置
    pub storage: StorageConfig,

    /// 前端页面配置
    pub web: WebConfig,

    /// 日志配置
    pub logging: LoggingConfig,
}

/// 监听配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON文档路径，整个日志集合保存在其中
    pub data_file: String,
}

/// 前端页面配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// index.html 及静态资源所在目录
    pub static_dir: String,

    /// 是否允许跨域访问
    pub enable_cors: bool,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter 语法的日志级别
    pub log_level: String,

    /// 设置后额外按天滚动写入该目录
    pub log_dir: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: DEFAULT_DATA_FILE.to_string(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            static_dir: DEFAULT_STATIC_DIR.to_string(),
            enable_cors: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl ServerConfig {
    /// 从文件加载配置
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML文本解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AppError::ConfigError(format!("解析配置文件失败: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// 按优先级加载配置：显式路径 > CONFIG_PATH 环境变量 > 默认路径
    ///
    /// 文件不存在时使用默认配置；文件存在但格式错误时返回错误。
    /// 之后再叠加 PORT 环境变量。
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_string(),
            None => std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string()),
        };

        let mut config = if Path::new(&config_path).exists() {
            eprintln!("从配置文件读取配置: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            eprintln!("配置文件不存在: {}，使用默认配置", config_path);
            Self::default()
        };

        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port
                .parse()
                .map_err(|e| AppError::ConfigError(format!("无效的PORT环境变量 {}: {}", port, e)))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::ConfigError(format!("序列化配置失败: {}", e)))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::ConfigError("监听端口必须大于0".to_string()));
        }

        if self.storage.data_file.trim().is_empty() {
            return Err(AppError::ConfigError("数据文件路径不能为空".to_string()));
        }

        if self.logging.log_level.trim().is_empty() {
            return Err(AppError::ConfigError("日志级别不能为空".to_string()));
        }

        Ok(())
    }

    /// 监听地址 host:port
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
