use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::error::ValidationError;

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
}

impl Level {
    /// 所有允许的级别，按严重程度排列
    pub const ALL: [Level; 4] = [Level::Error, Level::Warn, Level::Info, Level::Debug];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ValidationError;

    /// 只接受小写形式，`ERROR` 之类视为非法级别
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .iter()
            .copied()
            .find(|level| level.as_str() == s)
            .ok_or(ValidationError::InvalidLevel)
    }
}

/// 一条结构化日志记录 - 存储与接口共用的格式
///
/// 记录没有独立的ID，只由字段值标识
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    /// 日志级别
    pub level: Level,
    /// 日志正文
    pub message: String,
    /// 产生日志的资源，例如 server-1234
    pub resource_id: String,
    /// 提交时的原始时间字符串 (YYYY-MM-DDTHH:MM:SS[.mmm]Z)
    pub timestamp: String,
    pub trace_id: String,
    pub span_id: String,
    /// 产生日志的代码提交
    pub commit: String,
    /// 任意键值对
    pub metadata: Map<String, Value>,
}

impl LogRecord {
    /// 解析后的时间点；存量数据被手工改坏时返回 None
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// 查询条件 - 对应 GET /logs 的查询参数
///
/// 所有字段可选；缺失或空字符串都表示不约束
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogCriteria {
    pub level: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "resourceId")]
    pub resource_id: Option<String>,
    pub timestamp_start: Option<String>,
    pub timestamp_end: Option<String>,
    #[serde(rename = "traceId")]
    pub trace_id: Option<String>,
    #[serde(rename = "spanId")]
    pub span_id: Option<String>,
    pub commit: Option<String>,
}

/// 取出有效（非空）的条件值
pub(crate) fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl LogCriteria {
    /// 是否一个有效条件都没有
    pub fn is_empty(&self) -> bool {
        [
            &self.level,
            &self.message,
            &self.resource_id,
            &self.timestamp_start,
            &self.timestamp_end,
            &self.trace_id,
            &self.span_id,
            &self.commit,
        ]
        .into_iter()
        .all(|value| active(value).is_none())
    }
}
