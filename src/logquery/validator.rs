//! 日志条目校验
//!
//! 对提交的原始JSON逐项检查，首个失败项直接返回：
//! 1. 八个必填字段齐全
//! 2. level 属于允许的四个取值
//! 3. timestamp 符合 `YYYY-MM-DDTHH:MM:SS[.mmm]Z`
//! 4. 文本字段为字符串，metadata 为对象

use crate::logcommon::{Level, LogRecord, ValidationError};
use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// 必填字段，按检查顺序排列
pub const REQUIRED_FIELDS: [&str; 8] = [
    "level",
    "message",
    "resourceId",
    "timestamp",
    "traceId",
    "spanId",
    "commit",
    "metadata",
];

static TIMESTAMP_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{3})?Z$").expect("timestamp pattern is valid")
});

/// 时间字符串是否符合入库格式
pub fn is_valid_timestamp(timestamp: &str) -> bool {
    // 正则只管形状，2023-13-45 这种需要再解析一次
    TIMESTAMP_PATTERN.is_match(timestamp) && DateTime::parse_from_rfc3339(timestamp).is_ok()
}

/// 校验一条候选日志，成功时返回类型化的记录
///
/// 不修改输入；非对象的输入视为一个字段都没有
pub fn validate_log_entry(candidate: &Value) -> Result<LogRecord, ValidationError> {
    let empty = Map::new();
    let fields = candidate.as_object().unwrap_or(&empty);

    if let Some(missing) = REQUIRED_FIELDS.iter().find(|field| !fields.contains_key(**field)) {
        return Err(ValidationError::MissingField(*missing));
    }

    let level = fields["level"]
        .as_str()
        .ok_or(ValidationError::InvalidLevel)?
        .parse::<Level>()?;

    let timestamp = fields["timestamp"]
        .as_str()
        .filter(|ts| is_valid_timestamp(ts))
        .ok_or(ValidationError::InvalidTimestamp)?;

    let text = |field: &'static str| -> Result<String, ValidationError> {
        fields[field]
            .as_str()
            .map(str::to_string)
            .ok_or(ValidationError::InvalidType(field))
    };

    let message = text("message")?;
    let resource_id = text("resourceId")?;
    let trace_id = text("traceId")?;
    let span_id = text("spanId")?;
    let commit = text("commit")?;

    let metadata = fields["metadata"]
        .as_object()
        .cloned()
        .ok_or(ValidationError::InvalidType("metadata"))?;

    Ok(LogRecord {
        level,
        message,
        resource_id,
        timestamp: timestamp.to_string(),
        trace_id,
        span_id,
        commit,
        metadata,
    })
}
