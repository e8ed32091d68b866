//! 过滤引擎
//!
//! 所有提供的条件取交集；缺失或空字符串的条件不做约束。
//! 输出保持输入中的相对顺序，排序由调用方负责。

use crate::logcommon::{models::active, LogCriteria, LogRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::warn;

/// 解析时间范围边界
///
/// 除 RFC 3339 外，还接受前端 datetime-local 产生的无时区格式（按UTC处理）以及纯日期
pub fn parse_bound(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// 预先解析好的条件，避免对每条记录重复处理
struct CompiledCriteria<'a> {
    level: Option<&'a str>,
    message: Option<String>,
    resource_id: Option<&'a str>,
    trace_id: Option<&'a str>,
    span_id: Option<&'a str>,
    commit: Option<&'a str>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl<'a> CompiledCriteria<'a> {
    fn compile(criteria: &'a LogCriteria) -> Self {
        Self {
            level: active(&criteria.level),
            message: active(&criteria.message).map(str::to_lowercase),
            resource_id: active(&criteria.resource_id),
            trace_id: active(&criteria.trace_id),
            span_id: active(&criteria.span_id),
            commit: active(&criteria.commit),
            start: compile_bound("timestamp_start", &criteria.timestamp_start),
            end: compile_bound("timestamp_end", &criteria.timestamp_end),
        }
    }

    fn matches(&self, record: &LogRecord) -> bool {
        if self.level.is_some_and(|level| record.level.as_str() != level) {
            return false;
        }

        if let Some(needle) = &self.message {
            if !record.message.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }

        let exact = [
            (self.resource_id, record.resource_id.as_str()),
            (self.trace_id, record.trace_id.as_str()),
            (self.span_id, record.span_id.as_str()),
            (self.commit, record.commit.as_str()),
        ];
        if exact.iter().any(|(wanted, actual)| wanted.is_some_and(|w| w != *actual)) {
            return false;
        }

        if self.start.is_some() || self.end.is_some() {
            // 时间无法解析的存量记录不可能落在任何范围内
            let Some(instant) = record.instant() else {
                return false;
            };
            if self.start.is_some_and(|start| instant < start) {
                return false;
            }
            if self.end.is_some_and(|end| instant > end) {
                return false;
            }
        }

        true
    }
}

fn compile_bound(name: &str, value: &Option<String>) -> Option<DateTime<Utc>> {
    let raw = active(value)?;
    let parsed = parse_bound(raw);
    if parsed.is_none() {
        warn!(bound = name, value = raw, "无法解析的时间范围边界，忽略该条件");
    }
    parsed
}

/// 按条件过滤日志
pub fn filter_logs(records: Vec<LogRecord>, criteria: &LogCriteria) -> Vec<LogRecord> {
    let compiled = CompiledCriteria::compile(criteria);
    records.into_iter().filter(|record| compiled.matches(record)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logcommon::Level;
    use chrono::TimeZone;
    use serde_json::Map;

    fn record(level: Level, message: &str, resource_id: &str, timestamp: &str) -> LogRecord {
        LogRecord {
            level,
            message: message.to_string(),
            resource_id: resource_id.to_string(),
            timestamp: timestamp.to_string(),
            trace_id: format!("trace-{}", resource_id),
            span_id: "span-1".to_string(),
            commit: "5e5342f".to_string(),
            metadata: Map::new(),
        }
    }

    fn sample() -> Vec<LogRecord> {
        vec![
            record(Level::Error, "Failed to connect to database", "server-1234", "2023-09-15T08:00:00Z"),
            record(Level::Info, "User authentication successful", "server-5678", "2023-09-15T09:00:00Z"),
            record(Level::Warn, "Database query timeout exceeded", "server-1234", "2023-09-15T10:00:00.500Z"),
            record(Level::Error, "Payment processing failed", "api-gateway-01", "2023-09-16T08:00:00Z"),
        ]
    }

    fn messages(records: &[LogRecord]) -> Vec<&str> {
        records.iter().map(|r| r.message.as_str()).collect()
    }

    #[test]
    fn test_no_criteria_returns_input_unchanged() {
        assert_eq!(filter_logs(sample(), &LogCriteria::default()), sample());

        let blank = LogCriteria {
            level: Some(String::new()),
            timestamp_start: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(filter_logs(sample(), &blank), sample());
    }

    #[test]
    fn test_level_is_exact_match() {
        let criteria = LogCriteria { level: Some("error".to_string()), ..Default::default() };
        let result = filter_logs(sample(), &criteria);
        assert_eq!(messages(&result), vec!["Failed to connect to database", "Payment processing failed"]);

        let upper = LogCriteria { level: Some("ERROR".to_string()), ..Default::default() };
        assert!(filter_logs(sample(), &upper).is_empty());
    }

    #[test]
    fn test_message_is_case_insensitive_substring() {
        let criteria = LogCriteria { message: Some("DATABASE".to_string()), ..Default::default() };
        let result = filter_logs(sample(), &criteria);
        assert_eq!(
            messages(&result),
            vec!["Failed to connect to database", "Database query timeout exceeded"]
        );
    }

    #[test]
    fn test_identifier_filters_are_exact() {
        let partial = LogCriteria { resource_id: Some("server-12".to_string()), ..Default::default() };
        assert!(filter_logs(sample(), &partial).is_empty());

        let trace = LogCriteria { trace_id: Some("trace-server-5678".to_string()), ..Default::default() };
        assert_eq!(messages(&filter_logs(sample(), &trace)), vec!["User authentication successful"]);

        let span = LogCriteria { span_id: Some("span-2".to_string()), ..Default::default() };
        assert!(filter_logs(sample(), &span).is_empty());

        let commit = LogCriteria { commit: Some("5e5342f".to_string()), ..Default::default() };
        assert_eq!(filter_logs(sample(), &commit).len(), 4);
    }

    #[test]
    fn test_criteria_are_conjunctive() {
        let criteria = LogCriteria {
            level: Some("error".to_string()),
            resource_id: Some("server-1234".to_string()),
            ..Default::default()
        };
        let result = filter_logs(sample(), &criteria);
        assert_eq!(messages(&result), vec!["Failed to connect to database"]);

        let contradictory = LogCriteria {
            level: Some("info".to_string()),
            message: Some("database".to_string()),
            ..Default::default()
        };
        assert!(filter_logs(sample(), &contradictory).is_empty());
    }

    #[test]
    fn test_timestamp_range_is_inclusive() {
        let criteria = LogCriteria {
            timestamp_start: Some("2023-09-15T09:00:00Z".to_string()),
            timestamp_end: Some("2023-09-15T10:00:00.500Z".to_string()),
            ..Default::default()
        };
        let result = filter_logs(sample(), &criteria);
        assert_eq!(
            messages(&result),
            vec!["User authentication successful", "Database query timeout exceeded"]
        );

        let exact = LogCriteria {
            timestamp_start: Some("2023-09-15T08:00:00Z".to_string()),
            timestamp_end: Some("2023-09-15T08:00:00Z".to_string()),
            ..Default::default()
        };
        assert_eq!(messages(&filter_logs(sample(), &exact)), vec!["Failed to connect to database"]);
    }

    #[test]
    fn test_bounds_are_compared_as_instants() {
        // 09:00+01:00 等于 08:00Z
        let criteria = LogCriteria {
            timestamp_end: Some("2023-09-15T09:00:00+01:00".to_string()),
            ..Default::default()
        };
        assert_eq!(messages(&filter_logs(sample(), &criteria)), vec!["Failed to connect to database"]);

        // 前端快捷过滤产生的分钟精度格式
        let minute = LogCriteria {
            timestamp_start: Some("2023-09-15T10:00".to_string()),
            ..Default::default()
        };
        assert_eq!(
            messages(&filter_logs(sample(), &minute)),
            vec!["Database query timeout exceeded", "Payment processing failed"]
        );

        let date_only = LogCriteria {
            timestamp_start: Some("2023-09-16".to_string()),
            ..Default::default()
        };
        assert_eq!(messages(&filter_logs(sample(), &date_only)), vec!["Payment processing failed"]);
    }

    #[test]
    fn test_unparseable_bound_is_ignored() {
        let criteria = LogCriteria {
            timestamp_start: Some("last tuesday".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_logs(sample(), &criteria).len(), 4);
    }

    #[test]
    fn test_parse_bound_formats() {
        let expected = Utc.with_ymd_and_hms(2023, 9, 15, 8, 0, 0).unwrap();
        assert_eq!(parse_bound("2023-09-15T08:00:00Z"), Some(expected));
        assert_eq!(parse_bound("2023-09-15T08:00:00.000Z"), Some(expected));
        assert_eq!(parse_bound("2023-09-15T08:00:00"), Some(expected));
        assert_eq!(parse_bound("2023-09-15T08:00"), Some(expected));
        assert_eq!(parse_bound(" 2023-09-15T08:00 "), Some(expected));
        assert_eq!(
            parse_bound("2023-09-15"),
            Some(Utc.with_ymd_and_hms(2023, 9, 15, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_bound("not a time"), None);
    }
}
