//! 查询逻辑：入库校验、条件过滤、倒序排序
//!
//! 全部是纯函数，不依赖存储实现

pub mod validator;
pub mod filter;

pub use validator::{validate_log_entry, is_valid_timestamp, REQUIRED_FIELDS};
pub use filter::{filter_logs, parse_bound};

use crate::logcommon::{LogCriteria, LogRecord};

/// 按时间倒序排列（最新在前），时间相同时保持原顺序
pub fn sort_newest_first(records: &mut [LogRecord]) {
    records.sort_by(|a, b| b.instant().cmp(&a.instant()));
}

/// 完整查询流程：有条件时过滤，然后倒序排序
pub fn run_query(records: Vec<LogRecord>, criteria: &LogCriteria) -> Vec<LogRecord> {
    let mut result = if criteria.is_empty() {
        records
    } else {
        filter_logs(records, criteria)
    };
    sort_newest_first(&mut result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logcommon::Level;
    use serde_json::Map;

    fn at(timestamp: &str, trace_id: &str) -> LogRecord {
        LogRecord {
            level: Level::Info,
            message: "Backup job started".to_string(),
            resource_id: "cache-server-01".to_string(),
            timestamp: timestamp.to_string(),
            trace_id: trace_id.to_string(),
            span_id: "span-1".to_string(),
            commit: "abc1234".to_string(),
            metadata: Map::new(),
        }
    }

    fn traces(records: &[LogRecord]) -> Vec<&str> {
        records.iter().map(|r| r.trace_id.as_str()).collect()
    }

    #[test]
    fn test_sort_is_strictly_descending() {
        let mut records = vec![
            at("2023-09-15T08:00:00Z", "a"),
            at("2023-09-17T08:00:00Z", "b"),
            at("2023-09-15T08:00:00.001Z", "c"),
            at("2023-09-16T00:00:00Z", "d"),
        ];
        sort_newest_first(&mut records);
        assert_eq!(traces(&records), vec!["b", "d", "c", "a"]);

        let instants: Vec<_> = records.iter().map(|r| r.instant().unwrap()).collect();
        assert!(instants.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_sort_keeps_ties_in_insertion_order() {
        let mut records = vec![
            at("2023-09-15T08:00:00Z", "first"),
            at("2023-09-15T08:00:00.000Z", "second"),
            at("2023-09-14T08:00:00Z", "older"),
        ];
        sort_newest_first(&mut records);
        assert_eq!(traces(&records), vec!["first", "second", "older"]);
    }

    #[test]
    fn test_run_query_filters_then_sorts() {
        let records = vec![
            at("2023-09-15T08:00:00Z", "a"),
            at("2023-09-16T08:00:00Z", "b"),
            at("2023-09-17T08:00:00Z", "c"),
        ];

        let all = run_query(records.clone(), &LogCriteria::default());
        assert_eq!(traces(&all), vec!["c", "b", "a"]);

        let criteria = LogCriteria {
            timestamp_end: Some("2023-09-16T08:00:00Z".to_string()),
            ..Default::default()
        };
        let bounded = run_query(records, &criteria);
        assert_eq!(traces(&bounded), vec!["b", "a"]);
    }
}
