use thiserror::Error;

/// 日志条目校验失败的原因
///
/// Display 文本会原样返回给客户端，作为 400 响应体中的 `error` 字段
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid level. Must be one of: error, warn, info, debug")]
    InvalidLevel,

    #[error("Invalid timestamp format. Must be ISO 8601 format (e.g., 2023-09-15T08:00:00Z)")]
    InvalidTimestamp,

    #[error("Invalid data type for field: {0}")]
    InvalidType(&'static str),
}

impl ValidationError {
    /// 出错的字段名
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField(field) | ValidationError::InvalidType(field) => field,
            ValidationError::InvalidLevel => "level",
            ValidationError::InvalidTimestamp => "timestamp",
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Web server error: {0}")]
    WebServerError(String),
}

impl AppError {
    /// 获取错误类型的简洁摘要，写入日志字段便于检索
    pub fn get_error_type_summary(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "log_entry_rejected",
            AppError::IoError(_) => "log_file_operation_failed",
            AppError::JsonError(_) => "log_document_malformed",
            AppError::ConfigError(_) => "service_configuration_invalid",
            AppError::StoreError(_) => "log_store_operation_failed",
            AppError::WebServerError(_) => "log_api_server_failed",
        }
    }

    /// 是否属于客户端错误（映射为 HTTP 4xx），其余一律视为服务端错误
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_name_the_field() {
        assert_eq!(
            ValidationError::MissingField("spanId").to_string(),
            "Missing required field: spanId"
        );
        assert_eq!(
            ValidationError::InvalidType("metadata").to_string(),
            "Invalid data type for field: metadata"
        );
        assert_eq!(ValidationError::InvalidLevel.field(), "level");
        assert_eq!(ValidationError::InvalidTimestamp.field(), "timestamp");
    }

    #[test]
    fn test_client_error_classification() {
        let rejected: AppError = ValidationError::InvalidLevel.into();
        assert!(rejected.is_client_error());
        assert_eq!(rejected.get_error_type_summary(), "log_entry_rejected");

        let io: AppError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert!(!io.is_client_error());
        assert_eq!(io.get_error_type_summary(), "log_file_operation_failed");
    }
}
