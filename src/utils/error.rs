use thiserror::Error;

#[derive(Error, Debug)]
pub enum HouseFinderError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Result cache failure: {message}")]
    CacheError { message: String },

    #[error("External service '{service}' failed: {message}")]
    ExternalServiceError { service: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

pub type Result<T> = std::result::Result<T, HouseFinderError>;

/// 錯誤分類，用於日誌與 CLI 輸出
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Cache,
    ExternalService,
    Io,
    Processing,
}

/// 錯誤嚴重程度，決定 CLI 的退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HouseFinderError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::CacheError { .. } => ErrorCategory::Cache,
            Self::ApiError(_) | Self::ExternalServiceError { .. } => ErrorCategory::ExternalService,
            Self::IoError(_) => ErrorCategory::Io,
            Self::CsvError(_) | Self::SerializationError(_) | Self::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::ExternalService => ErrorSeverity::Medium,
            ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Cache | ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the objective definitions and thresholds in the configuration file"
            }
            ErrorCategory::Cache => {
                "Make sure the cache directory is writable; remove results.jsonl if it is corrupt"
            }
            ErrorCategory::ExternalService => {
                "Verify the API keys and quota of the maps service, then retry"
            }
            ErrorCategory::Io => "Check file paths and permissions",
            ErrorCategory::Processing => "Inspect the listing data for malformed entries",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ConfigValidationError { field, message } => {
                format!("設定錯誤 ({}): {}", field, message)
            }
            Self::InvalidConfigValueError { field, value, reason } => {
                format!("設定值無效 {} = '{}': {}", field, value, reason)
            }
            Self::MissingConfigError { field } => format!("缺少必要設定: {}", field),
            Self::CacheError { message } => format!("快取無法使用: {}", message),
            Self::ExternalServiceError { service, message } => {
                format!("外部服務 {} 失敗，批次已中止: {}", service, message)
            }
            other => other.to_string(),
        }
    }

    /// 建立快取錯誤
    pub fn cache(message: impl Into<String>) -> Self {
        Self::CacheError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_high_severity() {
        let err = HouseFinderError::MissingConfigError {
            field: "objectives".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_cache_errors_are_critical() {
        let err = HouseFinderError::cache("corrupt line 3");
        assert_eq!(err.category(), ErrorCategory::Cache);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("corrupt line 3"));
    }

    #[test]
    fn test_external_service_message_mentions_service() {
        let err = HouseFinderError::ExternalServiceError {
            service: "google_maps".to_string(),
            message: "REQUEST_DENIED".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::ExternalService);
        assert!(err.to_string().contains("google_maps"));
    }
}
