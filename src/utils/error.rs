use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failure classes of the remote summarization service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceErrorKind {
    Unauthorized,
    RateLimited,
    Unavailable,
    Timeout,
}

impl ServiceErrorKind {
    /// Whether another attempt may succeed without operator action.
    pub fn is_transient(&self) -> bool {
        !matches!(self, ServiceErrorKind::Unauthorized)
    }
}

impl fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceErrorKind::Unauthorized => "unauthorized",
            ServiceErrorKind::RateLimited => "rate_limited",
            ServiceErrorKind::Unavailable => "unavailable",
            ServiceErrorKind::Timeout => "timeout",
        };
        f.pad(name)
    }
}

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Input error in {path}: {message}")]
    InputError { path: String, message: String },

    #[error("Malformed row {post_id}: {reason}")]
    MalformedRow { post_id: String, reason: String },

    #[error("External service error ({kind}): {message}")]
    ExternalServiceError {
        kind: ServiceErrorKind,
        message: String,
    },

    #[error("Failed to persist output to {path} and fallback {fallback}: {message}")]
    PersistenceError {
        path: String,
        fallback: String,
        message: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Row,
    ExternalService,
    Persistence,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn external(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        EtlError::ExternalServiceError {
            kind,
            message: message.into(),
        }
    }

    /// The service failure class, if this is an external service error.
    pub fn service_kind(&self) -> Option<ServiceErrorKind> {
        match self {
            EtlError::ExternalServiceError { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::InputError { .. } | EtlError::CsvError(_) => ErrorCategory::Input,
            EtlError::MalformedRow { .. } => ErrorCategory::Row,
            EtlError::ExternalServiceError { .. } | EtlError::HttpClientError(_) => {
                ErrorCategory::ExternalService
            }
            EtlError::PersistenceError { .. } => ErrorCategory::Persistence,
            EtlError::IoError(_) | EtlError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::MalformedRow { .. } => ErrorSeverity::Low,
            EtlError::ExternalServiceError { .. } => ErrorSeverity::Medium,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InputError { .. }
            | EtlError::CsvError(_)
            | EtlError::HttpClientError(_) => ErrorSeverity::High,
            EtlError::PersistenceError { .. }
            | EtlError::IoError(_)
            | EtlError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::InputError { path, .. } => {
                format!("Could not read the input file {}: {}", path, self)
            }
            EtlError::CsvError(_) => format!("The input is not valid CSV: {}", self),
            EtlError::PersistenceError { path, .. } => format!(
                "Transformed data could not be saved to {} or its fallback location",
                path
            ),
            EtlError::ExternalServiceError { kind, .. } => {
                format!("The summarization service failed ({})", kind)
            }
            EtlError::MalformedRow { post_id, .. } => {
                format!("Row {} could not be parsed and was emitted with defaults", post_id)
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => format!("Invalid configuration: {}", self),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::InputError { .. } | EtlError::CsvError(_) => {
                "Check that the input file exists and has post_id, timestamp and text columns"
            }
            EtlError::PersistenceError { .. } => {
                "Check write permissions and free disk space in the output directory"
            }
            EtlError::ExternalServiceError {
                kind: ServiceErrorKind::Unauthorized,
                ..
            } => "Set a valid API key in the configured environment variable",
            EtlError::ExternalServiceError {
                kind: ServiceErrorKind::RateLimited,
                ..
            } => "Wait and retry, or increase summarizer.remote.retry_delay_ms",
            EtlError::ExternalServiceError { .. } | EtlError::HttpClientError(_) => {
                "Check network connectivity or switch to the rule-based summarizer"
            }
            EtlError::MalformedRow { .. } => "Re-export the source data with UTF-8 encoding",
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Review the command line flags and the TOML configuration file"
            }
            EtlError::IoError(_) | EtlError::SerializationError(_) => {
                "Retry the run; if it persists, check the file system"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_kind_transience() {
        assert!(!ServiceErrorKind::Unauthorized.is_transient());
        assert!(ServiceErrorKind::RateLimited.is_transient());
        assert!(ServiceErrorKind::Unavailable.is_transient());
        assert!(ServiceErrorKind::Timeout.is_transient());
    }

    #[test]
    fn test_severity_and_category() {
        let err = EtlError::external(ServiceErrorKind::Timeout, "slow");
        assert_eq!(err.category(), ErrorCategory::ExternalService);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.service_kind(), Some(ServiceErrorKind::Timeout));

        let err = EtlError::PersistenceError {
            path: "out.csv".to_string(),
            fallback: "out_fallback.csv".to_string(),
            message: "denied".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Persistence);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("out.csv"));
    }

    #[test]
    fn test_display_includes_kind() {
        let err = EtlError::external(ServiceErrorKind::RateLimited, "429 Too Many Requests");
        assert_eq!(
            err.to_string(),
            "External service error (rate_limited): 429 Too Many Requests"
        );
    }
}
