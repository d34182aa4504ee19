use thiserror::Error;
use std::fmt;
use reqwest::StatusCode;

mod utils;
pub use utils::*;

#[derive(Error, Debug)]
pub enum SwapError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {status} - {message}")]
    HttpError {
        status: StatusCode,
        message: String,
    },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Tokens unavailable: {0}")]
    TokensUnavailable(String),

    #[error("Token list already loaded for this session")]
    TokensAlreadyLoaded,

    #[error("Validation error: {field} - {message}")]
    Validation {
        field: ValidationField,
        message: String,
    },

    #[error("Invalid token selection: {0}")]
    InvalidSelection(String),

    #[error("A swap submission is already in progress")]
    SubmissionInProgress,

    #[error("Swap execution error: {kind} - {message}")]
    Execution {
        kind: ExecutionErrorKind,
        message: String,
    },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Form field a validation message is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationField {
    Amount,
    Tokens,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionErrorKind {
    Rejected,
    Unavailable,
}

impl fmt::Display for ValidationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amount => write!(f, "amount"),
            Self::Tokens => write!(f, "tokens"),
        }
    }
}

impl fmt::Display for ExecutionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected => write!(f, "Swap rejected"),
            Self::Unavailable => write!(f, "Swap service unavailable"),
        }
    }
}

pub type Result<T> = std::result::Result<T, SwapError>;

impl SwapError {
    pub fn validation(field: ValidationField, message: impl Into<String>) -> Self {
        SwapError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn execution(kind: ExecutionErrorKind, message: impl Into<String>) -> Self {
        SwapError::Execution {
            kind,
            message: message.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            SwapError::HttpError { status, .. } => status.is_server_error(),
            SwapError::NetworkError(_) => true,
            SwapError::Execution { kind, .. } => *kind == ExecutionErrorKind::Unavailable,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for SwapError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            SwapError::HttpError {
                status,
                message: err.to_string(),
            }
        } else {
            SwapError::NetworkError(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = SwapError::validation(ValidationField::Amount, "Please enter a valid amount");
        assert_eq!(err.to_string(), "Validation error: amount - Please enter a valid amount");
        assert!(matches!(err, SwapError::Validation { field: ValidationField::Amount, .. }));
    }

    #[test]
    fn test_retryable_errors() {
        let err = SwapError::HttpError {
            status: StatusCode::BAD_GATEWAY,
            message: "upstream".to_string(),
        };
        assert!(err.is_retryable());

        let err = SwapError::HttpError {
            status: StatusCode::NOT_FOUND,
            message: "missing".to_string(),
        };
        assert!(!err.is_retryable());

        assert!(SwapError::NetworkError("reset".to_string()).is_retryable());
        assert!(SwapError::execution(ExecutionErrorKind::Unavailable, "offline").is_retryable());
        assert!(!SwapError::execution(ExecutionErrorKind::Rejected, "no").is_retryable());
        assert!(!SwapError::SubmissionInProgress.is_retryable());
        assert!(!SwapError::TokensAlreadyLoaded.is_retryable());
    }

    #[test]
    fn test_config_error_conversion() {
        let err: SwapError = config::ConfigError::NotFound("price_source_url".to_string()).into();
        assert!(matches!(err, SwapError::Config(_)));
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
