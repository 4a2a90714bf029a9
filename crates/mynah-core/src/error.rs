//! Error types for mynah operations.
//!
//! Errors carry a stable [`ErrorCode`] so transports can branch on them without
//! matching message text. Only configuration problems are meant to be fatal; every
//! runtime failure inside a chat turn is turned into a textual reply by the
//! orchestrator.

use thiserror::Error;

/// Result type alias for mynah operations.
pub type MynahResult<T> = Result<T, MynahError>;

/// Main error type for all mynah operations.
#[derive(Error, Debug)]
pub enum MynahError {
    /// A required setting (usually a backend credential) is absent.
    #[error("Missing configuration: {setting}")]
    ConfigurationMissing { setting: String },

    /// A setting is present but unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Authentication against the completion backend failed.
    #[error("Authentication error: {message}")]
    Authentication { message: String, code: ErrorCode },

    /// The completion backend rejected the request due to rate limiting.
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        message: String,
        code: ErrorCode,
        retry_after: Option<u64>,
    },

    /// The completion call failed or returned an unusable response.
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The completion call did not finish before the deadline.
    #[error("Completion timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// A state store operation failed.
    #[error("Store error: {message}")]
    Store { message: String, code: ErrorCode },

    /// Provider not supported.
    #[error("Provider not supported: {provider}")]
    UnsupportedProvider { provider: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Configuration (CFG_xxx)
    CfgMissing,
    CfgInvalid,

    // Authentication (AUTH_xxx)
    AuthInvalidKey,

    // Rate Limit (RATE_xxx)
    RateLimitExceeded,

    // LLM (LLM_xxx)
    LlmConnectionFailed,
    LlmGenerationFailed,
    LlmInvalidResponse,

    // Network (NET_xxx)
    NetTimeout,

    // Store (STO_xxx)
    StoreOperationFailed,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::CfgMissing => "CFG_001",
            ErrorCode::CfgInvalid => "CFG_002",
            ErrorCode::AuthInvalidKey => "AUTH_001",
            ErrorCode::RateLimitExceeded => "RATE_001",
            ErrorCode::LlmConnectionFailed => "LLM_001",
            ErrorCode::LlmGenerationFailed => "LLM_002",
            ErrorCode::LlmInvalidResponse => "LLM_003",
            ErrorCode::NetTimeout => "NET_001",
            ErrorCode::StoreOperationFailed => "STO_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl MynahError {
    /// Create a missing-configuration error.
    pub fn missing(setting: impl Into<String>) -> Self {
        Self::ConfigurationMissing {
            setting: setting.into(),
        }
    }

    /// Create an LLM error.
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
            code: ErrorCode::LlmGenerationFailed,
            source: None,
        }
    }

    /// Create an LLM connection error, keeping the underlying cause.
    pub fn llm_connection(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Llm {
            message: message.into(),
            code: ErrorCode::LlmConnectionFailed,
            source: Some(Box::new(source)),
        }
    }

    /// Create an error for a response that could not be interpreted.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
            code: ErrorCode::LlmInvalidResponse,
            source: None,
        }
    }

    /// Create a store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            code: ErrorCode::StoreOperationFailed,
        }
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            code: ErrorCode::AuthInvalidKey,
        }
    }

    /// Create a rate limit error.
    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::RateLimit {
            message: message.into(),
            code: ErrorCode::RateLimitExceeded,
            retry_after: None,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ConfigurationMissing { .. } => ErrorCode::CfgMissing,
            Self::Configuration(_) | Self::UnsupportedProvider { .. } => ErrorCode::CfgInvalid,
            Self::Authentication { code, .. } => *code,
            Self::RateLimit { code, .. } => *code,
            Self::Llm { code, .. } => *code,
            Self::Timeout { .. } => ErrorCode::NetTimeout,
            Self::Store { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// Whether this error came from the completion backend rather than local state.
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            Self::Llm { .. } | Self::Timeout { .. } | Self::Authentication { .. } | Self::RateLimit { .. }
        )
    }

    /// Convert from HTTP status code (for completion clients).
    pub fn from_http_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => Self::Authentication {
                message: body.to_string(),
                code: ErrorCode::AuthInvalidKey,
            },
            429 => Self::RateLimit {
                message: body.to_string(),
                code: ErrorCode::RateLimitExceeded,
                retry_after: None,
            },
            408 | 504 => Self::Llm {
                message: format!("HTTP {}: {}", status, body),
                code: ErrorCode::NetTimeout,
                source: None,
            },
            500..=599 => Self::Llm {
                message: format!("HTTP {}: {}", status, body),
                code: ErrorCode::LlmConnectionFailed,
                source: None,
            },
            _ => Self::Llm {
                message: format!("HTTP {}: {}", status, body),
                code: ErrorCode::LlmGenerationFailed,
                source: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_configuration() {
        let err = MynahError::missing("OPENROUTER_API_KEY");
        assert_eq!(err.code(), ErrorCode::CfgMissing);
        assert!(err.to_string().contains("OPENROUTER_API_KEY"));
        assert!(!err.is_backend_failure());
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            MynahError::from_http_status(401, "bad key").code(),
            ErrorCode::AuthInvalidKey
        );
        assert_eq!(
            MynahError::from_http_status(429, "slow down").code(),
            ErrorCode::RateLimitExceeded
        );
        assert_eq!(
            MynahError::from_http_status(503, "down").code(),
            ErrorCode::LlmConnectionFailed
        );
        assert!(MynahError::from_http_status(400, "nope").is_backend_failure());
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::CfgMissing.as_str(), "CFG_001");
        assert_eq!(MynahError::Timeout { seconds: 30 }.code().as_str(), "NET_001");
        assert_eq!(MynahError::store("boom").code().as_str(), "STO_001");
    }
}
