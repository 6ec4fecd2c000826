//! Error types for uplift operations.
//!
//! Every fallible operation in the core returns [`UpliftResult`]. Errors carry
//! a structured [`ErrorCode`] so callers can branch without matching on text.

use thiserror::Error;

/// Result type alias for uplift operations.
pub type UpliftResult<T> = Result<T, UpliftError>;

/// Main error type for all uplift operations.
#[derive(Error, Debug)]
pub enum UpliftError {
    /// A quality requirement specification could not be parsed.
    #[error("Invalid quality requirement '{spec}': {message}")]
    InvalidSpec {
        spec: String,
        message: String,
        code: ErrorCode,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        code: ErrorCode,
        suggestion: Option<String>,
    },

    /// Database operation failed.
    #[error("Database error: {message}")]
    Database {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Stored data could not be decoded.
    #[error("Parse error: {message}")]
    Parse { message: String, code: ErrorCode },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Quality requirement specs (SPEC_xxx)
    SpecEmpty,
    SpecUnknownToken,
    SpecMixedComponents,
    SpecReversedRange,

    // Configuration (CFG_xxx)
    CfgInvalidValue,
    CfgUnsupportedFormat,

    // Database (DB_xxx)
    DbConnectionFailed,
    DbOperationFailed,

    // Parse (PARSE_xxx)
    ParseInvalidTimestamp,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::SpecEmpty => "SPEC_001",
            ErrorCode::SpecUnknownToken => "SPEC_002",
            ErrorCode::SpecMixedComponents => "SPEC_003",
            ErrorCode::SpecReversedRange => "SPEC_004",
            ErrorCode::CfgInvalidValue => "CFG_001",
            ErrorCode::CfgUnsupportedFormat => "CFG_002",
            ErrorCode::DbConnectionFailed => "DB_001",
            ErrorCode::DbOperationFailed => "DB_002",
            ErrorCode::ParseInvalidTimestamp => "PARSE_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl UpliftError {
    /// Create an invalid requirement error.
    pub fn invalid_spec(spec: impl Into<String>, message: impl Into<String>, code: ErrorCode) -> Self {
        Self::InvalidSpec {
            spec: spec.into(),
            message: message.into(),
            code,
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            code: ErrorCode::CfgInvalidValue,
            suggestion: None,
        }
    }

    /// Create a configuration error with suggestion.
    pub fn configuration_with_suggestion(
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            code: ErrorCode::CfgInvalidValue,
            suggestion: Some(suggestion.into()),
        }
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            code: ErrorCode::DbOperationFailed,
            source: None,
        }
    }

    /// Create a parse error for a malformed stored timestamp.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseInvalidTimestamp,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidSpec { code, .. } => *code,
            Self::Configuration { code, .. } => *code,
            Self::Database { code, .. } => *code,
            Self::Parse { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::InvalidSpec { .. } => {
                Some("Use clauses like `720p+`, `>=1080p`, `hdtv-bluray`, `h264|h265` or `!cam`")
            }
            Self::Configuration { suggestion, .. } => suggestion.as_deref(),
            Self::Database { .. } => Some("Please check the upgrade database path and permissions"),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for UpliftError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            code: ErrorCode::DbOperationFailed,
            source: Some(Box::new(err)),
        }
    }
}
