//! Error types for verso operations.
//!
//! Every failure carries a structured error code and, where one exists, a
//! suggestion for resolving it.

use thiserror::Error;

/// Result type alias for verso operations.
pub type VersoResult<T> = Result<T, VersoError>;

/// Main error type for all verso operations.
#[derive(Error, Debug)]
pub enum VersoError {
    /// The requested file history or version does not exist.
    #[error("Not found: {message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        file_id: String,
        version_id: Option<u32>,
    },

    /// The store could not complete the operation.
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Input was rejected before touching the store.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        suggestion: Option<String>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Lookup (VER_xxx)
    FileNotFound,
    VersionNotFound,

    // Storage (STO_xxx)
    StoLockPoisoned,
    StoIdExhausted,

    // Validation (VAL_xxx)
    ValEmptyFileId,
    ValFileIdTooLong,
    ValPayloadTooLarge,

    // Configuration and IO
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::FileNotFound => "VER_001",
            ErrorCode::VersionNotFound => "VER_002",
            ErrorCode::StoLockPoisoned => "STO_001",
            ErrorCode::StoIdExhausted => "STO_002",
            ErrorCode::ValEmptyFileId => "VAL_001",
            ErrorCode::ValFileIdTooLong => "VAL_002",
            ErrorCode::ValPayloadTooLarge => "VAL_003",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl VersoError {
    /// Create a not found error for a file with no history.
    pub fn file_not_found(file_id: impl Into<String>) -> Self {
        let id = file_id.into();
        Self::NotFound {
            message: format!("no versions found for file '{}'", id),
            code: ErrorCode::FileNotFound,
            file_id: id,
            version_id: None,
        }
    }

    /// Create a not found error for a missing version of a known file.
    pub fn version_not_found(file_id: impl Into<String>, version_id: u32) -> Self {
        let id = file_id.into();
        Self::NotFound {
            message: format!("version {} not found for file '{}'", version_id, id),
            code: ErrorCode::VersionNotFound,
            file_id: id,
            version_id: Some(version_id),
        }
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>, code: ErrorCode) -> Self {
        Self::Storage {
            message: message.into(),
            code,
            source: None,
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>, code: ErrorCode) -> Self {
        Self::Validation {
            message: message.into(),
            code,
            suggestion: None,
        }
    }

    /// Create a validation error with suggestion.
    pub fn validation_with_suggestion(
        message: impl Into<String>,
        code: ErrorCode,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            code,
            suggestion: Some(suggestion.into()),
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { code, .. } => *code,
            Self::Storage { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// Whether this is a not found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this is a storage error.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::NotFound {
                code: ErrorCode::FileNotFound,
                ..
            } => Some("Please check the file identifier and ensure a version was added"),
            Self::NotFound { .. } => Some("Use list_versions to see the available version ids"),
            Self::Storage {
                code: ErrorCode::StoLockPoisoned,
                ..
            } => Some("A writer panicked while holding the store lock; rebuild the store"),
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            _ => None,
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for VersoError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::storage(
            format!("Failed to acquire lock: {}", err),
            ErrorCode::StoLockPoisoned,
        )
    }
}
