//! Unified error codes for the print-shop workspace
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Remote store errors
//! - 4xxx: Workflow errors (clients, quotes, jobs)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they serialize compactly
/// and can be shown to operators as stable numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 3xxx: Remote store ====================
    /// Remote store temporarily unavailable
    StoreUnavailable = 3001,
    /// Remote write rejected or failed
    WriteFailed = 3003,
    /// Live change stream failed
    StreamFailed = 3004,
    /// Remote document could not be decoded
    MalformedDocument = 3005,

    // ==================== 4xxx: Workflow ====================
    /// Client not found
    ClientNotFound = 4001,
    /// Quote not found
    QuoteNotFound = 4002,
    /// Quote already converted into a job
    QuoteAlreadyExported = 4003,
    /// Job not found
    JobNotFound = 4101,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",

            // Permission
            ErrorCode::PermissionDenied => "You do not have permission to perform this action",

            // Remote store
            ErrorCode::StoreUnavailable => "Service temporarily unavailable. Please try again",
            ErrorCode::WriteFailed => "Remote write failed",
            ErrorCode::StreamFailed => "Live updates stopped",
            ErrorCode::MalformedDocument => "Remote document is malformed",

            // Workflow
            ErrorCode::ClientNotFound => "Client not found",
            ErrorCode::QuoteNotFound => "Quote not found",
            ErrorCode::QuoteAlreadyExported => "Quote has already been converted",
            ErrorCode::JobNotFound => "Job not found",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::NetworkError => "Network error. Check your connection and try again",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),

            // Remote store
            3001 => Ok(ErrorCode::StoreUnavailable),
            3003 => Ok(ErrorCode::WriteFailed),
            3004 => Ok(ErrorCode::StreamFailed),
            3005 => Ok(ErrorCode::MalformedDocument),

            // Workflow
            4001 => Ok(ErrorCode::ClientNotFound),
            4002 => Ok(ErrorCode::QuoteNotFound),
            4003 => Ok(ErrorCode::QuoteAlreadyExported),
            4101 => Ok(ErrorCode::JobNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
