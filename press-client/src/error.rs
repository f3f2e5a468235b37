//! Store error types

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Remote store error
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Store rejected the credentials
    #[error("Authentication required")]
    Unauthorized,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Store reachable but not serving
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success response
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Document could not be decoded into its entity type
    #[error("Malformed document in {collection}: {reason}")]
    MalformedDocument { collection: String, reason: String },

    /// Live channel ended
    #[error("Stream closed: {0}")]
    StreamClosed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn malformed(collection: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedDocument {
            collection: collection.into(),
            reason: reason.to_string(),
        }
    }

    /// Remote error code in `area/reason` form (e.g. `store/unavailable`)
    pub fn remote_code(&self) -> &'static str {
        match self {
            StoreError::Http(e) if e.is_timeout() => "store/deadline-exceeded",
            StoreError::Http(_) => "store/network-request-failed",
            StoreError::Unauthorized => "store/unauthenticated",
            StoreError::PermissionDenied(_) => "store/permission-denied",
            StoreError::Unavailable(_) => "store/unavailable",
            StoreError::NotFound(_) => "store/not-found",
            StoreError::Rejected { .. } => "store/invalid-argument",
            StoreError::MalformedDocument { .. } | StoreError::Serialization(_) => {
                "store/data-loss"
            }
            StoreError::StreamClosed(_) => "store/cancelled",
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::Http(e) if e.is_timeout() => ErrorCode::TimeoutError,
            StoreError::Http(_) => ErrorCode::NetworkError,
            StoreError::Unauthorized => ErrorCode::NotAuthenticated,
            StoreError::PermissionDenied(_) => ErrorCode::PermissionDenied,
            StoreError::Unavailable(_) => ErrorCode::StoreUnavailable,
            StoreError::NotFound(_) => ErrorCode::NotFound,
            StoreError::Rejected { .. } => ErrorCode::InvalidRequest,
            StoreError::MalformedDocument { .. } | StoreError::Serialization(_) => {
                ErrorCode::MalformedDocument
            }
            StoreError::StreamClosed(_) => ErrorCode::StreamFailed,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::with_message(err.code(), describe_remote_error(err.remote_code()))
            .with_detail("remote_code", err.remote_code())
            .with_detail("reason", err.to_string())
    }
}

/// Human-readable message for a remote error code
///
/// Unknown codes are echoed back as `Error: <code>`.
pub fn describe_remote_error(code: &str) -> String {
    let message = match code {
        "auth/user-not-found" => "No account found with this email address.",
        "auth/wrong-password" => "Invalid password. Please try again.",
        "auth/invalid-credential" => "Invalid email or password.",
        "auth/too-many-requests" => "Too many failed attempts. Please try again later.",
        "auth/network-request-failed" | "store/network-request-failed" => {
            "Network error. Check your connection and try again."
        }
        "store/permission-denied" => "You do not have permission to perform this action.",
        "store/unavailable" => "Service temporarily unavailable. Please try again.",
        "store/unauthenticated" => "Authentication required. Please log in and try again.",
        "store/not-found" => "The requested resource was not found.",
        "store/invalid-argument" => "Invalid request. Please check your input and try again.",
        "store/deadline-exceeded" => "The request timed out. Please try again.",
        "store/data-loss" => "The server returned data that could not be read.",
        "store/cancelled" => "The live connection was closed.",
        _ => return format!("Error: {}", code),
    };
    message.to_string()
}

/// Human-readable message for an HTTP status code
pub fn describe_http_status(status: u16) -> String {
    match status {
        400 => "Invalid request. Please check your input and try again.".to_string(),
        401 => "Authentication required. Please log in and try again.".to_string(),
        403 => "You do not have permission to perform this action.".to_string(),
        404 => "The requested resource was not found.".to_string(),
        500 => "Server error. Please try again later.".to_string(),
        other => format!("Request failed with status {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_have_messages() {
        assert_eq!(
            describe_remote_error("store/permission-denied"),
            "You do not have permission to perform this action."
        );
        assert_eq!(
            describe_remote_error("auth/invalid-credential"),
            "Invalid email or password."
        );
    }

    #[test]
    fn test_unknown_code_is_echoed() {
        assert_eq!(describe_remote_error("store/weird"), "Error: store/weird");
    }

    #[test]
    fn test_http_status_messages() {
        assert_eq!(describe_http_status(404), "The requested resource was not found.");
        assert_eq!(describe_http_status(418), "Request failed with status 418");
    }

    #[test]
    fn test_into_app_error_keeps_code() {
        let err: AppError = StoreError::Unavailable("maintenance".into()).into();
        assert_eq!(err.code, ErrorCode::StoreUnavailable);
        assert_eq!(err.message, "Service temporarily unavailable. Please try again.");
        assert!(err.details.is_some());
    }

    #[test]
    fn test_every_store_error_has_a_message() {
        let errors = [
            StoreError::Unauthorized,
            StoreError::PermissionDenied("rules".into()),
            StoreError::Unavailable("maintenance".into()),
            StoreError::NotFound("clients/c9".into()),
            StoreError::Rejected {
                status: 422,
                message: "bad field".into(),
            },
            StoreError::malformed("jobs", "stage"),
            StoreError::StreamClosed("feed".into()),
        ];
        for err in errors {
            let message = describe_remote_error(err.remote_code());
            assert!(!message.starts_with("Error:"), "{} has no message", err.remote_code());
        }
    }
}
