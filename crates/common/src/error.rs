//! Error types for terrace.

use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Caller Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Post not found: {0}")]
    PostNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // === Collaborator Errors ===
    #[error("Store error: {0}")]
    Store(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns a stable code identifying the error kind.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::EventNotFound(_) => "EVENT_NOT_FOUND",
            Self::PostNotFound(_) => "POST_NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Store(_) => "STORE_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error originated in a collaborator rather than
    /// the caller's input.
    #[must_use]
    pub const fn is_collaborator_error(&self) -> bool {
        matches!(
            self,
            Self::Store(_) | Self::ExternalService(_) | Self::Config(_) | Self::Internal(_)
        )
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Store(format!("Document encoding failed: {err}"))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_stability() {
        assert_eq!(
            AppError::EventNotFound("e1".to_string()).error_code(),
            "EVENT_NOT_FOUND"
        );
        assert_eq!(
            AppError::Forbidden("nope".to_string()).error_code(),
            "FORBIDDEN"
        );
        assert_eq!(
            AppError::ExternalService("timeout".to_string()).error_code(),
            "EXTERNAL_SERVICE_ERROR"
        );
    }

    #[test]
    fn test_collaborator_error_classification() {
        assert!(AppError::Store("down".to_string()).is_collaborator_error());
        assert!(!AppError::Validation("bad title".to_string()).is_collaborator_error());
    }
}
