//! Error types for campuscare-rs.

use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Authentication Errors ===
    #[error("Invalid admin credentials")]
    InvalidAdminCredentials,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid password")]
    PasswordMismatch,

    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    // === Repository Errors ===
    #[error("Complaint not found: {0}")]
    ComplaintNotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // === Server Errors ===
    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the error code for presentation layers.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAdminCredentials => "INVALID_ADMIN_CREDENTIALS",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::PasswordMismatch => "PASSWORD_MISMATCH",
            Self::UsernameTaken(_) => "USERNAME_TAKEN",
            Self::ComplaintNotFound(_) => "COMPLAINT_NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Store(_) => "STORE_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    ///
    /// Client-side failures (bad credentials, missing records, ownership
    /// violations) are expected during normal operation; store and
    /// serialization failures are not.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Store(_) | Self::Serialization(_) | Self::Config(_) | Self::Internal(_)
        )
    }

    /// Log this error at the appropriate level.
    pub fn log(&self) {
        let code = self.error_code();
        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }
    }
}

// === From implementations ===

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
