//! Application-wide error types.
//!
//! This module defines the main error type hierarchy for the
//! application, allowing for type-safe error handling throughout the
//! codebase.

pub use crate::api::ApiError;
pub use crate::config::ConfigError;
pub use crate::ordering::OrderingError;
pub use crate::state::StateError;

/// Main application error type.
///
/// This is the top-level error type that encompasses all error types
/// in the application. It uses `thiserror` for automatic error
/// derivation and conversion.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// DualTab API-related errors
    #[error("DualTab API error: {0}")]
    Api(#[from] ApiError),

    /// Reorder synchronization errors
    #[error("Reorder error: {0}")]
    Ordering(#[from] OrderingError),

    /// State management errors
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    #[allow(dead_code)]
    Terminal(String),

    /// Logger initialization errors
    #[error("Logger error: {0}")]
    Logger(String),

    /// Generic error with context
    #[error("{0}")]
    #[allow(dead_code)]
    Other(String),
}

/// Convenience type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_from_config_error() {
        let config_error = ConfigError::FilePathNotSet;
        let app_error: AppError = config_error.into();
        assert!(matches!(app_error, AppError::Config(_)));
        assert!(app_error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_app_error_from_api_error() {
        let api_error = ApiError::Other("Test error".to_string());
        let app_error: AppError = api_error.into();
        assert!(matches!(app_error, AppError::Api(_)));
        assert!(app_error.to_string().contains("DualTab API error"));
    }

    #[test]
    fn test_app_error_from_ordering_error() {
        let ordering_error = OrderingError::IndexOutOfBounds { index: 4, len: 2 };
        let app_error: AppError = ordering_error.into();
        assert!(matches!(app_error, AppError::Ordering(_)));
        assert!(app_error.to_string().contains("out of bounds"));
    }

    #[test]
    fn test_app_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_error: AppError = io_error.into();
        assert!(matches!(app_error, AppError::Io(_)));
        assert!(app_error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_app_error_other() {
        let error = AppError::Other("Generic error".to_string());
        assert_eq!(error.to_string(), "Generic error");
    }
}
