//! State management-specific error types.

/// Errors that can occur during state operations.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Session not established
    #[error("Session not established")]
    #[allow(dead_code)]
    SessionNotSet,

    /// Record not found in state
    #[error("Record not found: {id}")]
    #[allow(dead_code)]
    RecordNotFound { id: u64 },

    /// No form is open
    #[error("No form is open")]
    #[allow(dead_code)]
    FormNotOpen,

    /// Generic state error
    #[error("State error: {0}")]
    #[allow(dead_code)]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_error_display() {
        let error = StateError::SessionNotSet;
        assert!(error.to_string().contains("Session not established"));

        let error = StateError::RecordNotFound { id: 42 };
        assert!(error.to_string().contains("42"));

        let error = StateError::Other("Generic error".to_string());
        assert!(error.to_string().contains("Generic error"));
    }
}
