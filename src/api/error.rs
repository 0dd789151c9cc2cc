//! DualTab API-specific error types.

/// Errors that can occur during DualTab API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP transport failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend returned an error response; the message is the `msg`
    /// field of the response envelope when one could be extracted
    #[error("API error (status {status}): {message}")]
    Server { status: u16, message: String },

    /// Failed to deserialize API response
    #[error("Failed to deserialize API response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// Response envelope carried no data payload
    #[error("API response missing data payload")]
    MissingData,

    /// Generic API error
    #[error("DualTab API error: {0}")]
    #[allow(dead_code)]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let error = ApiError::Other("Test error".to_string());
        assert!(error.to_string().contains("DualTab API error"));
        assert!(error.to_string().contains("Test error"));

        let error = ApiError::MissingData;
        assert!(error.to_string().contains("missing data"));
    }

    #[test]
    fn test_api_error_server() {
        let error = ApiError::Server {
            status: 401,
            message: "invalid username or password".to_string(),
        };
        let error_str = error.to_string();
        assert!(error_str.contains("401"));
        assert!(error_str.contains("invalid username or password"));
    }
}
