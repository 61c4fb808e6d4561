//! SDK error types.
//!
//! Everything the transport or the API can fail with is collapsed into
//! [`SdkError`]. The paginated fetch layer never lets these escape its
//! public surface; see [`crate::paginate`].

use thiserror::Error;

/// The main error type for the SDK
#[derive(Error, Debug)]
pub enum SdkError {
    /// API returned an error response
    #[error("API error: {status} - {message}")]
    ApiError {
        status: u16,
        message: String,
        error_code: Option<String>,
    },

    /// Network or connection error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Rate limit exceeded
    #[error("Rate limit exceeded. Retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Authorization failed
    #[error("Access denied: {0}")]
    AuthorizationError(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Server error
    #[error("Server error: {0}")]
    ServerError(String),

    /// Unknown error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;

/// API error response structure
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
    pub message: String,
}

impl SdkError {
    /// Map an HTTP error response to the matching error variant.
    ///
    /// The body is parsed as the API's JSON error envelope when possible;
    /// otherwise it is carried verbatim.
    pub fn from_response(status: u16, body: &str) -> Self {
        if let Ok(response) = serde_json::from_str::<ApiErrorResponse>(body) {
            return match status {
                401 => SdkError::AuthenticationError(response.message),
                403 => SdkError::AuthorizationError(response.message),
                404 => SdkError::NotFound(response.message),
                422 => SdkError::ValidationError(response.message),
                429 => SdkError::RateLimited { retry_after: 60 },
                500..=599 => SdkError::ServerError(response.message),
                _ => SdkError::ApiError {
                    status,
                    message: response.message,
                    error_code: Some(response.error),
                },
            };
        }

        SdkError::ApiError {
            status,
            message: body.to_string(),
            error_code: None,
        }
    }

    /// Whether retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SdkError::NetworkError(_) | SdkError::RateLimited { .. } | SdkError::ServerError(_)
        )
    }

    /// Get the HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SdkError::ApiError { status, .. } => Some(*status),
            SdkError::RateLimited { .. } => Some(429),
            SdkError::AuthenticationError(_) => Some(401),
            SdkError::AuthorizationError(_) => Some(403),
            SdkError::NotFound(_) => Some(404),
            SdkError::ValidationError(_) => Some(422),
            SdkError::ServerError(_) => Some(500),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_json_response() {
        let body = r#"{"error": "not_found", "message": "Trip not found"}"#;
        let error = SdkError::from_response(404, body);

        assert!(matches!(error, SdkError::NotFound(_)));
        assert_eq!(error.status_code(), Some(404));
    }

    #[test]
    fn test_error_from_opaque_body() {
        let error = SdkError::from_response(418, "tea time");

        match error {
            SdkError::ApiError {
                status,
                message,
                error_code,
            } => {
                assert_eq!(status, 418);
                assert_eq!(message, "tea time");
                assert!(error_code.is_none());
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_error_is_retryable() {
        assert!(SdkError::RateLimited { retry_after: 60 }.is_retryable());
        assert!(SdkError::ServerError("boom".to_string()).is_retryable());
        assert!(!SdkError::NotFound("trip".to_string()).is_retryable());
        assert!(!SdkError::ValidationError("bad filter".to_string()).is_retryable());
    }
}
