//! Errors returned by the Access API client.

use thiserror::Error;

/// Access API client errors.
#[derive(Debug, Error)]
pub enum AccessClientError {
    /// The API rejected the call. `status` is the HTTP status of the response.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The requested resource does not exist (HTTP 404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Transport failure (connection refused, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be decoded.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The client could not be built from the given settings.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AccessClientError {
    /// HTTP status carried by the error, if the server produced one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::ParseError(_) | Self::InvalidConfig(_) => None,
        }
    }
}

impl From<serde_json::Error> for AccessClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::ParseError(e.to_string())
    }
}

/// Result type alias for Access API calls.
pub type AccessClientResult<T> = Result<T, AccessClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_of_api_error() {
        let err = AccessClientError::Api {
            status: 403,
            message: "10000: Authentication error".to_string(),
        };
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.to_string(), "10000: Authentication error");
    }

    #[test]
    fn test_status_of_not_found() {
        assert_eq!(AccessClientError::NotFound("g1".into()).status(), Some(404));
        assert_eq!(AccessClientError::ParseError("x".into()).status(), None);
    }

    #[test]
    fn test_from_serde_error() {
        let e = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: AccessClientError = e.into();
        assert!(matches!(err, AccessClientError::ParseError(_)));
    }
}
