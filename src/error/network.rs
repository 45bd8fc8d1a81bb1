//! Network-related error types.
//!
//! Errors from the plain request/response calls (conversations, usage,
//! login). Streaming chat has its own [`StreamError`](super::StreamError).

use std::fmt;

use crate::traits::HttpError;

/// Network-specific error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// Connection to the server failed.
    ConnectionFailed { url: String, message: String },

    /// Request timed out.
    Timeout { operation: String },

    /// HTTP status error (non-2xx response).
    HttpStatus { status: u16, message: String },

    /// Body could not be decoded into the expected shape.
    InvalidResponse { message: String },

    /// Request was cancelled.
    Cancelled,

    /// Generic network error.
    Other { message: String },
}

impl NetworkError {
    /// Map a transport error for a request sent to `url`.
    pub fn from_http(err: HttpError, url: &str) -> Self {
        match err {
            HttpError::ConnectionFailed(message) => NetworkError::ConnectionFailed {
                url: url.to_string(),
                message,
            },
            HttpError::Timeout(_) => NetworkError::Timeout {
                operation: url.to_string(),
            },
            HttpError::ServerError { status, message } => {
                NetworkError::HttpStatus { status, message }
            }
            HttpError::Cancelled => NetworkError::Cancelled,
            HttpError::InvalidUrl(message) => NetworkError::Other {
                message: format!("invalid URL '{}': {}", url, message),
            },
            HttpError::Io(message) | HttpError::Other(message) => NetworkError::Other { message },
        }
    }

    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::ConnectionFailed { .. } => true,
            NetworkError::Timeout { .. } => true,
            NetworkError::HttpStatus { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            NetworkError::InvalidResponse { .. } => false,
            NetworkError::Cancelled => false,
            NetworkError::Other { .. } => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionFailed { .. } => {
                "Unable to connect to the server. Please check your internet connection."
                    .to_string()
            }
            NetworkError::Timeout { .. } => {
                "The server took too long to respond. Please try again.".to_string()
            }
            NetworkError::HttpStatus { status, .. } => match *status {
                400 => "The request was invalid. Please try again.".to_string(),
                401 => "Authentication required. Please log in again.".to_string(),
                403 => "Access denied. You don't have permission for this action.".to_string(),
                404 => "The requested conversation was not found.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 => {
                    "The server is experiencing issues. Please try again later.".to_string()
                }
                _ => format!(
                    "The server returned an error (HTTP {}). Please try again.",
                    status
                ),
            },
            NetworkError::InvalidResponse { .. } => {
                "Received an invalid response from the server. Please try again.".to_string()
            }
            NetworkError::Cancelled => "The request was cancelled.".to_string(),
            NetworkError::Other { message } => format!("Network error: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed { .. } => "E_NET_CONN",
            NetworkError::Timeout { .. } => "E_NET_TIMEOUT",
            NetworkError::HttpStatus { .. } => "E_NET_HTTP",
            NetworkError::InvalidResponse { .. } => "E_NET_INVALID",
            NetworkError::Cancelled => "E_NET_CANCEL",
            NetworkError::Other { .. } => "E_NET_OTHER",
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::ConnectionFailed { url, message } => {
                write!(f, "Connection failed to '{}': {}", url, message)
            }
            NetworkError::Timeout { operation } => write!(f, "{} timed out", operation),
            NetworkError::HttpStatus { status, .. } => write!(f, "HTTP {}", status),
            NetworkError::InvalidResponse { message } => {
                write!(f, "Invalid response: {}", message)
            }
            NetworkError::Cancelled => write!(f, "Request cancelled"),
            NetworkError::Other { message } => write!(f, "Network error: {}", message),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        NetworkError::InvalidResponse {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_display_is_terse() {
        let err = NetworkError::HttpStatus {
            status: 404,
            message: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404");
        assert!(err.user_message().contains("not found"));
    }

    #[test]
    fn test_retryable() {
        assert!(NetworkError::Timeout {
            operation: "x".into()
        }
        .is_retryable());
        assert!(NetworkError::HttpStatus {
            status: 503,
            message: String::new()
        }
        .is_retryable());
        assert!(!NetworkError::HttpStatus {
            status: 404,
            message: String::new()
        }
        .is_retryable());
        assert!(!NetworkError::Cancelled.is_retryable());
    }

    #[test]
    fn test_from_http_keeps_url() {
        let err = NetworkError::from_http(
            HttpError::ConnectionFailed("refused".into()),
            "https://chateqt.com/api/v1/conversations",
        );
        match err {
            NetworkError::ConnectionFailed { url, message } => {
                assert!(url.ends_with("/conversations"));
                assert_eq!(message, "refused");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_from_http_status() {
        let err = NetworkError::from_http(
            HttpError::ServerError {
                status: 500,
                message: "boom".into(),
            },
            "u",
        );
        assert_eq!(err.error_code(), "E_NET_HTTP");
        assert_eq!(err.to_string(), "HTTP 500");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(
            NetworkError::from(json_err),
            NetworkError::InvalidResponse { .. }
        ));
    }
}
