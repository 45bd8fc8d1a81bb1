//! Errors that end a chat stream.
//!
//! Only transport-level failures live here. A bad `data:` payload or an
//! unknown event name is dropped by the decoder and never becomes a
//! `StreamError`.

use std::fmt;

use crate::traits::HttpError;

/// Fatal failure of one streaming chat request.
///
/// `Display` is deliberately short (`HTTP 502`, `No response body`) since it
/// is what the error callback receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// Server answered with a non-2xx status.
    Status { status: u16 },

    /// Response carried no readable body.
    NoBody,

    /// Request could not reach the server.
    Connection { message: String },

    /// Request or body read timed out.
    Timeout,

    /// Body read failed after the stream had started.
    Interrupted { message: String },

    /// Request could not be built (bad URL, unserializable body).
    InvalidRequest { message: String },
}

impl StreamError {
    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            StreamError::Status { status } => *status >= 500 || *status == 429 || *status == 408,
            StreamError::Connection { .. }
            | StreamError::Timeout
            | StreamError::Interrupted { .. } => true,
            StreamError::NoBody | StreamError::InvalidRequest { .. } => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::Status { status: 401 } | StreamError::Status { status: 403 } => {
                "Your session was rejected. Please log out and back in.".to_string()
            }
            StreamError::Status { status: 429 } => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            StreamError::Status { status } if *status >= 500 => {
                "The server is experiencing issues. Please try again later.".to_string()
            }
            StreamError::Status { status } => {
                format!("The server rejected the request (HTTP {}).", status)
            }
            StreamError::NoBody => "The server sent an empty response.".to_string(),
            StreamError::Connection { .. } => {
                "Unable to connect to the server. Please check your internet connection."
                    .to_string()
            }
            StreamError::Timeout => "The server took too long to respond.".to_string(),
            StreamError::Interrupted { .. } => {
                "The answer was cut off. Please try again.".to_string()
            }
            StreamError::InvalidRequest { message } => format!("Invalid request: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::Status { .. } => "E_STREAM_STATUS",
            StreamError::NoBody => "E_STREAM_NO_BODY",
            StreamError::Connection { .. } => "E_STREAM_CONN",
            StreamError::Timeout => "E_STREAM_TIMEOUT",
            StreamError::Interrupted { .. } => "E_STREAM_INTERRUPTED",
            StreamError::InvalidRequest { .. } => "E_STREAM_REQUEST",
        }
    }

    /// Classify an error raised while the body was being read.
    pub fn interrupted(err: HttpError) -> Self {
        match err {
            HttpError::Timeout(_) => StreamError::Timeout,
            other => StreamError::Interrupted {
                message: other.to_string(),
            },
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Status { status } => write!(f, "HTTP {}", status),
            StreamError::NoBody => write!(f, "No response body"),
            StreamError::Connection { message } => write!(f, "Network error: {}", message),
            StreamError::Timeout => write!(f, "Request timed out"),
            StreamError::Interrupted { message } => write!(f, "Stream interrupted: {}", message),
            StreamError::InvalidRequest { message } => write!(f, "Invalid request: {}", message),
        }
    }
}

impl std::error::Error for StreamError {}

/// Errors raised before the body starts flowing.
impl From<HttpError> for StreamError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Timeout(_) => StreamError::Timeout,
            HttpError::ServerError { status, .. } => StreamError::Status { status },
            HttpError::InvalidUrl(message) => StreamError::InvalidRequest { message },
            HttpError::ConnectionFailed(message)
            | HttpError::Io(message)
            | HttpError::Other(message) => StreamError::Connection { message },
            HttpError::Cancelled => StreamError::Connection {
                message: "request cancelled".to_string(),
            },
        }
    }
}
