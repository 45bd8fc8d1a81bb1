//! Unified error type for the ChatEQT client.

use std::fmt;

use super::auth::AuthError;
use super::category::ErrorCategory;
use super::context::ErrorContext;
use super::network::NetworkError;
use super::stream::StreamError;
use super::system::SystemError;
use crate::traits::CredentialsError;

/// Every error a client operation can surface.
#[derive(Debug)]
pub enum ChatError {
    /// Network-related errors (connections, HTTP, timeouts).
    Network(NetworkError),

    /// Streaming chat failures.
    Stream(StreamError),

    /// Session and quota errors.
    Auth(AuthError),

    /// System/filesystem errors.
    System(SystemError),

    /// Wrapped error with additional context.
    WithContext {
        error: Box<ChatError>,
        context: ErrorContext,
    },
}

impl ChatError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ChatError::Network(NetworkError::HttpStatus { status, .. })
            | ChatError::Stream(StreamError::Status { status }) => match *status {
                401 | 403 => ErrorCategory::Auth,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Client,
            },
            ChatError::Network(NetworkError::InvalidResponse { .. }) => ErrorCategory::Server,
            ChatError::Network(_) => ErrorCategory::Network,
            ChatError::Stream(StreamError::NoBody) => ErrorCategory::Server,
            ChatError::Stream(StreamError::InvalidRequest { .. }) => ErrorCategory::Client,
            ChatError::Stream(_) => ErrorCategory::Network,
            ChatError::Auth(err) => {
                if err.requires_reauth() {
                    ErrorCategory::Auth
                } else {
                    ErrorCategory::User
                }
            }
            ChatError::System(_) => ErrorCategory::System,
            ChatError::WithContext { error, .. } => error.category(),
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ChatError::Network(err) => err.is_retryable(),
            ChatError::Stream(err) => err.is_retryable(),
            ChatError::Auth(_) => false,
            ChatError::System(_) => false,
            ChatError::WithContext { error, .. } => error.is_retryable(),
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Network(err) => err.user_message(),
            ChatError::Stream(err) => err.user_message(),
            ChatError::Auth(err) => err.user_message(),
            ChatError::System(err) => err.user_message(),
            ChatError::WithContext { error, context } => {
                format!("{} (while trying to {})", error.user_message(), context)
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ChatError::Network(err) => err.error_code(),
            ChatError::Stream(err) => err.error_code(),
            ChatError::Auth(err) => err.error_code(),
            ChatError::System(err) => err.error_code(),
            ChatError::WithContext { error, .. } => error.error_code(),
        }
    }

    /// Attach context to this error.
    pub fn with_context(self, ctx: ErrorContext) -> Self {
        ChatError::WithContext {
            error: Box::new(self),
            context: ctx,
        }
    }

    /// Get the context if this error has one attached.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            ChatError::WithContext { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }

    /// Check if this error requires logging in again.
    pub fn requires_reauth(&self) -> bool {
        match self {
            ChatError::Auth(err) => err.requires_reauth(),
            ChatError::Network(NetworkError::HttpStatus { status: 401, .. }) => true,
            ChatError::Stream(StreamError::Status { status: 401 }) => true,
            ChatError::WithContext { error, .. } => error.requires_reauth(),
            _ => false,
        }
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Network(err) => write!(f, "{}", err),
            ChatError::Stream(err) => write!(f, "{}", err),
            ChatError::Auth(err) => write!(f, "{}", err),
            ChatError::System(err) => write!(f, "{}", err),
            ChatError::WithContext { error, context } => write!(f, "{} ({})", error, context),
        }
    }
}

impl std::error::Error for ChatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChatError::Network(err) => Some(err),
            ChatError::Stream(err) => Some(err),
            ChatError::Auth(err) => Some(err),
            ChatError::System(err) => Some(err),
            ChatError::WithContext { error, .. } => error.source(),
        }
    }
}

impl From<NetworkError> for ChatError {
    fn from(err: NetworkError) -> Self {
        ChatError::Network(err)
    }
}

impl From<StreamError> for ChatError {
    fn from(err: StreamError) -> Self {
        ChatError::Stream(err)
    }
}

impl From<AuthError> for ChatError {
    fn from(err: AuthError) -> Self {
        ChatError::Auth(err)
    }
}

impl From<SystemError> for ChatError {
    fn from(err: SystemError) -> Self {
        ChatError::System(err)
    }
}

impl From<std::io::Error> for ChatError {
    fn from(err: std::io::Error) -> Self {
        ChatError::System(err.into())
    }
}

impl From<CredentialsError> for ChatError {
    fn from(err: CredentialsError) -> Self {
        ChatError::System(match err {
            CredentialsError::NoHomeDirectory => SystemError::NoHomeDirectory,
            CredentialsError::Io(message) => SystemError::Io {
                operation: "access credentials".to_string(),
                path: None,
                message,
            },
            CredentialsError::Serialization(message) => SystemError::Storage { message },
        })
    }
}
