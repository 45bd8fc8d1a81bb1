//! Authentication-related error types.

use std::fmt;

/// Authentication-specific error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No stored session (user not logged in).
    NotAuthenticated,

    /// Login was rejected. `message` is the server's `error` field or a fallback.
    LoginFailed { message: String },

    /// Signup was rejected.
    SignupFailed { message: String },

    /// Free plan quota is used up.
    UsageLimitReached { used: i64, limit: i64 },
}

impl AuthError {
    /// Check if this error might be resolved by logging in again.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, AuthError::NotAuthenticated)
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::NotAuthenticated => {
                "You are not logged in. Run `chateqt login <email>` first.".to_string()
            }
            AuthError::LoginFailed { message } => message.clone(),
            AuthError::SignupFailed { message } => message.clone(),
            AuthError::UsageLimitReached { used, limit } => format!(
                "You've used {} of {} free queries. Upgrade your plan to keep asking.",
                used, limit
            ),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NotAuthenticated => "E_AUTH_NOT_AUTH",
            AuthError::LoginFailed { .. } => "E_AUTH_LOGIN",
            AuthError::SignupFailed { .. } => "E_AUTH_SIGNUP",
            AuthError::UsageLimitReached { .. } => "E_AUTH_LIMIT",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::NotAuthenticated => write!(f, "Not authenticated"),
            AuthError::LoginFailed { message } => write!(f, "{}", message),
            AuthError::SignupFailed { message } => write!(f, "{}", message),
            AuthError::UsageLimitReached { used, limit } => {
                write!(f, "Usage limit reached ({}/{})", used, limit)
            }
        }
    }
}

impl std::error::Error for AuthError {}
