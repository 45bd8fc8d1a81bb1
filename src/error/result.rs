//! Result type alias for client operations.

use super::chat_error::ChatError;
use super::context::ErrorContext;

/// Type alias for Results using ChatError.
pub type ChatResult<T> = Result<T, ChatError>;

/// Extension trait for Result types to add context to errors.
pub trait ResultExt<T> {
    /// Add context to an error if the result is Err.
    fn context(self, ctx: ErrorContext) -> ChatResult<T>;

    /// Add context using a closure (only called on error).
    fn with_context<F>(self, f: F) -> ChatResult<T>
    where
        F: FnOnce() -> ErrorContext;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<ChatError>,
{
    fn context(self, ctx: ErrorContext) -> ChatResult<T> {
        self.map_err(|e| e.into().with_context(ctx))
    }

    fn with_context<F>(self, f: F) -> ChatResult<T>
    where
        F: FnOnce() -> ErrorContext,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;

    #[test]
    fn test_context_on_err() {
        let result: Result<(), NetworkError> = Err(NetworkError::Cancelled);
        let err = result.context(ErrorContext::new("list")).unwrap_err();
        assert_eq!(err.context().unwrap().operation, "list");
    }

    #[test]
    fn test_with_context_is_lazy_on_ok() {
        let result: Result<u8, NetworkError> = Ok(1);
        let value = result
            .with_context(|| panic!("should not be called"))
            .unwrap();
        assert_eq!(value, 1);
    }
}
