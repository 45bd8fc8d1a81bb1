//! System-related error types.
//!
//! Filesystem failures while reading or writing the stored session.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// System-specific error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemError {
    /// Could not determine home directory.
    NoHomeDirectory,

    /// Permission denied for file/directory operation.
    PermissionDenied { path: PathBuf, operation: String },

    /// Generic I/O error.
    Io {
        operation: String,
        path: Option<PathBuf>,
        message: String,
    },

    /// Stored data could not be encoded or decoded.
    Storage { message: String },
}

impl SystemError {
    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            SystemError::NoHomeDirectory => {
                "Could not determine your home directory. Please check your environment configuration."
                    .to_string()
            }
            SystemError::PermissionDenied { path, operation } => format!(
                "Permission denied: cannot {} '{}'.",
                operation,
                path.display()
            ),
            SystemError::Io {
                operation, path, ..
            } => match path {
                Some(p) => format!("Failed to {} '{}'", operation, p.display()),
                None => format!("Failed to {}", operation),
            },
            SystemError::Storage { message } => {
                format!("Stored session is unreadable: {}", message)
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            SystemError::NoHomeDirectory => "E_SYS_NO_HOME",
            SystemError::PermissionDenied { .. } => "E_SYS_PERM",
            SystemError::Io { .. } => "E_SYS_IO",
            SystemError::Storage { .. } => "E_SYS_STORAGE",
        }
    }
}

impl fmt::Display for SystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemError::NoHomeDirectory => write!(f, "Could not determine home directory"),
            SystemError::PermissionDenied { path, operation } => {
                write!(f, "Permission denied: {} '{}'", operation, path.display())
            }
            SystemError::Io {
                operation,
                path,
                message,
            } => match path {
                Some(p) => write!(f, "Failed to {} '{}': {}", operation, p.display(), message),
                None => write!(f, "Failed to {}: {}", operation, message),
            },
            SystemError::Storage { message } => write!(f, "Storage error: {}", message),
        }
    }
}

impl std::error::Error for SystemError {}

/// Classify an I/O error raised by `operation` on `path`.
pub fn classify_io_error(err: &io::Error, operation: &str, path: Option<PathBuf>) -> SystemError {
    match (err.kind(), path) {
        (io::ErrorKind::PermissionDenied, Some(path)) => SystemError::PermissionDenied {
            path,
            operation: operation.to_string(),
        },
        (_, path) => SystemError::Io {
            operation: operation.to_string(),
            path,
            message: err.to_string(),
        },
    }
}

impl From<io::Error> for SystemError {
    fn from(err: io::Error) -> Self {
        classify_io_error(&err, "perform I/O", None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_permission_denied() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let path = PathBuf::from("/x/credentials.json");
        let classified = classify_io_error(&err, "write", Some(path));
        assert!(matches!(classified, SystemError::PermissionDenied { .. }));
        assert_eq!(classified.error_code(), "E_SYS_PERM");
    }

    #[test]
    fn test_classify_other_io() {
        let err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let classified = classify_io_error(&err, "read", None);
        assert_eq!(classified.to_string(), "Failed to read: gone");
    }

    #[test]
    fn test_from_io_error() {
        let err: SystemError = io::Error::new(io::ErrorKind::Other, "boom").into();
        assert!(matches!(err, SystemError::Io { .. }));
    }
}
