//! Credentials provider trait abstraction.
//!
//! Storage for the session token, swappable for an in-memory store in tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::Credentials;

/// Credentials operation errors.
#[derive(Debug, Clone, Error)]
pub enum CredentialsError {
    #[error("Could not determine home directory")]
    NoHomeDirectory,
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for CredentialsError {
    fn from(err: std::io::Error) -> Self {
        CredentialsError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CredentialsError {
    fn from(err: serde_json::Error) -> Self {
        CredentialsError::Serialization(err.to_string())
    }
}

/// Trait for credentials storage and retrieval.
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    /// Load credentials from storage.
    ///
    /// - `Ok(Some(credentials))` if a session is stored
    /// - `Ok(None)` if nothing is stored
    async fn load(&self) -> Result<Option<Credentials>, CredentialsError>;

    /// Save credentials to storage, replacing any previous session.
    async fn save(&self, creds: &Credentials) -> Result<(), CredentialsError>;

    /// Clear all stored credentials. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<(), CredentialsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_error_display() {
        assert_eq!(
            CredentialsError::Io("disk full".to_string()).to_string(),
            "IO error: disk full"
        );
        assert_eq!(
            CredentialsError::Serialization("invalid json".to_string()).to_string(),
            "Serialization error: invalid json"
        );
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(
            CredentialsError::from(err),
            CredentialsError::Serialization(_)
        ));
    }
}
