//! File-based credentials provider adapter.

use async_trait::async_trait;
use std::path::Path;

use crate::auth::{Credentials, CredentialsManager};
use crate::error::SystemError;
use crate::traits::{CredentialsError, CredentialsProvider};

/// [`CredentialsProvider`] over [`CredentialsManager`].
///
/// A file holding neither token nor user loads as `None`.
#[derive(Debug, Clone)]
pub struct FileCredentialsProvider {
    manager: CredentialsManager,
}

impl FileCredentialsProvider {
    /// Provider for `~/.chateqt/credentials.json`.
    pub fn new() -> Result<Self, CredentialsError> {
        CredentialsManager::new()
            .map(Self::with_manager)
            .ok_or(CredentialsError::NoHomeDirectory)
    }

    pub fn with_manager(manager: CredentialsManager) -> Self {
        Self { manager }
    }

    pub fn credentials_path(&self) -> &Path {
        self.manager.credentials_path()
    }
}

impl From<SystemError> for CredentialsError {
    fn from(err: SystemError) -> Self {
        match err {
            SystemError::NoHomeDirectory => CredentialsError::NoHomeDirectory,
            SystemError::Storage { message } => CredentialsError::Serialization(message),
            other => CredentialsError::Io(other.to_string()),
        }
    }
}

#[async_trait]
impl CredentialsProvider for FileCredentialsProvider {
    async fn load(&self) -> Result<Option<Credentials>, CredentialsError> {
        let creds = self.manager.load();
        Ok((!creds.is_empty()).then_some(creds))
    }

    async fn save(&self, creds: &Credentials) -> Result<(), CredentialsError> {
        self.manager.save(creds).map_err(CredentialsError::from)
    }

    async fn clear(&self) -> Result<(), CredentialsError> {
        self.manager.clear().map_err(CredentialsError::from)
    }
}
