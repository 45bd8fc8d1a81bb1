//! In-memory credentials provider for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::auth::Credentials;
use crate::traits::{CredentialsError, CredentialsProvider};

/// Credentials provider that never touches the file system.
///
/// Failures can be switched on to exercise error paths.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentials {
    credentials: Arc<Mutex<Option<Credentials>>>,
    save_should_fail: Arc<Mutex<bool>>,
    load_should_fail: Arc<Mutex<bool>>,
}

impl InMemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider with initial credentials.
    pub fn with_credentials(creds: Credentials) -> Self {
        let provider = Self::new();
        provider.set_credentials(Some(creds));
        provider
    }

    pub fn set_save_should_fail(&self, should_fail: bool) {
        *self.save_should_fail.lock().unwrap() = should_fail;
    }

    pub fn set_load_should_fail(&self, should_fail: bool) {
        *self.load_should_fail.lock().unwrap() = should_fail;
    }

    /// Get the current credentials synchronously (for testing).
    pub fn get_credentials(&self) -> Option<Credentials> {
        self.credentials.lock().unwrap().clone()
    }

    /// Set credentials synchronously (for testing).
    pub fn set_credentials(&self, creds: Option<Credentials>) {
        *self.credentials.lock().unwrap() = creds;
    }
}

#[async_trait]
impl CredentialsProvider for InMemoryCredentials {
    async fn load(&self) -> Result<Option<Credentials>, CredentialsError> {
        if *self.load_should_fail.lock().unwrap() {
            return Err(CredentialsError::Io("Mock load failure".to_string()));
        }

        Ok(self.credentials.lock().unwrap().clone())
    }

    async fn save(&self, creds: &Credentials) -> Result<(), CredentialsError> {
        if *self.save_should_fail.lock().unwrap() {
            return Err(CredentialsError::Io("Mock save failure".to_string()));
        }

        *self.credentials.lock().unwrap() = Some(creds.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialsError> {
        *self.credentials.lock().unwrap() = None;
        Ok(())
    }
}
