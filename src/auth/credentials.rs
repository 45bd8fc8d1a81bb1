//! Session storage in `~/.chateqt/credentials.json`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::session::{AuthSession, AuthUser};
use crate::error::{classify_io_error, SystemError};

/// The credentials directory name.
const CREDENTIALS_DIR: &str = ".chateqt";

/// The credentials file name.
const CREDENTIALS_FILE: &str = "credentials.json";

/// Stored session: the cookie token plus the user it belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Credentials {
    pub token: Option<String>,
    pub user: Option<AuthUser>,
    pub saved_at: Option<DateTime<Utc>>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a fresh login.
    pub fn from_session(session: &AuthSession) -> Self {
        Self {
            token: session.token.clone(),
            user: Some(session.user.clone()),
            saved_at: Some(Utc::now()),
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Email to send as `X-User-Email`.
    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.email.as_str())
    }

    /// True when nothing worth keeping is stored.
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.user.is_none()
    }
}

/// Manages credential storage and retrieval.
#[derive(Debug, Clone)]
pub struct CredentialsManager {
    credentials_path: PathBuf,
}

impl CredentialsManager {
    /// Returns `None` if the home directory cannot be determined.
    pub fn new() -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self::with_path(home.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE)))
    }

    /// Store credentials in an explicit file instead of the home directory.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: path.into(),
        }
    }

    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    /// Load credentials from the credentials file.
    ///
    /// Returns default credentials if the file doesn't exist or can't be read.
    pub fn load(&self) -> Credentials {
        let file = match File::open(&self.credentials_path) {
            Ok(f) => f,
            Err(_) => return Credentials::default(),
        };

        match serde_json::from_reader(BufReader::new(file)) {
            Ok(creds) => creds,
            Err(e) => {
                debug!(
                    "Ignoring unreadable credentials at {}: {}",
                    self.credentials_path.display(),
                    e
                );
                Credentials::default()
            }
        }
    }

    /// Save credentials, creating the parent directory if needed.
    pub fn save(&self, credentials: &Credentials) -> Result<(), SystemError> {
        let io_err = |operation: &str, e: std::io::Error| {
            classify_io_error(&e, operation, Some(self.credentials_path.clone()))
        };

        if let Some(parent) = self.credentials_path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_err("create directory for", e))?;
        }

        let file = File::create(&self.credentials_path).map_err(|e| io_err("write", e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, credentials).map_err(|e| {
            SystemError::Storage {
                message: e.to_string(),
            }
        })?;
        writer.flush().map_err(|e| io_err("write", e))
    }

    /// Remove the credentials file. A missing file is not an error.
    pub fn clear(&self) -> Result<(), SystemError> {
        match fs::remove_file(&self.credentials_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(classify_io_error(
                &e,
                "remove",
                Some(self.credentials_path.clone()),
            )),
        }
    }
}
