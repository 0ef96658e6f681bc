//! Stored OAuth credentials for the calendar provider
//!
//! Token acquisition (the interactive consent flow) happens outside this
//! crate; the store only loads, refreshes, and persists tokens obtained
//! elsewhere. The pipeline itself never touches credential state.

use chrono::{DateTime, Utc};
use eventlens_core::{EventLensError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// OAuth tokens persisted between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
    /// Bearer token for API calls
    pub access_token: String,

    /// Long-lived token used to renew the access token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Access token expiry; `None` means unknown and the token is used as-is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredCredentials {
    /// Whether the access token has expired as of `now`
    #[inline]
    #[must_use = "returns whether the access token needs a refresh"]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expiry| expiry <= now)
    }
}

/// Load/save capability for provider credentials.
pub trait CredentialStore: Send + Sync {
    /// Load the stored credentials.
    ///
    /// # Errors
    ///
    /// Returns [`EventLensError::CalendarService`] when no credentials are
    /// available or they cannot be read.
    fn load(&self) -> Result<StoredCredentials>;

    /// Persist credentials (e.g. after a token refresh).
    ///
    /// # Errors
    ///
    /// Returns [`EventLensError::CalendarService`] when the credentials
    /// cannot be written.
    fn save(&self, credentials: &StoredCredentials) -> Result<()>;
}

/// JSON-file-backed credential store
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store reading and writing the given JSON file
    #[must_use = "creates a credential store for the given path"]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<StoredCredentials> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            EventLensError::CalendarService(format!(
                "cannot read credentials from {}: {e}",
                self.path.display()
            ))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            EventLensError::CalendarService(format!(
                "credentials file {} is not valid: {e}",
                self.path.display()
            ))
        })
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        let contents = serde_json::to_string_pretty(credentials).map_err(|e| {
            EventLensError::CalendarService(format!("cannot serialize credentials: {e}"))
        })?;
        std::fs::write(&self.path, contents).map_err(|e| {
            EventLensError::CalendarService(format!(
                "cannot write credentials to {}: {e}",
                self.path.display()
            ))
        })
    }
}
