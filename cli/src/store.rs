//! On-disk console state.
//!
//! Everything lives in one directory: `credentials.json` holds the bearer
//! token under `authToken`, `registration.json` a registration awaiting its
//! OTP, and `password_reset.json` the progress of a password reset. The two
//! flow files are removed once their flow completes.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console_core::screens::ResetStep;
use console_core::{ApiError, CredentialStore, PendingRegistration};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

const CREDENTIALS_FILE: &str = "credentials.json";
const REGISTRATION_FILE: &str = "registration.json";
const PASSWORD_RESET_FILE: &str = "password_reset.json";

/// Default directory name under the platform config dir.
const APP_DIR: &str = "admin-console";

#[derive(Serialize, Deserialize)]
struct Credentials {
    #[serde(rename = "authToken")]
    auth_token: String,
}

/// Credential store backed by `credentials.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileStore {
    fn load(&self) -> Result<Option<String>, ApiError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ApiError::Storage(e.to_string())),
        };
        let credentials: Credentials =
            serde_json::from_str(&text).map_err(|e| ApiError::Storage(e.to_string()))?;
        Ok(Some(credentials.auth_token))
    }

    fn save(&self, token: &str) -> Result<(), ApiError> {
        let credentials = Credentials {
            auth_token: token.to_string(),
        };
        write_json(&self.path, &credentials).map_err(|e| ApiError::Storage(e.to_string()))
    }

    fn clear(&self) -> Result<(), ApiError> {
        remove_if_exists(&self.path).map_err(|e| ApiError::Storage(e.to_string()))
    }
}

/// The directory holding credentials and in-progress flows.
#[derive(Debug, Clone)]
pub struct StateDir {
    root: PathBuf,
}

impl StateDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `explicit` when given (flag or `ADMIN_CONSOLE_HOME`), otherwise the
    /// platform config dir.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        if let Some(root) = explicit {
            return Ok(Self::new(root));
        }
        let base = dirs::config_dir().context("no config directory on this platform; pass --state-dir")?;
        Ok(Self::new(base.join(APP_DIR)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn credentials(&self) -> FileStore {
        FileStore::new(self.root.join(CREDENTIALS_FILE))
    }

    pub fn registration(&self) -> Result<Option<PendingRegistration>> {
        read_json(&self.root.join(REGISTRATION_FILE))
    }

    /// Persist the pending registration, or drop the file when there is none.
    pub fn set_registration(&self, pending: Option<&PendingRegistration>) -> Result<()> {
        let path = self.root.join(REGISTRATION_FILE);
        match pending {
            Some(pending) => write_json(&path, pending),
            None => remove_if_exists(&path).map_err(Into::into),
        }
    }

    pub fn password_reset(&self) -> Result<Option<ResetStep>> {
        read_json(&self.root.join(PASSWORD_RESET_FILE))
    }

    /// Persist reset progress. A finished reset leaves no file behind.
    pub fn set_password_reset(&self, step: &ResetStep) -> Result<()> {
        let path = self.root.join(PASSWORD_RESET_FILE);
        match step {
            ResetStep::Email | ResetStep::Done => remove_if_exists(&path).map_err(Into::into),
            step => write_json(&path, step),
        }
    }

    /// Forget every in-progress flow.
    pub fn clear_flows(&self) -> Result<()> {
        self.set_registration(None)?;
        self.set_password_reset(&ResetStep::Email)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };
    let value = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(value))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    debug!(path = %path.display(), "state saved");
    Ok(())
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
