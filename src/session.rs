//! Session capability handing out the bearer token for API calls.
//!
//! Tokens are issued by the external identity service; this module only
//! locates the current one and refuses tokens that are visibly expired.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_TOKEN_ENV: &str = "SAGE_ACCESS_TOKEN";

/// Bearer credential for the remote API.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Reasons a session cannot produce a usable token.
///
/// Every variant means the same thing to callers: send the user to login.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Not authenticated: no session token")]
    Missing,
    #[error("Not authenticated: session token expired")]
    Expired,
    #[error("Session token could not be read: {0}")]
    Unreadable(String),
}

/// Source of the current bearer token.
pub trait SessionProvider: Send + Sync {
    fn token(&self) -> Result<AccessToken, SessionError>;
}

/// Fixed token, or none at all.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    token: Option<AccessToken>,
}

impl StaticSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(AccessToken::new(token)),
        }
    }

    pub fn anonymous() -> Self {
        Self { token: None }
    }
}

impl SessionProvider for StaticSession {
    fn token(&self) -> Result<AccessToken, SessionError> {
        let token = self.token.clone().ok_or(SessionError::Missing)?;
        ensure_not_expired(token.as_str())?;
        Ok(token)
    }
}

/// Token read from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvSession {
    var: String,
}

impl EnvSession {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvSession {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_ENV)
    }
}

impl SessionProvider for EnvSession {
    fn token(&self) -> Result<AccessToken, SessionError> {
        let raw = std::env::var(&self.var).unwrap_or_default();
        token_from_raw(&raw)
    }
}

/// Token persisted in a file, the on-disk counterpart of browser local storage.
#[derive(Debug, Clone)]
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist a token obtained from the identity service.
    pub fn store(&self, token: &AccessToken) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, token.as_str())
    }

    /// Forget the stored token. Missing files are not an error.
    pub fn clear(&self) -> std::io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

impl SessionProvider for FileSession {
    fn token(&self) -> Result<AccessToken, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => token_from_raw(&raw),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(SessionError::Missing),
            Err(e) => Err(SessionError::Unreadable(format!(
                "{}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

fn token_from_raw(raw: &str) -> Result<AccessToken, SessionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SessionError::Missing);
    }
    ensure_not_expired(trimmed)?;
    Ok(AccessToken::new(trimmed))
}

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    #[serde(default)]
    exp: Option<i64>,
}

/// Reject JWTs whose `exp` has passed. Opaque tokens pass through untouched.
///
/// The signature is not checked; only the API can do that.
pub fn ensure_not_expired(raw: &str) -> Result<(), SessionError> {
    if raw.split('.').count() != 3 {
        return Ok(());
    }

    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    match decode::<ExpiryClaims>(raw, &DecodingKey::from_secret(&[]), &validation) {
        Ok(data) => match data.claims.exp {
            Some(exp) if exp <= Utc::now().timestamp() => Err(SessionError::Expired),
            _ => Ok(()),
        },
        Err(e) => {
            debug!("Session token is not a readable JWT ({}), using it as-is", e);
            Ok(())
        }
    }
}
