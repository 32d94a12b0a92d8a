//! Pending-change store for the homologation configuration.
//!
//! Edits are staged in a key/value map layered over the last fetched record
//! and sent together on commit. Commits are last-writer-wins; the API has no
//! revision token to check against.

use crate::client::{ApiError, ConfigurationApi};
use crate::models::Configuration;
use crate::session::{AccessToken, SessionError, SessionProvider};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Not authenticated: log in again")]
    NotAuthenticated,
    #[error("Configuration request failed")]
    Api(#[source] ApiError),
    #[error("'{key}' is not a boolean setting (current value: {value})")]
    NotABoolean { key: String, value: Value },
    #[error("Configuration record could not be converted: {0}")]
    Decode(String),
}

impl From<SessionError> for StoreError {
    fn from(_: SessionError) -> Self {
        StoreError::NotAuthenticated
    }
}

impl From<ApiError> for StoreError {
    fn from(err: ApiError) -> Self {
        if err.is_unauthorized() {
            StoreError::NotAuthenticated
        } else {
            StoreError::Api(err)
        }
    }
}

/// Staged edits over the last saved configuration.
pub struct PendingChangeStore {
    api: Arc<dyn ConfigurationApi>,
    session: Arc<dyn SessionProvider>,
    base: Map<String, Value>,
    pending: Map<String, Value>,
}

impl PendingChangeStore {
    /// Store with an empty base; call [`PendingChangeStore::load`] to fetch it.
    pub fn new(api: Arc<dyn ConfigurationApi>, session: Arc<dyn SessionProvider>) -> Self {
        Self {
            api,
            session,
            base: Map::new(),
            pending: Map::new(),
        }
    }

    pub fn with_configuration(
        api: Arc<dyn ConfigurationApi>,
        session: Arc<dyn SessionProvider>,
        configuration: &Configuration,
    ) -> Result<Self, StoreError> {
        let mut store = Self::new(api, session);
        store.base = to_map(configuration)?;
        Ok(store)
    }

    fn token(&self) -> Result<AccessToken, StoreError> {
        Ok(self.session.token()?)
    }

    /// Fetch the saved record and make it the base. Staged edits are kept.
    pub async fn load(&mut self) -> Result<Configuration, StoreError> {
        let token = self.token()?;
        let configuration = self.api.get_configuration(&token).await?;
        self.base = to_map(&configuration)?;
        debug!(
            "Loaded configuration ({} pending change(s) kept)",
            self.pending.len()
        );
        Ok(configuration)
    }

    /// Shallow-merge `patch` into the pending changes; later keys win.
    pub fn stage(&mut self, patch: Map<String, Value>) {
        for (key, value) in patch {
            self.pending.insert(key, value);
        }
    }

    pub fn stage_value(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.pending.insert(key.into(), value.into());
    }

    /// Staged value if any, else the saved one. A staged `null` counts as
    /// nothing staged.
    pub fn effective(&self, key: &str) -> Option<&Value> {
        match self.pending.get(key) {
            Some(value) if !value.is_null() => Some(value),
            _ => self.base.get(key),
        }
    }

    /// Flip a boolean setting relative to its effective value. Returns the
    /// newly staged value.
    pub fn toggle(&mut self, key: &str) -> Result<bool, StoreError> {
        let current = match self.effective(key) {
            Some(Value::Bool(b)) => *b,
            other => {
                return Err(StoreError::NotABoolean {
                    key: key.to_string(),
                    value: other.cloned().unwrap_or(Value::Null),
                });
            }
        };
        self.stage_value(key, !current);
        Ok(!current)
    }

    /// Send base and pending changes as one update.
    ///
    /// On success the server's answer becomes the new base and the pending
    /// map is cleared. On failure neither is touched, so the caller can retry.
    pub async fn commit(&mut self) -> Result<Configuration, StoreError> {
        let token = self.token()?;
        let merged = self.merged();
        info!(
            "Committing configuration with {} pending change(s)",
            self.pending.len()
        );

        let saved = match self.api.update_configuration(&token, &merged).await {
            Ok(saved) => saved,
            Err(e) => {
                error!("Configuration commit failed: {}", e);
                return Err(e.into());
            }
        };

        self.base = to_map(&saved)?;
        self.pending.clear();
        Ok(saved)
    }

    /// Drop every staged change.
    pub fn discard(&mut self) {
        self.pending.clear();
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending(&self) -> &Map<String, Value> {
        &self.pending
    }

    /// The last saved record.
    pub fn configuration(&self) -> Result<Configuration, StoreError> {
        from_map(self.base.clone())
    }

    /// The record as it would look after a commit.
    pub fn effective_configuration(&self) -> Result<Configuration, StoreError> {
        from_map(self.merged())
    }

    fn merged(&self) -> Map<String, Value> {
        let mut merged = self.base.clone();
        for (key, value) in &self.pending {
            if !value.is_null() {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged
    }
}

fn to_map(configuration: &Configuration) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(configuration) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::Decode(format!("expected an object, got {}", other))),
        Err(e) => Err(StoreError::Decode(e.to_string())),
    }
}

fn from_map(map: Map<String, Value>) -> Result<Configuration, StoreError> {
    serde_json::from_value(Value::Object(map)).map_err(|e| StoreError::Decode(e.to_string()))
}
