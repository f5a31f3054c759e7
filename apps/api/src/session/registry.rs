//! Session registry: one independent `Session` per user session id.
//!
//! Each session sits behind its own mutex: a request holds it for the whole
//! operation (including the oracle call), so a session only ever has one caller.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::ModelId;
use crate::session::store::SessionStore;

/// Credential and model choice for a session. Never exported or persisted.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct OracleSettings {
    pub api_key: Option<String>,
    pub model: ModelId,
}

impl OracleSettings {
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

// Hand-written so the credential never reaches logs.
impl std::fmt::Debug for OracleSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleSettings")
            .field("api_key", &self.api_key().map(|_| "<redacted>"))
            .field("model", &self.model)
            .finish()
    }
}

/// Public view of a session's oracle settings.
#[derive(Debug, Serialize)]
pub struct OracleSettingsView {
    pub has_api_key: bool,
    pub model: ModelId,
}

impl From<&OracleSettings> for OracleSettingsView {
    fn from(settings: &OracleSettings) -> Self {
        Self {
            has_api_key: settings.api_key().is_some(),
            model: settings.model,
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    pub store: SessionStore,
    pub oracle: OracleSettings,
}

pub type SessionHandle = Arc<Mutex<Session>>;

#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new session with an empty store.
    pub async fn create(&self, oracle: OracleSettings) -> Uuid {
        self.create_with(SessionStore::new(), oracle).await
    }

    /// Starts a new session around an existing store (e.g. an imported snapshot).
    pub async fn create_with(&self, store: SessionStore, oracle: OracleSettings) -> Uuid {
        let id = Uuid::new_v4();
        let session = Session { store, oracle };
        let mut sessions = self.sessions.write().await;
        sessions.insert(id, Arc::new(Mutex::new(session)));
        info!("Created session {id} ({} active)", sessions.len());
        id
    }

    pub async fn get(&self, id: Uuid) -> Result<SessionHandle, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    /// Ends a session and discards its state. Returns whether it existed.
    pub async fn remove(&self, id: Uuid) -> bool {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(&id).is_some();
        if removed {
            info!("Ended session {id} ({} active)", sessions.len());
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Writes a live session's persisted state to `path`.
    /// Returns `false` without touching the file if the session has ended.
    pub async fn write_snapshot(&self, id: Uuid, path: &Path) -> Result<bool, AppError> {
        let Some(handle) = self.sessions.read().await.get(&id).cloned() else {
            return Ok(false);
        };
        let snapshot = handle.lock().await.store.export();
        snapshot.write_to_path(path)?;
        info!("Wrote session {id} to {}", path.display());
        Ok(true)
    }
}
