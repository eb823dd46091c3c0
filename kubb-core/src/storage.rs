//! Persistence collaborator for sessions.
//!
//! The rule engine only needs durable create/read/update/delete keyed by
//! session id. [`MemoryStore`] keeps serialized JSON in memory, which makes
//! every save and load go through the same serialization a durable backend
//! would use.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::NaiveDate;
use log::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::session::Session;

/// Storage backend for sessions of either kind.
///
/// Implementations must be `Send + Sync` so a store can be shared with
/// whatever thread drives persistence.
pub trait SessionStore: Send + Sync {
    /// Insert or replace the session with the same id.
    fn save(&self, session: &Session) -> StoreResult<()>;

    /// Every stored session, oldest start first.
    fn load_all(&self) -> StoreResult<Vec<Session>>;

    /// The most recently started session still resumable on `today`.
    fn load_active(&self, today: NaiveDate) -> StoreResult<Option<Session>> {
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|s| s.is_incomplete(today))
            .max_by_key(Session::start_time))
    }

    /// Remove a session. Fails with [`StoreError::NotFound`] if absent.
    fn delete(&self, id: Uuid) -> StoreResult<()>;
}

/// In-memory store for tests and the CLI.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<HashMap<Uuid, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemoryStore {
    fn save(&self, session: &Session) -> StoreResult<()> {
        let json = serde_json::to_string(session)?;
        let mut data = self.data.write().map_err(|_| StoreError::Poisoned)?;
        data.insert(session.id(), json);
        debug!("saved session {}", session.id());
        Ok(())
    }

    fn load_all(&self) -> StoreResult<Vec<Session>> {
        let data = self.data.read().map_err(|_| StoreError::Poisoned)?;
        let mut sessions = data
            .values()
            .map(|json| serde_json::from_str::<Session>(json))
            .collect::<Result<Vec<_>, _>>()?;
        sessions.sort_by_key(Session::start_time);
        Ok(sessions)
    }

    fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut data = self.data.write().map_err(|_| StoreError::Poisoned)?;
        data.remove(&id).ok_or(StoreError::NotFound(id))?;
        debug!("deleted session {}", id);
        Ok(())
    }
}
