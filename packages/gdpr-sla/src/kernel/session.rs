use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::common::{Clock, ContactId, SessionId, SystemClock};
use crate::kernel::BaseSession;

/// Sessions expire after 24 hours
const SESSION_TTL_HOURS: i64 = 24;

/// Data held for one visitor session
#[derive(Clone, Debug)]
pub struct SessionData {
    pub contact_id: Option<ContactId>,
    pub values: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
}

/// In-memory session store
///
/// Expired sessions behave as if they never existed, which is what resets the
/// prompt flag between visits.
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, SessionData>>>,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Start a session, optionally for a logged-in contact
    pub async fn create_session(&self, contact_id: Option<ContactId>) -> SessionId {
        let id = SessionId::new();
        let data = SessionData {
            contact_id,
            values: HashMap::new(),
            created_at: self.clock.now(),
        };
        self.sessions.write().await.insert(id, data);
        id
    }

    /// Handle scoped to one session, for passing into domain operations
    pub fn session(&self, id: SessionId) -> SessionHandle {
        SessionHandle {
            id,
            sessions: self.sessions.clone(),
            clock: self.clock.clone(),
        }
    }

    /// Delete session (logout)
    pub async fn delete_session(&self, id: SessionId) {
        self.sessions.write().await.remove(&id);
    }

    /// Clean up expired sessions (run periodically by the host)
    pub async fn cleanup_expired(&self) {
        let now = self.clock.now();
        self.sessions
            .write()
            .await
            .retain(|_, session| !is_expired(session, now));
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn is_expired(session: &SessionData, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(session.created_at) >= Duration::hours(SESSION_TTL_HOURS)
}

/// One session of a [`SessionStore`]
#[derive(Clone)]
pub struct SessionHandle {
    id: SessionId,
    sessions: Arc<RwLock<HashMap<SessionId, SessionData>>>,
    clock: Arc<dyn Clock>,
}

impl SessionHandle {
    pub fn id(&self) -> SessionId {
        self.id
    }

    async fn live_session<T>(&self, read: impl FnOnce(&SessionData) -> T) -> Option<T> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(&self.id)?;
        if is_expired(session, self.clock.now()) {
            return None;
        }
        Some(read(session))
    }
}

#[async_trait]
impl BaseSession for SessionHandle {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .live_session(|s| s.values.get(key).cloned())
            .await
            .flatten())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = self.clock.now();
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&self.id) {
            Some(session) if !is_expired(session, now) => {
                session.values.insert(key.to_string(), value.to_string());
                Ok(())
            }
            _ => Err(anyhow!("Session {} not found or expired", self.id)),
        }
    }

    async fn logged_in_contact_id(&self) -> Result<Option<ContactId>> {
        Ok(self.live_session(|s| s.contact_id).await.flatten())
    }
}
