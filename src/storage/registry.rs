//! Session registry
//!
//! Maps session identifiers (carried in a session cookie) to their storage.
//! A session that stays idle past `idle_timeout_secs` is evicted; its cookie
//! then resolves to nothing and the next request starts a fresh session.
//! A new session is only registered once something has been stored in it.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tracing::{debug, trace};
use uuid::Uuid;

use super::action_log::SessionActionLog;
use super::record_store::RecordStore;
use super::session::{MemorySessionStorage, SessionStorage};
use crate::config::SessionConfig;

/// A resolved browser session
#[derive(Clone)]
pub struct BrowserSession {
    pub id: String,
    pub storage: Arc<dyn SessionStorage>,
    /// Set when the session was created for this request
    pub is_new: bool,
}

impl BrowserSession {
    pub fn records(&self) -> RecordStore {
        RecordStore::new(self.storage.clone())
    }

    pub fn action_log(&self) -> SessionActionLog {
        SessionActionLog::new(self.storage.clone())
    }
}

impl std::fmt::Debug for BrowserSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserSession")
            .field("id", &self.id)
            .field("is_new", &self.is_new)
            .finish()
    }
}

pub struct SessionRegistry {
    sessions: Cache<String, Arc<dyn SessionStorage>>,
    quota_bytes: usize,
}

impl SessionRegistry {
    pub fn new(config: &SessionConfig) -> Self {
        let sessions = Cache::builder()
            .max_capacity(config.max_sessions)
            .time_to_idle(Duration::from_secs(config.idle_timeout_secs))
            .build();

        Self {
            sessions,
            quota_bytes: config.quota_bytes,
        }
    }

    /// Look up an existing session; unknown or malformed ids yield `None`.
    pub fn get(&self, id: &str) -> Option<BrowserSession> {
        if Uuid::parse_str(id).is_err() {
            trace!("Rejected malformed session id");
            return None;
        }

        self.sessions.get(id).map(|storage| BrowserSession {
            id: id.to_string(),
            storage,
            is_new: false,
        })
    }

    /// Start a new, empty session.
    ///
    /// The session is not registered until [`admit`](Self::admit) is called,
    /// so requests that never store anything leave no trace in the registry.
    pub fn create(&self) -> BrowserSession {
        BrowserSession {
            id: Uuid::new_v4().to_string(),
            storage: Arc::new(MemorySessionStorage::new(self.quota_bytes)),
            is_new: true,
        }
    }

    /// Register a session created by [`create`](Self::create)
    pub fn admit(&self, session: &BrowserSession) {
        self.sessions
            .insert(session.id.clone(), session.storage.clone());
        debug!("Admitted session {} ({} live)", session.id, self.len());
    }

    /// Resolve the session named by a cookie value, or start a new one
    pub fn resolve(&self, cookie_value: Option<&str>) -> BrowserSession {
        cookie_value
            .and_then(|id| self.get(id))
            .unwrap_or_else(|| self.create())
    }

    /// Number of live sessions (after pending evictions are applied)
    pub fn len(&self) -> u64 {
        self.sessions.run_pending_tasks();
        self.sessions.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
