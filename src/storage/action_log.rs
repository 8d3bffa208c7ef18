//! Append-only action log
//!
//! Fire-and-forget diagnostic writes. Nothing in the application reads the
//! log back; failures are logged and swallowed.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

use super::models::{ActionKind, ActionLogEntry};
use super::session::SessionStorage;
use crate::errors::SessionlinkerError;

/// Session key holding the action log
pub const ACTION_LOG_KEY: &str = "urlShortenerLogs";

pub trait ActionLog: Send + Sync {
    fn record(&self, action: ActionKind, data: Option<Value>);
}

/// Writes entries into the session's storage
pub struct SessionActionLog {
    storage: Arc<dyn SessionStorage>,
}

impl SessionActionLog {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }
}

impl ActionLog for SessionActionLog {
    fn record(&self, action: ActionKind, data: Option<Value>) {
        debug!(action = action.as_ref(), "Session action");

        let mut entries: Vec<Value> = self
            .storage
            .get_item(ACTION_LOG_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();

        let entry = ActionLogEntry {
            timestamp: Utc::now(),
            action: action.to_string(),
            data,
        };
        match serde_json::to_value(&entry) {
            Ok(value) => entries.push(value),
            Err(e) => {
                warn!("Failed to encode action log entry: {}", e);
                return;
            }
        }

        let result = serde_json::to_string(&entries)
            .map_err(SessionlinkerError::from)
            .and_then(|json| self.storage.set_item(ACTION_LOG_KEY, json));
        if let Err(e) = result {
            warn!("Failed to append action log entry: {}", e);
        }
    }
}

/// Discards every entry
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopActionLog;

impl ActionLog for NoopActionLog {
    fn record(&self, _action: ActionKind, _data: Option<Value>) {}
}
