//! Session-scoped persistence
//!
//! - `session`: key/value storage bound to one browser session
//! - `registry`: session id -> storage, with idle eviction
//! - `record_store`: the URL record list (`allUrls`)
//! - `action_log`: append-only diagnostics (`urlShortenerLogs`)

pub mod action_log;
pub mod models;
pub mod record_store;
pub mod registry;
pub mod session;

pub use action_log::{ACTION_LOG_KEY, ActionLog, NoopActionLog, SessionActionLog};
pub use models::{ActionKind, ActionLogEntry, LinkStatus, UrlRecord};
pub use record_store::{RECORDS_KEY, RecordStore};
pub use registry::{BrowserSession, SessionRegistry};
pub use session::{MemorySessionStorage, SessionStorage};
