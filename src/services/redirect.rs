//! Redirect resolver

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, warn};

use crate::errors::{Result, SessionlinkerError};
use crate::storage::{ActionKind, ActionLog, RecordStore, UrlRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// Click counted; the page navigates to the record's destination
    Redirecting(UrlRecord),
    NotFound,
    Expired(UrlRecord),
}

/// Resolve `shortcode` within the session's store.
///
/// A live record has its click counter incremented and persisted before the
/// outcome is returned. Expired records are left untouched.
pub fn resolve(
    store: &RecordStore,
    log: &dyn ActionLog,
    shortcode: &str,
    now: DateTime<Utc>,
) -> RedirectOutcome {
    let mut records = store.load();

    let Some(index) = records.iter().position(|r| r.shortcode == shortcode) else {
        debug!("Short code not found: {}", shortcode);
        return RedirectOutcome::NotFound;
    };

    if records[index].is_expired(now) {
        debug!("Short code expired: {}", shortcode);
        return RedirectOutcome::Expired(records.swap_remove(index));
    }

    records[index].clicks += 1;
    // 保存失败时仍然跳转，只是本次点击不会被记录
    if let Err(e) = store.save(&records) {
        warn!("Failed to persist click for {}: {}", shortcode, e);
    }

    let record = records.swap_remove(index);
    log.record(
        ActionKind::Redirect,
        Some(json!({
            "shortcode": record.shortcode,
            "originalUrl": record.original_url,
        })),
    );

    RedirectOutcome::Redirecting(record)
}

/// [`resolve`] for callers that want a `Result`: unknown codes become
/// `NotFound`, expired ones `Expired`.
pub fn resolve_link(
    store: &RecordStore,
    log: &dyn ActionLog,
    shortcode: &str,
    now: DateTime<Utc>,
) -> Result<UrlRecord> {
    match resolve(store, log, shortcode, now) {
        RedirectOutcome::Redirecting(record) => Ok(record),
        RedirectOutcome::NotFound => Err(SessionlinkerError::not_found(format!(
            "Short code not found: {}",
            shortcode
        ))),
        RedirectOutcome::Expired(record) => Err(SessionlinkerError::expired(format!(
            "Short code {} expired at {}",
            record.shortcode,
            record.expiry_date.format("%Y-%m-%d %H:%M:%S UTC")
        ))),
    }
}
