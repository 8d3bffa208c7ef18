//! Statistics view data
//!
//! Listing rows, summary counts and deletion for the session's records.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::errors::{Result, SessionlinkerError};
use crate::storage::{ActionKind, ActionLog, LinkStatus, RecordStore, UrlRecord};
use crate::utils::truncate_url;

/// One listing row
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStats {
    #[serde(flatten)]
    pub record: UrlRecord,
    /// Destination elided for display
    pub display_url: String,
    pub status: LinkStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSummary {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
    pub total_clicks: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    pub links: Vec<LinkStats>,
    pub summary: StatisticsSummary,
}

/// Build the listing in stored order, with status computed against `now`
pub fn list(store: &RecordStore, now: DateTime<Utc>, truncate_length: usize) -> Statistics {
    let mut summary = StatisticsSummary::default();

    let links: Vec<LinkStats> = store
        .load()
        .into_iter()
        .map(|record| {
            let status = record.status(now);
            summary.total += 1;
            summary.total_clicks += record.clicks;
            match status {
                LinkStatus::Active => summary.active += 1,
                LinkStatus::Expired => summary.expired += 1,
            }

            LinkStats {
                display_url: truncate_url(&record.original_url, truncate_length),
                status,
                record,
            }
        })
        .collect();

    Statistics { links, summary }
}

/// Delete the record with `shortcode`
pub fn delete(store: &RecordStore, log: &dyn ActionLog, shortcode: &str) -> Result<()> {
    if !store.remove(shortcode)? {
        return Err(SessionlinkerError::not_found(format!(
            "Short code not found: {}",
            shortcode
        )));
    }

    log.record(ActionKind::DeleteUrl, Some(json!({ "shortcode": shortcode })));
    info!("Deleted short code {}", shortcode);
    Ok(())
}
