use serde::{Deserialize, Serialize};

use crate::services::{LinkStats, RejectedRow, StatisticsSummary};
use crate::storage::UrlRecord;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// One row of a batch shorten request
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRowRequest {
    pub original_url: String,
    /// Falls back to `shortener.default_validity_minutes`
    pub validity_minutes: Option<i64>,
    pub custom_code: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ShortenRequest {
    pub rows: Vec<ShortenRowRequest>,
}

/// A record together with its absolute short link
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    #[serde(flatten)]
    pub record: UrlRecord,
    pub short_link: String,
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LinkStatsResponse {
    #[serde(flatten)]
    pub stats: LinkStats,
    pub short_link: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct ListLinksResponse {
    pub links: Vec<LinkStatsResponse>,
    pub summary: StatisticsSummary,
}

#[derive(Serialize, Clone, Debug)]
pub struct ShortenResponse {
    pub created: Vec<LinkResponse>,
    pub rejected: Vec<RejectedRow>,
}
