use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// A shortened URL stored in a browser session.
///
/// Serialized with camelCase keys (`originalUrl`, `shortcode`,
/// `validityMinutes`, `createdAt`, `expiryDate`, `clicks`) so the stored
/// text stays readable by the page scripts that share the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlRecord {
    pub id: String,
    pub original_url: String,
    pub shortcode: String,
    pub validity_minutes: i64,
    #[serde(with = "millis_rfc3339")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "millis_rfc3339")]
    pub expiry_date: DateTime<Utc>,
    #[serde(default)]
    pub clicks: u64,
}

impl UrlRecord {
    /// Build a fresh record; the expiry is fixed here and never recomputed.
    pub fn new(
        id: impl Into<String>,
        original_url: impl Into<String>,
        shortcode: impl Into<String>,
        validity_minutes: i64,
        now: DateTime<Utc>,
    ) -> Self {
        // 存储格式精确到毫秒，创建时即截断，保证读回后时间不变
        let created_at = now.trunc_subsecs(3);
        let expiry_date = TimeDelta::try_minutes(validity_minutes)
            .and_then(|validity| created_at.checked_add_signed(validity))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            id: id.into(),
            original_url: original_url.into(),
            shortcode: shortcode.into(),
            validity_minutes,
            created_at,
            expiry_date,
            clicks: 0,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expiry_date
    }

    pub fn status(&self, now: DateTime<Utc>) -> LinkStatus {
        if self.is_expired(now) {
            LinkStatus::Expired
        } else {
            LinkStatus::Active
        }
    }
}

/// Computed status shown in the statistics listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LinkStatus {
    Active,
    Expired,
}

/// Names written to the session action log
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    AddUrlRow,
    RemoveUrlRow,
    ShortenUrls,
    Redirect,
    DeleteUrl,
}

/// One entry of the append-only action log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLogEntry {
    #[serde(with = "millis_rfc3339")]
    pub timestamp: DateTime<Utc>,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// RFC 3339 with millisecond precision and a `Z` suffix,
/// e.g. `2024-05-01T10:00:00.000Z`
pub(crate) mod millis_rfc3339 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
