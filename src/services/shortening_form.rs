//! Shortening form
//!
//! Holds the editable input rows (1 to `max_rows`) and turns the valid ones
//! into stored records on submit. Rows are processed independently: a row
//! that fails validation or code resolution does not block the others.

use std::collections::HashSet;
use std::num::IntErrorKind;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::validator::{ValidationError, validate_row};
use crate::config::ShortenerConfig;
use crate::errors::{Result, SessionlinkerError};
use crate::storage::{ActionKind, ActionLog, RecordStore, UrlRecord};
use crate::utils::generate_random_code;

pub const NO_VALID_URL_MESSAGE: &str = "Please enter at least one valid URL";

/// One editable row of the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRow {
    pub id: String,
    pub original_url: String,
    pub validity_minutes: i64,
    pub custom_code: String,
    pub error: Option<String>,
}

impl InputRow {
    pub fn blank(validity_minutes: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            original_url: String::new(),
            validity_minutes,
            custom_code: String::new(),
            error: None,
        }
    }

    /// Custom code if one was typed
    pub fn custom_code(&self) -> Option<&str> {
        let code = self.custom_code.trim();
        (!code.is_empty()).then_some(code)
    }

    pub fn has_url(&self) -> bool {
        !self.original_url.trim().is_empty()
    }
}

/// Field edited through [`ShortenForm::update_row`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowField {
    OriginalUrl(String),
    ValidityMinutes(i64),
    CustomCode(String),
}

/// Parse the validity input from its leading integer (`"1.5"` is 1, `"12m"`
/// is 12). Text without leading digits falls back to `default`; values past
/// the `i64` range saturate so the validator reports them as out of range.
pub fn parse_validity(text: &str, default: i64) -> i64 {
    let text = text.trim();
    let sign_len = usize::from(text.starts_with(['+', '-']));
    let digits_len = text[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return default;
    }

    match text[..sign_len + digits_len].parse::<i64>() {
        Ok(minutes) => minutes,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => default,
        },
    }
}

/// A row that was not turned into a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRow {
    pub row_id: String,
    pub original_url: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub created: Vec<UrlRecord>,
    pub rejected: Vec<RejectedRow>,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ShortenForm {
    rows: Vec<InputRow>,
    limits: ShortenerConfig,
}

impl ShortenForm {
    /// A form with a single blank row
    pub fn new(limits: ShortenerConfig) -> Self {
        let rows = vec![InputRow::blank(limits.default_validity_minutes)];
        Self { rows, limits }
    }

    /// Rebuild a form from posted rows, clamped to `1..=max_rows`
    pub fn from_rows(mut rows: Vec<InputRow>, limits: ShortenerConfig) -> Self {
        if rows.is_empty() {
            return Self::new(limits);
        }
        if rows.len() > limits.max_rows {
            warn!(
                "Dropping {} posted rows beyond the limit of {}",
                rows.len() - limits.max_rows,
                limits.max_rows
            );
            rows.truncate(limits.max_rows);
        }
        Self { rows, limits }
    }

    pub fn rows(&self) -> &[InputRow] {
        &self.rows
    }

    pub fn can_add_row(&self) -> bool {
        self.rows.len() < self.limits.max_rows
    }

    pub fn can_remove_row(&self) -> bool {
        self.rows.len() > 1
    }

    /// At least one row has URL text
    pub fn can_submit(&self) -> bool {
        self.rows.iter().any(InputRow::has_url)
    }

    /// Append a blank row; refused once the form is full
    pub fn add_row(&mut self, log: &dyn ActionLog) -> bool {
        if !self.can_add_row() {
            debug!("Row limit of {} reached", self.limits.max_rows);
            return false;
        }
        self.rows
            .push(InputRow::blank(self.limits.default_validity_minutes));
        log.record(ActionKind::AddUrlRow, None);
        true
    }

    /// Remove the row with `id`; the last remaining row is never removed
    pub fn remove_row(&mut self, id: &str, log: &dyn ActionLog) -> bool {
        if !self.can_remove_row() {
            return false;
        }
        let Some(index) = self.rows.iter().position(|row| row.id == id) else {
            return false;
        };
        self.rows.remove(index);
        log.record(ActionKind::RemoveUrlRow, Some(json!({ "id": id })));
        true
    }

    /// Change one field of a row and re-validate it
    pub fn update_row(&mut self, id: &str, field: RowField, existing: &[UrlRecord]) -> bool {
        let Some(row) = self.rows.iter_mut().find(|row| row.id == id) else {
            return false;
        };
        match field {
            RowField::OriginalUrl(url) => row.original_url = url,
            RowField::ValidityMinutes(minutes) => row.validity_minutes = minutes,
            RowField::CustomCode(code) => row.custom_code = code,
        }
        row.error = validate_row(row, existing, &self.limits)
            .err()
            .map(|e| e.to_string());
        true
    }

    /// Re-validate every row that has URL text; blank rows are left untouched
    pub fn refresh_errors(&mut self, existing: &[UrlRecord]) {
        for row in self.rows.iter_mut().filter(|row| row.has_url()) {
            row.error = validate_row(row, existing, &self.limits)
                .err()
                .map(|e| e.to_string());
        }
    }

    /// Persist every valid row as a new record.
    ///
    /// With no valid row the store is left untouched and a validation error
    /// is returned. On success the form is reset to one blank row.
    pub fn submit(
        &mut self,
        store: &RecordStore,
        log: &dyn ActionLog,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome> {
        let existing = store.load();
        self.refresh_errors(&existing);

        let mut taken: HashSet<String> = existing.iter().map(|r| r.shortcode.clone()).collect();
        let mut created = Vec::new();
        let mut rejected = Vec::new();

        for row in self.rows.iter_mut().filter(|row| row.has_url()) {
            if let Some(reason) = &row.error {
                rejected.push(RejectedRow::from_row(row, reason.clone()));
                continue;
            }

            let shortcode = match resolve_code(row, &taken, &self.limits) {
                Ok(code) => code,
                Err(reason) => {
                    rejected.push(RejectedRow::from_row(row, reason.clone()));
                    row.error = Some(reason);
                    continue;
                }
            };
            taken.insert(shortcode.clone());

            created.push(UrlRecord::new(
                Uuid::new_v4().to_string(),
                row.original_url.trim(),
                shortcode,
                row.validity_minutes,
                now,
            ));
        }

        if created.is_empty() {
            debug!("Submit refused: {} rows rejected", rejected.len());
            return Err(SessionlinkerError::validation(NO_VALID_URL_MESSAGE));
        }

        store.append(created.clone())?;
        log.record(
            ActionKind::ShortenUrls,
            Some(json!({ "count": created.len() })),
        );
        info!(
            "Shortened {} URLs, {} rows rejected",
            created.len(),
            rejected.len()
        );

        *self = Self::new(self.limits.clone());

        Ok(SubmitOutcome {
            message: format!("Successfully shortened {} URL(s)", created.len()),
            created,
            rejected,
        })
    }
}

/// Pick the row's short code: its custom code, or a generated one that
/// collides with nothing stored or already chosen in this batch.
fn resolve_code(
    row: &InputRow,
    taken: &HashSet<String>,
    limits: &ShortenerConfig,
) -> std::result::Result<String, String> {
    if let Some(code) = row.custom_code() {
        if taken.contains(code) {
            return Err(ValidationError::CodeTaken.to_string());
        }
        return Ok(code.to_string());
    }

    for _ in 0..limits.generate_attempts.max(1) {
        let code = generate_random_code(limits.code_length);
        if !taken.contains(&code) {
            return Ok(code);
        }
        debug!("Generated code {} collided, retrying", code);
    }

    warn!(
        "No unique code after {} attempts",
        limits.generate_attempts
    );
    Err("Could not generate a unique shortcode".to_string())
}

impl RejectedRow {
    fn from_row(row: &InputRow, reason: String) -> Self {
        Self {
            row_id: row.id.clone(),
            original_url: row.original_url.clone(),
            reason,
        }
    }
}
