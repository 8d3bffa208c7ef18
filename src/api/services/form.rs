//! Shortening form page
//!
//! The form is server-rendered: every button posts the whole form back with
//! an `action` field, and the page is re-rendered from the posted rows.

use std::collections::HashMap;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use chrono::Utc;
use serde::Serialize;
use tera::Context;
use tracing::{debug, error, trace};

use crate::api::templates::PageRenderer;
use crate::config::{ShortenerConfig, get_config};
use crate::errors::SessionlinkerError;
use crate::services::{InputRow, RejectedRow, ShortenForm, parse_validity};
use crate::storage::{BrowserSession, UrlRecord};

use super::helpers::{render_error, render_page, short_link, short_link_base};

/// Button pressed on the form
#[derive(Debug, Clone, PartialEq, Eq)]
enum FormAction {
    Add,
    Remove(String),
    Shorten,
}

impl FormAction {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("add") => FormAction::Add,
            Some(action) => match action.strip_prefix("remove:") {
                Some(id) => FormAction::Remove(id.to_string()),
                None => FormAction::Shorten,
            },
            None => FormAction::Shorten,
        }
    }
}

/// A freshly created link shown under the form
#[derive(Debug, Serialize)]
struct CreatedLink {
    shortcode: String,
    original_url: String,
    short_link: String,
    expiry_date: String,
}

impl CreatedLink {
    fn new(base: &str, record: &UrlRecord) -> Self {
        Self {
            shortcode: record.shortcode.clone(),
            original_url: record.original_url.clone(),
            short_link: short_link(base, &record.shortcode),
            expiry_date: record.expiry_date.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        }
    }
}

#[derive(Default)]
struct FormFeedback {
    message: Option<String>,
    error: Option<String>,
    created: Vec<CreatedLink>,
    rejected: Vec<RejectedRow>,
}

pub struct FormService;

impl FormService {
    /// GET / - one blank row
    pub async fn show_form(renderer: web::Data<PageRenderer>) -> impl Responder {
        let form = ShortenForm::new(get_config().shortener.clone());
        Self::render(&renderer, &form, FormFeedback::default())
    }

    /// POST / - add row, remove row or shorten
    pub async fn handle_action(
        req: HttpRequest,
        session: BrowserSession,
        renderer: web::Data<PageRenderer>,
        fields: web::Form<HashMap<String, String>>,
    ) -> impl Responder {
        let limits = get_config().shortener.clone();
        let fields = fields.into_inner();
        let action = FormAction::parse(fields.get("action").map(String::as_str));
        trace!("Form action: {:?}", action);

        let rows = parse_rows(&fields, &limits);
        let mut form = ShortenForm::from_rows(rows, limits);
        let store = session.records();
        let log = session.action_log();

        let feedback = match action {
            FormAction::Add => {
                form.add_row(&log);
                form.refresh_errors(&store.load());
                FormFeedback::default()
            }
            FormAction::Remove(id) => {
                form.remove_row(&id, &log);
                form.refresh_errors(&store.load());
                FormFeedback::default()
            }
            FormAction::Shorten => match form.submit(&store, &log, Utc::now()) {
                Ok(outcome) => {
                    let base = short_link_base(&req);
                    FormFeedback {
                        message: Some(outcome.message),
                        created: outcome
                            .created
                            .iter()
                            .map(|record| CreatedLink::new(&base, record))
                            .collect(),
                        rejected: outcome.rejected,
                        ..FormFeedback::default()
                    }
                }
                Err(SessionlinkerError::Validation(message)) => {
                    debug!("Form submit refused: {}", message);
                    FormFeedback {
                        error: Some(message),
                        ..FormFeedback::default()
                    }
                }
                Err(e) => {
                    error!("Form submit failed: {}", e);
                    return render_error(
                        &renderer,
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Could not save your links",
                        e.message(),
                    );
                }
            },
        };

        Self::render(&renderer, &form, feedback)
    }

    fn render(renderer: &PageRenderer, form: &ShortenForm, feedback: FormFeedback) -> HttpResponse {
        let mut context = Context::new();
        context.insert("rows", form.rows());
        context.insert("can_add_row", &form.can_add_row());
        context.insert("can_remove_row", &form.can_remove_row());
        context.insert("can_submit", &form.can_submit());
        context.insert("max_rows", &get_config().shortener.max_rows);
        context.insert("message", &feedback.message);
        context.insert("error", &feedback.error);
        context.insert("created", &feedback.created);
        context.insert("rejected", &feedback.rejected);
        render_page(renderer, StatusCode::OK, "index.html", &context)
    }
}

/// Rebuild input rows from fields posted as `id_<i>`, `url_<i>`,
/// `minutes_<i>` and `code_<i>`, ordered by index.
fn parse_rows(fields: &HashMap<String, String>, limits: &ShortenerConfig) -> Vec<InputRow> {
    let mut indices: Vec<usize> = fields
        .keys()
        .filter_map(|key| key.strip_prefix("id_"))
        .filter_map(|index| index.parse().ok())
        .collect();
    indices.sort_unstable();
    indices.dedup();

    indices
        .into_iter()
        .map(|i| {
            let field = |name: &str| fields.get(&format!("{}_{}", name, i)).cloned();
            let blank = InputRow::blank(limits.default_validity_minutes);

            InputRow {
                id: field("id")
                    .filter(|id| !id.trim().is_empty())
                    .unwrap_or(blank.id),
                original_url: field("url").unwrap_or_default(),
                validity_minutes: field("minutes")
                    .map(|text| parse_validity(&text, limits.default_validity_minutes))
                    .unwrap_or(limits.default_validity_minutes),
                custom_code: field("code").unwrap_or_default(),
                error: None,
            }
        })
        .collect()
}

/// 表单路由 `/`
pub fn form_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .route(web::get().to(FormService::show_form))
            .route(web::post().to(FormService::handle_action)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!(FormAction::parse(Some("add")), FormAction::Add);
        assert_eq!(
            FormAction::parse(Some("remove:abc")),
            FormAction::Remove("abc".to_string())
        );
        assert_eq!(FormAction::parse(Some("shorten")), FormAction::Shorten);
        assert_eq!(FormAction::parse(None), FormAction::Shorten);
    }

    #[test]
    fn test_rows_are_ordered_by_index() {
        let posted = fields(&[
            ("id_10", "r10"),
            ("url_10", "https://ten.example"),
            ("id_2", "r2"),
            ("url_2", "https://two.example"),
            ("minutes_2", "15"),
            ("code_2", "two"),
        ]);
        let rows = parse_rows(&posted, &ShortenerConfig::default());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "r2");
        assert_eq!(rows[0].validity_minutes, 15);
        assert_eq!(rows[0].custom_code, "two");
        assert_eq!(rows[1].id, "r10");
        assert_eq!(rows[1].validity_minutes, 30);
    }

    #[test]
    fn test_missing_row_id_gets_fresh_one() {
        let posted = fields(&[("id_0", ""), ("url_0", "https://example.org"), ("minutes_0", "x")]);
        let rows = parse_rows(&posted, &ShortenerConfig::default());
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].id.is_empty());
        assert_eq!(rows[0].validity_minutes, 30);
    }
}
