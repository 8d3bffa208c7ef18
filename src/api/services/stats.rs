//! Statistics page

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use chrono::Utc;
use serde::Serialize;
use tera::Context;
use tracing::{error, trace};

use crate::api::templates::PageRenderer;
use crate::config::get_config;
use crate::errors::SessionlinkerError;
use crate::services::{LinkStats, statistics};
use crate::storage::{BrowserSession, LinkStatus};

use super::helpers::{render_error, render_page, short_link, short_link_base};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

#[derive(Debug, Serialize)]
struct StatsRow {
    shortcode: String,
    original_url: String,
    display_url: String,
    short_link: String,
    clicks: u64,
    created_at: String,
    expiry_date: String,
    status: LinkStatus,
}

impl StatsRow {
    fn new(base: &str, stats: LinkStats) -> Self {
        let record = stats.record;
        Self {
            short_link: short_link(base, &record.shortcode),
            created_at: record.created_at.format(DATE_FORMAT).to_string(),
            expiry_date: record.expiry_date.format(DATE_FORMAT).to_string(),
            clicks: record.clicks,
            shortcode: record.shortcode,
            original_url: record.original_url,
            display_url: stats.display_url,
            status: stats.status,
        }
    }
}

pub struct StatsService;

impl StatsService {
    /// GET /stats
    pub async fn show_stats(
        req: HttpRequest,
        session: BrowserSession,
        renderer: web::Data<PageRenderer>,
    ) -> impl Responder {
        let config = get_config();
        let stats = statistics::list(&session.records(), Utc::now(), config.ui.truncate_length);
        trace!("Rendering statistics for {} links", stats.links.len());

        let base = short_link_base(&req);
        let rows: Vec<StatsRow> = stats
            .links
            .into_iter()
            .map(|link| StatsRow::new(&base, link))
            .collect();

        let mut context = Context::new();
        context.insert("links", &rows);
        context.insert("summary", &stats.summary);
        context.insert("refresh_secs", &config.ui.stats_refresh_secs);
        render_page(&renderer, StatusCode::OK, "stats.html", &context)
    }

    /// POST /stats/{code}/delete
    pub async fn delete_link(
        path: web::Path<String>,
        session: BrowserSession,
        renderer: web::Data<PageRenderer>,
    ) -> impl Responder {
        let code = path.into_inner();

        match statistics::delete(&session.records(), &session.action_log(), &code) {
            Ok(()) => HttpResponse::SeeOther()
                .insert_header(("Location", "/stats"))
                .finish(),
            Err(e @ SessionlinkerError::NotFound(_)) => render_error(
                &renderer,
                StatusCode::NOT_FOUND,
                "Link not found",
                e.message(),
            ),
            Err(e) => {
                error!("Failed to delete {}: {}", code, e);
                render_error(
                    &renderer,
                    e.http_status(),
                    "Could not delete link",
                    e.message(),
                )
            }
        }
    }
}

/// 统计路由 `/stats`
pub fn stats_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/stats", web::get().to(StatsService::show_stats))
        .route("/stats/{code}/delete", web::post().to(StatsService::delete_link));
}
