use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use tera::Context;
use tracing::{debug, instrument};

use crate::api::templates::PageRenderer;
use crate::config::get_config;
use crate::services::{RedirectOutcome, resolve};
use crate::storage::BrowserSession;

use super::helpers::{render_error, render_page};

pub struct RedirectService {}

impl RedirectService {
    /// GET /s/{code}
    #[instrument(skip_all, fields(code = %path))]
    pub async fn handle_redirect(
        path: web::Path<String>,
        session: BrowserSession,
        renderer: web::Data<PageRenderer>,
    ) -> impl Responder {
        let code = path.into_inner();
        let outcome = resolve(
            &session.records(),
            &session.action_log(),
            &code,
            Utc::now(),
        );

        match outcome {
            RedirectOutcome::Redirecting(record) => {
                debug!("Redirecting {} -> {}", code, record.original_url);
                let mut context = Context::new();
                context.insert("shortcode", &record.shortcode);
                context.insert("destination", &record.original_url);
                context.insert("clicks", &record.clicks);
                context.insert("delay_secs", &get_config().ui.redirect_delay_secs);
                render_page(&renderer, StatusCode::OK, "redirect.html", &context)
            }
            RedirectOutcome::NotFound => Self::not_found_response(&renderer, &code),
            RedirectOutcome::Expired(record) => render_error(
                &renderer,
                StatusCode::GONE,
                "Link expired",
                &format!(
                    "The short link \"{}\" expired on {}.",
                    record.shortcode,
                    record.expiry_date.format("%Y-%m-%d %H:%M:%S UTC")
                ),
            ),
        }
    }

    fn not_found_response(renderer: &PageRenderer, code: &str) -> HttpResponse {
        render_error(
            renderer,
            StatusCode::NOT_FOUND,
            "Link not found",
            &format!("The short link \"{}\" does not exist in this session.", code),
        )
    }
}

/// 重定向路由 `/s/{code}`
pub fn redirect_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/s/{code}", web::get().to(RedirectService::handle_redirect));
}
