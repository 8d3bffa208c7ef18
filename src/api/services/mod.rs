//! HTTP 服务
//!
//! 页面路由（表单、统计、重定向）与 JSON API 共用同一个会话存储。

pub mod form;
pub mod helpers;
pub mod links;
pub mod redirect;
pub mod stats;

use actix_web::http::StatusCode;
use actix_web::{Responder, web};

use crate::api::templates::PageRenderer;

pub use form::{FormService, form_routes};
pub use links::links_api_routes;
pub use redirect::{RedirectService, redirect_routes};
pub use stats::{StatsService, stats_routes};

/// Fallback for every unmatched path
pub async fn not_found(renderer: web::Data<PageRenderer>) -> impl Responder {
    helpers::render_error(
        &renderer,
        StatusCode::NOT_FOUND,
        "Page not found",
        "There is nothing at this address.",
    )
}

/// Register every route plus the not-found fallback
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(links_api_routes());
    form_routes(cfg);
    stats_routes(cfg);
    redirect_routes(cfg);
    cfg.default_service(web::to(not_found));
}
