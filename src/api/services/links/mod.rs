//! JSON API 服务模块
//!
//! 与页面共享同一个会话存储：
//! - GET /api/links - 统计列表
//! - POST /api/links - 批量缩短
//! - GET /api/links/{code} - 解析（计一次点击）
//! - DELETE /api/links/{code} - 删除

pub mod error_code;
mod handlers;
mod helpers;
mod types;

use actix_web::web;

pub use error_code::ErrorCode;
pub use handlers::{api_not_found, delete_link, list_links, resolve_code, shorten_links};
pub use helpers::{error_from_sessionlinker, error_response, success_response};
pub use types::*;

/// 链接 API 路由 `/api/links`
pub fn links_api_routes() -> actix_web::Scope {
    web::scope("/api/links")
        .route("", web::get().to(list_links))
        .route("", web::post().to(shorten_links))
        .route("/{code}", web::get().to(resolve_code))
        .route("/{code}", web::delete().to(delete_link))
        .default_service(web::to(api_not_found))
}
