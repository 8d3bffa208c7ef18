//! 页面与链接的公共帮助函数

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use tera::Context;

use crate::api::templates::PageRenderer;
use crate::config::get_config;

/// Origin used to build absolute short links.
///
/// `server.public_base_url` wins when set; otherwise the origin is taken from
/// the request (honouring `Forwarded`/`X-Forwarded-*`).
pub fn short_link_base(req: &HttpRequest) -> String {
    if let Some(base) = get_config().server.public_base_url.as_deref() {
        return base.trim_end_matches('/').to_string();
    }
    let info = req.connection_info();
    format!("{}://{}", info.scheme(), info.host())
}

pub fn short_link(base: &str, shortcode: &str) -> String {
    format!("{}/s/{}", base, shortcode)
}

/// Render `template` with `context`; a template failure becomes a bare 500
pub fn render_page(
    renderer: &PageRenderer,
    status: StatusCode,
    template: &str,
    context: &Context,
) -> HttpResponse {
    match renderer.render(template, context) {
        Ok(body) => HttpResponse::build(status)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .body(body),
        Err(_) => HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .body("Internal Server Error"),
    }
}

/// Error page with a link back to the form
pub fn render_error(
    renderer: &PageRenderer,
    status: StatusCode,
    title: &str,
    message: &str,
) -> HttpResponse {
    let mut context = Context::new();
    context.insert("title", title);
    context.insert("message", message);
    context.insert("status", &status.as_u16());
    render_page(renderer, status, "error.html", &context)
}
