//! JSON API 链接操作

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, Result as ActixResult, web};
use chrono::Utc;
use tracing::{info, trace};

use crate::api::services::helpers::{short_link, short_link_base};
use crate::config::get_config;
use crate::errors::SessionlinkerError;
use crate::services::{InputRow, ShortenForm, resolve_link, statistics};
use crate::storage::{BrowserSession, UrlRecord};

use super::error_code::ErrorCode;
use super::helpers::{error_from_sessionlinker, error_response, json_response, success_response};
use super::types::{
    LinkResponse, LinkStatsResponse, ListLinksResponse, ShortenRequest, ShortenResponse,
};

/// 获取当前会话的所有链接及汇总
pub async fn list_links(
    req: HttpRequest,
    session: BrowserSession,
) -> ActixResult<impl Responder> {
    let config = get_config();
    let base = short_link_base(&req);

    let stats = statistics::list(&session.records(), Utc::now(), config.ui.truncate_length);
    trace!("API: listing {} links", stats.links.len());

    let links = stats
        .links
        .into_iter()
        .map(|stats| LinkStatsResponse {
            short_link: short_link(&base, &stats.record.shortcode),
            stats,
        })
        .collect();

    Ok(success_response(ListLinksResponse {
        links,
        summary: stats.summary,
    }))
}

/// 批量创建短链接（1 到 max_rows 行）
pub async fn shorten_links(
    req: HttpRequest,
    session: BrowserSession,
    body: web::Json<ShortenRequest>,
) -> ActixResult<impl Responder> {
    let config = get_config();
    let limits = config.shortener.clone();
    let request = body.into_inner();

    if request.rows.is_empty() {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            "At least one row is required",
        ));
    }
    if request.rows.len() > limits.max_rows {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BatchSizeTooLarge,
            &format!("At most {} rows per request", limits.max_rows),
        ));
    }

    let rows = request
        .rows
        .into_iter()
        .map(|row| InputRow {
            original_url: row.original_url,
            validity_minutes: row
                .validity_minutes
                .unwrap_or(limits.default_validity_minutes),
            custom_code: row.custom_code.unwrap_or_default(),
            ..InputRow::blank(limits.default_validity_minutes)
        })
        .collect();

    let mut form = ShortenForm::from_rows(rows, limits);
    let store = session.records();
    let log = session.action_log();

    match form.submit(&store, &log, Utc::now()) {
        Ok(outcome) => {
            let base = short_link_base(&req);
            info!("API: created {} links", outcome.created.len());
            Ok(json_response(
                StatusCode::OK,
                ErrorCode::Success,
                outcome.message,
                Some(ShortenResponse {
                    created: outcome
                        .created
                        .into_iter()
                        .map(|record| link_response(&base, record))
                        .collect(),
                    rejected: outcome.rejected,
                }),
            ))
        }
        Err(SessionlinkerError::Validation(message)) => {
            // 逐行错误一并返回，方便调用方定位
            let rejected: Vec<_> = form
                .rows()
                .iter()
                .filter_map(|row| {
                    row.error.as_ref().map(|reason| {
                        serde_json::json!({
                            "rowId": row.id,
                            "originalUrl": row.original_url,
                            "reason": reason,
                        })
                    })
                })
                .collect();
            Ok(json_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::LinkValidationFailed,
                message,
                Some(serde_json::json!({ "rejected": rejected })),
            ))
        }
        Err(e) => Ok(error_from_sessionlinker(&e)),
    }
}

/// 解析短链接（与 `/s/{code}` 相同，会计一次点击）
pub async fn resolve_code(
    req: HttpRequest,
    session: BrowserSession,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let code = path.into_inner();

    let response: HttpResponse =
        match resolve_link(&session.records(), &session.action_log(), &code, Utc::now()) {
            Ok(record) => success_response(link_response(&short_link_base(&req), record)),
            Err(e) => error_from_sessionlinker(&e),
        };
    Ok(response)
}

/// 删除短链接
pub async fn delete_link(
    session: BrowserSession,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let code = path.into_inner();

    let response: HttpResponse =
        match statistics::delete(&session.records(), &session.action_log(), &code) {
            Ok(()) => success_response(serde_json::json!({ "shortcode": code })),
            Err(e) => error_from_sessionlinker(&e),
        };
    Ok(response)
}

/// `/api/links` 下未匹配的路径
pub async fn api_not_found() -> impl Responder {
    error_response(
        StatusCode::NOT_FOUND,
        ErrorCode::NotFound,
        "No such API endpoint",
    )
}

fn link_response(base: &str, record: UrlRecord) -> LinkResponse {
    LinkResponse {
        short_link: short_link(base, &record.shortcode),
        record,
    }
}
