//! Page tests
//!
//! Drive the server-rendered pages end to end: form, redirect, statistics.

use std::sync::Arc;

use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use chrono::{Duration, Utc};
use serde_json::Value;

use sessionlinker::api::middleware::SessionMiddleware;
use sessionlinker::api::{PageRenderer, configure_routes};
use sessionlinker::config::{SessionConfig, get_config};
use sessionlinker::storage::{SessionRegistry, SessionStorage, UrlRecord};

// =============================================================================
// Test Setup
// =============================================================================

const COOKIE_NAME: &str = "sl_session";

fn registry() -> Arc<SessionRegistry> {
    Arc::new(SessionRegistry::new(&get_config().session))
}

macro_rules! init_app {
    ($registry:expr) => {
        test::init_service(
            App::new()
                .wrap(SessionMiddleware::new($registry.clone(), &get_config().session))
                .app_data(web::Data::new(PageRenderer::new().unwrap()))
                .configure(configure_routes),
        )
        .await
    };
}

fn session_cookie<B>(resp: &ServiceResponse<B>) -> Cookie<'static> {
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == COOKIE_NAME)
        .expect("session cookie should be set");
    Cookie::new(COOKIE_NAME, cookie.value().to_string())
}

async fn body_text<B: actix_web::body::MessageBody>(resp: ServiceResponse<B>) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn row_fields(action: &str, rows: &[(&str, &str, &str)]) -> Vec<(String, String)> {
    let mut fields = vec![("action".to_string(), action.to_string())];
    for (i, (url, minutes, code)) in rows.iter().enumerate() {
        fields.push((format!("id_{}", i), format!("row-{}", i)));
        fields.push((format!("url_{}", i), url.to_string()));
        fields.push((format!("minutes_{}", i), minutes.to_string()));
        fields.push((format!("code_{}", i), code.to_string()));
    }
    fields
}

// =============================================================================
// Shortening form
// =============================================================================

#[actix_rt::test]
async fn test_form_starts_with_one_row() {
    let registry = registry();
    let app = init_app!(registry);

    let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    // 只读请求不创建会话
    assert!(resp.response().cookies().next().is_none());
    assert!(registry.is_empty());

    let html = body_text(resp).await;
    assert!(html.contains(r#"name="url_0""#));
    assert!(!html.contains(r#"name="url_1""#));
}

#[actix_rt::test]
async fn test_session_cookie_lives_for_the_browser_session() {
    let registry = registry();
    let app = init_app!(registry);

    let req = TestRequest::post()
        .uri("/")
        .set_form(row_fields("add", &[("", "30", "")]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == COOKIE_NAME)
        .expect("session cookie should be set");

    // 没有 Max-Age/Expires，浏览器关闭即丢弃
    assert!(cookie.max_age().is_none());
    assert!(cookie.expires().is_none());
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(cookie.path(), Some("/"));
    assert!(registry.get(cookie.value()).is_some());
}

#[actix_rt::test]
async fn test_known_session_cookie_is_not_reissued() {
    let registry = registry();
    let app = init_app!(registry);

    let req = TestRequest::post()
        .uri("/")
        .set_form(row_fields("add", &[("", "30", "")]))
        .to_request();
    let first = test::call_service(&app, req).await;
    let cookie = session_cookie(&first);

    let second = test::call_service(
        &app,
        TestRequest::get().uri("/stats").cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(second.status(), StatusCode::OK);
    assert!(second.response().cookies().next().is_none());
}

#[actix_rt::test]
async fn test_cookieless_requests_do_not_fill_registry() {
    let registry = Arc::new(SessionRegistry::new(&SessionConfig {
        max_sessions: 50,
        ..SessionConfig::default()
    }));
    let app = init_app!(registry);
    let session = registry.create();
    session
        .records()
        .save(&[UrlRecord::new("1", "https://example.org", "mine", 30, Utc::now())])
        .unwrap();
    registry.admit(&session);

    for _ in 0..500 {
        let req = TestRequest::get().uri("/favicon.ico").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
    assert_eq!(registry.len(), 1);

    let req = TestRequest::get()
        .uri("/s/mine")
        .cookie(Cookie::new(COOKIE_NAME, session.id.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_sixth_row_is_refused() {
    let registry = registry();
    let app = init_app!(registry);

    let five = [("", "30", ""); 5];
    let req = TestRequest::post()
        .uri("/")
        .set_form(row_fields("add", &five))
        .to_request();
    let html = body_text(test::call_service(&app, req).await).await;

    assert!(html.contains(r#"name="url_4""#));
    assert!(!html.contains(r#"name="url_5""#));
}

#[actix_rt::test]
async fn test_add_and_remove_rows() {
    let registry = registry();
    let app = init_app!(registry);

    let req = TestRequest::post()
        .uri("/")
        .set_form(row_fields("add", &[("https://example.org", "30", "")]))
        .to_request();
    let html = body_text(test::call_service(&app, req).await).await;
    assert!(html.contains(r#"name="url_1""#));

    let req = TestRequest::post()
        .uri("/")
        .set_form(row_fields(
            "remove:row-1",
            &[("https://one.example", "30", ""), ("https://two.example", "30", "")],
        ))
        .to_request();
    let html = body_text(test::call_service(&app, req).await).await;
    assert!(html.contains("row-0"));
    assert!(!html.contains(r#"value="row-1""#));
}

#[actix_rt::test]
async fn test_shorten_reports_success_and_stores_record() {
    let registry = registry();
    let app = init_app!(registry);

    let req = TestRequest::post()
        .uri("/")
        .set_form(row_fields("shorten", &[("https://example.org", "1", "")]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cookie = session_cookie(&resp);
    let html = body_text(resp).await;
    assert!(html.contains("Successfully shortened 1 URL(s)"));

    let session = registry.get(cookie.value()).unwrap();
    let records = session.records().load();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].shortcode.len(), 6);
    assert!(records[0].shortcode.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(records[0].clicks, 0);
    assert_eq!(
        records[0].expiry_date - records[0].created_at,
        Duration::minutes(1)
    );
    assert!(html.contains(&records[0].shortcode));
}

#[actix_rt::test]
async fn test_shorten_without_urls_is_refused() {
    let registry = registry();
    let app = init_app!(registry);

    let req = TestRequest::post()
        .uri("/")
        .set_form(row_fields("shorten", &[("", "30", "")]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.response().cookies().next().is_none());
    let html = body_text(resp).await;

    assert!(html.contains("Please enter at least one valid URL"));
    assert!(registry.is_empty());
}

#[actix_rt::test]
async fn test_duplicate_custom_code_is_rejected() {
    let registry = registry();
    let app = init_app!(registry);

    let req = TestRequest::post()
        .uri("/")
        .set_form(row_fields("shorten", &[("https://example.org", "30", "mycode")]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cookie = session_cookie(&resp);

    let req = TestRequest::post()
        .uri("/")
        .cookie(cookie.clone())
        .set_form(row_fields("shorten", &[("https://example.com", "30", "mycode")]))
        .to_request();
    let html = body_text(test::call_service(&app, req).await).await;

    assert!(html.contains("Shortcode already exists."));
    let records = registry.get(cookie.value()).unwrap().records().load();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].original_url, "https://example.org");
}

#[actix_rt::test]
async fn test_invalid_row_shows_inline_error() {
    let registry = registry();
    let app = init_app!(registry);

    let req = TestRequest::post()
        .uri("/")
        .set_form(row_fields("add", &[("not a url", "30", "")]))
        .to_request();
    let html = body_text(test::call_service(&app, req).await).await;
    assert!(html.contains("Invalid URL format"));
}

// =============================================================================
// Redirect
// =============================================================================

#[actix_rt::test]
async fn test_redirect_counts_every_visit() {
    let registry = registry();
    let app = init_app!(registry);
    let session = registry.create();
    session
        .records()
        .save(&[UrlRecord::new("1", "https://example.org", "abc123", 30, Utc::now())])
        .unwrap();
    registry.admit(&session);
    let cookie = Cookie::new(COOKIE_NAME, session.id.clone());

    for _ in 0..2 {
        let req = TestRequest::get()
            .uri("/s/abc123")
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_text(resp).await;
        assert!(html.contains("Go Now"));
        assert!(html.contains(r#"http-equiv="refresh""#));
    }

    assert_eq!(session.records().find("abc123").unwrap().clicks, 2);
}

#[actix_rt::test]
async fn test_unknown_code_is_not_found() {
    let registry = registry();
    let app = init_app!(registry);

    let resp = test::call_service(&app, TestRequest::get().uri("/s/nothing").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let html = body_text(resp).await;
    assert!(html.contains("Link not found"));
}

#[actix_rt::test]
async fn test_expired_code_is_gone_and_not_counted() {
    let registry = registry();
    let app = init_app!(registry);
    let session = registry.create();
    session
        .records()
        .save(&[UrlRecord::new(
            "1",
            "https://example.org",
            "old",
            1,
            Utc::now() - Duration::minutes(10),
        )])
        .unwrap();
    registry.admit(&session);

    let req = TestRequest::get()
        .uri("/s/old")
        .cookie(Cookie::new(COOKIE_NAME, session.id.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::GONE);
    assert_eq!(session.records().find("old").unwrap().clicks, 0);
}

#[actix_rt::test]
async fn test_links_do_not_leak_between_sessions() {
    let registry = registry();
    let app = init_app!(registry);
    let session = registry.create();
    session
        .records()
        .save(&[UrlRecord::new("1", "https://example.org", "mine", 30, Utc::now())])
        .unwrap();
    registry.admit(&session);

    // 不带 cookie 的请求会得到一个全新的空会话
    let resp = test::call_service(&app, TestRequest::get().uri("/s/mine").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Statistics
// =============================================================================

#[actix_rt::test]
async fn test_stats_page_lists_links_and_refreshes() {
    let registry = registry();
    let app = init_app!(registry);
    let session = registry.create();
    let now = Utc::now();
    session
        .records()
        .save(&[
            UrlRecord::new("1", "https://example.org", "live", 30, now),
            UrlRecord::new("2", "https://example.com", "dead", 1, now - Duration::minutes(5)),
        ])
        .unwrap();
    registry.admit(&session);

    let req = TestRequest::get()
        .uri("/stats")
        .cookie(Cookie::new(COOKIE_NAME, session.id.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;

    assert!(html.contains(r#"http-equiv="refresh" content="5""#));
    assert!(html.contains("live"));
    assert!(html.contains("status-active"));
    assert!(html.contains("status-expired"));
    assert!(html.contains("Total: 2"));
}

#[actix_rt::test]
async fn test_delete_from_stats() {
    let registry = registry();
    let app = init_app!(registry);
    let session = registry.create();
    session
        .records()
        .save(&[UrlRecord::new("1", "https://example.org", "gone", 30, Utc::now())])
        .unwrap();
    registry.admit(&session);
    let cookie = Cookie::new(COOKIE_NAME, session.id.clone());

    let req = TestRequest::post()
        .uri("/stats/gone/delete")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get("Location").unwrap(), "/stats");
    assert!(session.records().load().is_empty());

    let req = TestRequest::post()
        .uri("/stats/gone/delete")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_unknown_path_renders_not_found_page() {
    let registry = registry();
    let app = init_app!(registry);

    let resp = test::call_service(&app, TestRequest::get().uri("/no/such/page").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let html = body_text(resp).await;
    assert!(html.contains("Back to the URL shortener"));
}

#[actix_rt::test]
async fn test_action_log_records_page_actions() {
    let registry = registry();
    let app = init_app!(registry);

    let req = TestRequest::post()
        .uri("/")
        .set_form(row_fields("shorten", &[("https://example.org", "30", "logged")]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cookie = session_cookie(&resp);

    let req = TestRequest::get()
        .uri("/s/logged")
        .cookie(cookie.clone())
        .to_request();
    test::call_service(&app, req).await;

    let session = registry.get(cookie.value()).unwrap();
    let raw = session.storage.get_item("urlShortenerLogs").unwrap();
    let entries: Vec<Value> = serde_json::from_str(&raw).unwrap();
    let actions: Vec<&str> = entries
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["SHORTEN_URLS", "REDIRECT"]);
}
