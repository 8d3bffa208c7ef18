//! Session middleware
//!
//! 为每个请求解析（或新建）浏览器会话，并生成唯一的 request id。
//! 会话放进 request extensions，两者都记录在 tracing span 中。
//! 新会话只有在处理过程中写入了数据才会注册并通过 cookie 下发。

use std::rc::Rc;
use std::sync::Arc;

use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    cookie::{Cookie, SameSite},
    dev::{Payload, ServiceRequest, ServiceResponse},
    http::header::{HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, info_span, warn};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::storage::{BrowserSession, SessionRegistry};

/// Session cookie without `Max-Age`/`Expires`: the browser drops it when the
/// browsing session ends.
fn session_cookie(name: &str, id: &str, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(name.to_string(), id.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(secure);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

/// Session 中间件工厂
#[derive(Clone)]
pub struct SessionMiddleware {
    registry: Arc<SessionRegistry>,
    cookie_name: String,
    cookie_secure: bool,
}

impl SessionMiddleware {
    pub fn new(registry: Arc<SessionRegistry>, config: &SessionConfig) -> Self {
        Self {
            registry,
            cookie_name: config.cookie_name.clone(),
            cookie_secure: config.cookie_secure,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionService {
            service: Rc::new(service),
            registry: self.registry.clone(),
            cookie_name: self.cookie_name.clone(),
            cookie_secure: self.cookie_secure,
        }))
    }
}

pub struct SessionService<S> {
    service: Rc<S>,
    registry: Arc<SessionRegistry>,
    cookie_name: String,
    cookie_secure: bool,
}

impl<S, B> Service<ServiceRequest> for SessionService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let registry = self.registry.clone();
        let cookie_name = self.cookie_name.clone();
        let cookie_secure = self.cookie_secure;

        let cookie_value = req
            .cookie(&self.cookie_name)
            .map(|cookie| cookie.value().to_string());
        let session = registry.resolve(cookie_value.as_deref());
        let request_id = Uuid::new_v4().to_string();

        req.extensions_mut().insert(session.clone());

        let span = info_span!(
            "request",
            request_id = %request_id,
            session_id = %session.id,
            method = %req.method(),
            path = %req.path(),
        );

        Box::pin(
            async move {
                let mut response = srv.call(req).await?;

                // 只读请求不会留下会话
                if session.is_new && session.storage.used_bytes() > 0 {
                    registry.admit(&session);
                    let cookie = session_cookie(&cookie_name, &session.id, cookie_secure);
                    if let Err(e) = response.response_mut().add_cookie(&cookie) {
                        warn!("Failed to attach session cookie: {}", e);
                    }
                }

                if let Ok(header_value) = HeaderValue::from_str(&request_id) {
                    response
                        .headers_mut()
                        .insert(HeaderName::from_static("x-request-id"), header_value);
                }

                Ok(response)
            }
            .instrument(span),
        )
    }
}

/// Handlers take the session straight from the extractor list
impl FromRequest for BrowserSession {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<BrowserSession>()
                .cloned()
                .ok_or_else(|| {
                    actix_web::error::ErrorInternalServerError("Session middleware not installed")
                }),
        )
    }
}
