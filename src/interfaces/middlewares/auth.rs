use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, Method, Uri},
    web, Error, HttpMessage, HttpResponse,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{entities::token::Claims, AppState};

pub const LOGIN_URL: &str = "/accounts/login/";

/// Resolves the session cookie into `Claims` and keeps anonymous visitors
/// out of every route that is not explicitly public.
pub struct SessionMiddleware;

impl<S> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SessionMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct SessionMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if let Some(claims) = resolve_session(&req).await {
                req.extensions_mut().insert(claims);
                return service.call(req).await;
            }

            if is_public_route(req.path(), req.method()) {
                return service.call(req).await;
            }

            tracing::debug!(path = req.path(), "Anonymous request to a protected route");
            let response = HttpResponse::Found()
                .insert_header((header::LOCATION, login_redirect_url(req.uri())))
                .finish();
            Ok(req.into_response(response))
        })
    }
}

/// Reads, verifies and checks the deny-list for the session cookie.
/// Any failure just means "no session".
async fn resolve_session(req: &ServiceRequest) -> Option<Claims> {
    let state = req.app_data::<web::Data<AppState>>().cloned()?;
    let cookie = req.cookie(&state.session.cookie_name)?;
    let token = cookie.value();

    let claims = match state.auth_handler.verify_session(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("Ignoring session cookie: {}", e);
            return None;
        }
    };

    if let Err(e) = state.ensure_session_active(token).await {
        tracing::debug!("Ignoring session for {}: {}", claims.username, e);
        return None;
    }

    Some(claims)
}

fn is_public_route(path: &str, method: &Method) -> bool {
    let readonly = *method == Method::GET || *method == Method::HEAD;
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let is_id = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    match segments.as_slice() {
        [] => readonly,
        ["accounts", "login"] | ["accounts", "logout"] => true,
        ["blog"] | ["cv"] => readonly,
        ["blog", "post", id] => readonly && is_id(*id),
        ["blog", "post", id, "comment"] => is_id(*id),
        _ => false,
    }
}

/// `/accounts/login/?next=<path and query>`, with the slashes of `next` left readable.
pub fn login_redirect_url(uri: &Uri) -> String {
    let next = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    format!(
        "{}?next={}",
        LOGIN_URL,
        urlencoding::encode(next).replace("%2F", "/")
    )
}
