use actix_web::{
    error::InternalError,
    http::header,
    FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use futures_util::future::{ready, Ready};

use crate::entities::token::Claims;
use crate::middlewares::auth::login_redirect_url;

/// Claims of the logged-in user.
/// Requests without a session are sent to the login page.
/// Usage: Add `session: SessionUser` as a parameter to your handler function.
#[derive(Debug)]
pub struct SessionUser(pub Claims);

impl FromRequest for SessionUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(SessionUser(claims.clone()))),
            None => {
                let location = login_redirect_url(req.uri());
                let response = HttpResponse::Found()
                    .insert_header((header::LOCATION, location))
                    .finish();
                ready(Err(InternalError::from_response("login required", response).into()))
            }
        }
    }
}

/// Claims when a session is present, for pages that render differently
/// for the owner but stay public.
#[derive(Debug)]
pub struct OptionalSession(pub Option<Claims>);

impl OptionalSession {
    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

impl FromRequest for OptionalSession {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(OptionalSession(req.extensions().get::<Claims>().cloned())))
    }
}
