use actix_web::{
    cookie::{time::Duration, Cookie, SameSite},
    http::header,
    web, HttpRequest, HttpResponse,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use crate::{
    entities::user::LoginForm,
    errors::{AppError, AuthError},
    handlers::responses::{ok_html, redirect, safe_next},
    templates::{accounts::login_page, layout::Page},
    use_cases::extractors::OptionalSession,
    AppState,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NextQuery {
    pub next: String,
}

fn session_cookie(state: &AppState, value: String, max_age_seconds: i64) -> Cookie<'static> {
    Cookie::build(state.session.cookie_name.clone(), value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.session.secure_cookie)
        .max_age(Duration::seconds(max_age_seconds))
        .finish()
}

#[instrument(skip_all)]
pub async fn login_form(
    query: web::Query<NextQuery>,
    session: OptionalSession,
    state: web::Data<AppState>,
) -> HttpResponse {
    if session.is_authenticated() {
        return redirect(safe_next(&query.next));
    }

    let page = Page::anonymous(&state.site);
    ok_html(login_page(&page, "", &query.next, false))
}

#[instrument(skip_all, fields(username = %form.username))]
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    state.throttle(&req, "login")?;

    match state.auth_handler.login(&form).await {
        Ok(session) => Ok(HttpResponse::Found()
            .cookie(session_cookie(&state, session.token, session.max_age_seconds))
            .insert_header((header::LOCATION, safe_next(&form.next)))
            .finish()),
        Err(AuthError::WrongCredentials) => {
            tracing::warn!("Rejected login attempt");
            let page = Page::anonymous(&state.site);
            Ok(ok_html(login_page(&page, &form.username, &form.next, true)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Clears the cookie and deny-lists the token for the rest of its lifetime.
#[instrument(skip_all)]
pub async fn logout(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    if let Some(cookie) = req.cookie(&state.session.cookie_name) {
        let token = cookie.value();
        if let Ok(claims) = state.auth_handler.verify_session(token) {
            let remaining = (claims.exp as i64 - Utc::now().timestamp()).max(1) as u64;
            if let Err(e) = state.revoke_session(token, remaining).await {
                tracing::warn!("Could not revoke session: {}", e);
            }
            tracing::info!(user = %claims.username, "User logged out");
        }
    }

    let mut removal = session_cookie(&state, String::new(), 0);
    removal.make_removal();

    HttpResponse::Found()
        .cookie(removal)
        .insert_header((header::LOCATION, "/"))
        .finish()
}
