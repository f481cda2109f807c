use actix_web::{
    error::{InternalError, PathError, UrlencodedError},
    http::StatusCode,
    web, HttpRequest,
};

use crate::{
    errors::AppError,
    handlers::responses::html,
    settings::SiteConfig,
    templates::errors::error_page,
    AppState,
};

/// Malformed form bodies get an HTML 400 and non-numeric ids a 404,
/// instead of actix's plain-text defaults.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().error_handler(form_error))
        .app_data(web::PathConfig::default().error_handler(path_error));
}

fn form_error(err: UrlencodedError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!("Rejected form body: {}", err);

    let fallback = SiteConfig::default();
    let state = req.app_data::<web::Data<AppState>>();
    let site = state.map(|s| &s.site).unwrap_or(&fallback);

    let body = error_page(site, StatusCode::BAD_REQUEST, "The submitted form could not be read.");
    InternalError::from_response(err, html(StatusCode::BAD_REQUEST, body)).into()
}

fn path_error(err: PathError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(path = req.path(), "Unmatched path parameter: {}", err);
    AppError::NotFound("The page you were looking for does not exist.".into()).into()
}
