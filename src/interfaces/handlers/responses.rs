use actix_web::{
    http::{header, StatusCode},
    web, HttpResponse,
};

use crate::{templates::errors::error_page, AppState};

pub fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(header::ContentType::html())
        .body(body)
}

pub fn ok_html(body: String) -> HttpResponse {
    html(StatusCode::OK, body)
}

/// 302 to `location`.
pub fn redirect(location: impl AsRef<str>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.as_ref()))
        .finish()
}

/// Default service for unknown routes.
pub async fn not_found(state: web::Data<AppState>) -> HttpResponse {
    html(
        StatusCode::NOT_FOUND,
        error_page(&state.site, StatusCode::NOT_FOUND, "The page you were looking for does not exist."),
    )
}

/// Only same-site relative paths are followed after login.
/// Control characters would make an invalid `Location` header.
pub fn safe_next(next: &str) -> &str {
    let relative = next.starts_with('/') && !next.starts_with("//") && !next.contains('\\');
    if relative && !next.chars().any(char::is_control) { next } else { "/" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_must_be_a_local_path() {
        assert_eq!(safe_next("/cv/skill/new/"), "/cv/skill/new/");
        assert_eq!(safe_next(""), "/");
        assert_eq!(safe_next("https://evil.example/"), "/");
        assert_eq!(safe_next("//evil.example/"), "/");
        assert_eq!(safe_next("/\\evil.example"), "/");
        assert_eq!(safe_next("/blog/\r\nX-Evil: 1"), "/");
        assert_eq!(safe_next("/blog/\t"), "/");
    }

    #[test]
    fn redirect_is_found_with_location() {
        let response = redirect("/blog/");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/blog/");
    }
}
