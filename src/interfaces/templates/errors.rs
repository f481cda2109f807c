use actix_web::http::StatusCode;

use crate::{interfaces::templates::layout::Page, settings::SiteConfig, utils::markdown::escape};

/// A full error document, rendered without session context.
pub fn error_page(site: &SiteConfig, status: StatusCode, message: &str) -> String {
    Page::anonymous(site).render(&format!(
        r#"<div class="error-page text-center">
<h1>{code}</h1>
<h3>{reason}</h3>
<p>{message}</p>
<a class="btn btn-outline-dark" href="/">Back home</a>
</div>"#,
        code = status.as_u16(),
        reason = status.canonical_reason().unwrap_or("Error"),
        message = escape(message),
    ))
}
