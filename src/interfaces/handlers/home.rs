use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::{
    handlers::responses::ok_html,
    templates::{home::home_page, layout::Page},
    use_cases::extractors::OptionalSession,
    AppState,
};

#[instrument(skip_all)]
pub async fn home(session: OptionalSession, state: web::Data<AppState>) -> HttpResponse {
    let page = Page::new(&state.site, session.0.as_ref());
    ok_html(home_page(&page))
}
