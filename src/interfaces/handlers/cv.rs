use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::{
    entities::{cv::CvResource, form::FormErrors},
    errors::AppError,
    handlers::responses::{ok_html, redirect},
    templates::{cv::cv_page, forms::edit_page, layout::Page},
    use_cases::extractors::{OptionalSession, SessionUser},
    AppState,
};

const CV_URL: &str = "/cv/";

fn render_entry_form<E: CvResource>(
    state: &AppState,
    session: &SessionUser,
    verb: &str,
    form: &E::Form,
    errors: FormErrors,
) -> HttpResponse {
    let heading = format!("{} {}", verb, E::KIND.heading());
    let page = Page::new(&state.site, Some(&session.0));
    ok_html(page.render(&edit_page(&E::KIND.template(), &heading, form, &errors)))
}

#[instrument(skip_all)]
pub async fn show_cv(
    session: OptionalSession,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let overview = state.cv_handler.overview().await?;

    let page = Page::new(&state.site, session.0.as_ref());
    Ok(ok_html(cv_page(&page, &overview)))
}

#[instrument(skip_all, fields(kind = E::KIND.slug()))]
pub async fn new_entry_form<E: CvResource>(session: SessionUser, state: web::Data<AppState>) -> HttpResponse {
    render_entry_form::<E>(&state, &session, "New", &E::initial_form(), FormErrors::default())
}

#[instrument(skip_all, fields(kind = E::KIND.slug()))]
pub async fn create_entry<E: CvResource>(
    session: SessionUser,
    state: web::Data<AppState>,
    form: web::Form<E::Form>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();

    match state.cv_handler.create::<E>(form.clone()).await {
        Ok(_) => Ok(redirect(CV_URL)),
        Err(AppError::ValidationError(errors)) => {
            Ok(render_entry_form::<E>(&state, &session, "New", &form, FormErrors::new(errors)))
        }
        Err(e) => Err(e),
    }
}

#[instrument(skip_all, fields(kind = E::KIND.slug(), id = *id))]
pub async fn edit_entry_form<E: CvResource>(
    id: web::Path<i64>,
    session: SessionUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let record = state.cv_handler.get::<E>(id.into_inner()).await?;
    Ok(render_entry_form::<E>(&state, &session, "Edit", &record.to_form(), FormErrors::default()))
}

#[instrument(skip_all, fields(kind = E::KIND.slug(), id = *id))]
pub async fn update_entry<E: CvResource>(
    id: web::Path<i64>,
    session: SessionUser,
    state: web::Data<AppState>,
    form: web::Form<E::Form>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();

    match state.cv_handler.update::<E>(id.into_inner(), form.clone()).await {
        Ok(_) => Ok(redirect(CV_URL)),
        Err(AppError::ValidationError(errors)) => {
            Ok(render_entry_form::<E>(&state, &session, "Edit", &form, FormErrors::new(errors)))
        }
        Err(e) => Err(e),
    }
}

#[instrument(skip_all, fields(kind = E::KIND.slug(), id = *id))]
pub async fn remove_entry<E: CvResource>(
    id: web::Path<i64>,
    _session: SessionUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    state.cv_handler.remove::<E>(id.into_inner()).await?;
    Ok(redirect(CV_URL))
}
