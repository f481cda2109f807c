use actix_web::{web, HttpRequest, HttpResponse};
use tracing::instrument;

use crate::{
    entities::{comment::CommentForm, form::FormErrors},
    errors::AppError,
    handlers::responses::{ok_html, redirect},
    templates::{forms::edit_page, layout::Page},
    use_cases::extractors::{OptionalSession, SessionUser},
    AppState,
};

const COMMENT_TEMPLATE: &str = "blog/add_comment_to_post.html";
const COMMENT_HEADING: &str = "New comment";

fn post_url(post_id: i64) -> String {
    format!("/blog/post/{}/", post_id)
}

fn render_comment_form(state: &AppState, session: &OptionalSession, form: &CommentForm, errors: FormErrors) -> HttpResponse {
    let page = Page::new(&state.site, session.0.as_ref());
    ok_html(page.render(&edit_page(COMMENT_TEMPLATE, COMMENT_HEADING, form, &errors)))
}

#[instrument(skip_all, fields(post_id = *post_id))]
pub async fn add_comment_form(
    post_id: web::Path<i64>,
    session: OptionalSession,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    state.blog_handler.get_post(post_id.into_inner()).await?;
    Ok(render_comment_form(&state, &session, &CommentForm::default(), FormErrors::default()))
}

#[instrument(skip_all, fields(post_id = *post_id))]
pub async fn add_comment(
    req: HttpRequest,
    post_id: web::Path<i64>,
    session: OptionalSession,
    state: web::Data<AppState>,
    form: web::Form<CommentForm>,
) -> Result<HttpResponse, AppError> {
    state.throttle(&req, "comment")?;

    let post_id = post_id.into_inner();
    let form = form.into_inner();

    match state.blog_handler.add_comment(post_id, form.clone()).await {
        Ok(comment) => {
            tracing::info!(comment_id = comment.id, "Comment awaiting approval");
            Ok(redirect(post_url(post_id)))
        }
        Err(AppError::ValidationError(errors)) => {
            Ok(render_comment_form(&state, &session, &form, FormErrors::new(errors)))
        }
        Err(e) => Err(e),
    }
}

#[instrument(skip_all, fields(comment_id = *comment_id))]
pub async fn comment_approve(
    comment_id: web::Path<i64>,
    _session: SessionUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let comment = state.blog_handler.approve_comment(comment_id.into_inner()).await?;
    Ok(redirect(post_url(comment.post_id)))
}

#[instrument(skip_all, fields(comment_id = *comment_id))]
pub async fn comment_remove(
    comment_id: web::Path<i64>,
    _session: SessionUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let comment = state.blog_handler.remove_comment(comment_id.into_inner()).await?;
    Ok(redirect(post_url(comment.post_id)))
}
