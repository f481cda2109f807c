use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::{
    entities::{form::FormErrors, post::PostForm},
    errors::AppError,
    handlers::responses::{ok_html, redirect},
    templates::{blog, forms::edit_page, layout::Page},
    use_cases::extractors::{OptionalSession, SessionUser},
    AppState,
};

const POST_TEMPLATE: &str = "blog/post_edit.html";

fn post_url(id: i64) -> String {
    format!("/blog/post/{}/", id)
}

fn render_post_form(state: &AppState, session: &SessionUser, heading: &str, form: &PostForm, errors: FormErrors) -> HttpResponse {
    let page = Page::new(&state.site, Some(&session.0));
    ok_html(page.render(&edit_page(POST_TEMPLATE, heading, form, &errors)))
}

#[instrument(skip_all)]
pub async fn post_list(
    session: OptionalSession,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let posts = state.blog_handler.list_published().await?;

    let page = Page::new(&state.site, session.0.as_ref());
    Ok(ok_html(blog::post_list(&page, &posts, false)))
}

#[instrument(skip_all)]
pub async fn post_draft_list(
    session: SessionUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let drafts = state.blog_handler.list_drafts().await?;

    let page = Page::new(&state.site, Some(&session.0));
    Ok(ok_html(blog::post_list(&page, &drafts, true)))
}

#[instrument(skip_all, fields(post_id = *post_id))]
pub async fn post_detail(
    post_id: web::Path<i64>,
    session: OptionalSession,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let detail = state
        .blog_handler
        .post_detail(post_id.into_inner(), session.is_authenticated())
        .await?;

    let page = Page::new(&state.site, session.0.as_ref());
    Ok(ok_html(blog::post_detail(&page, &detail)))
}

#[instrument(skip_all)]
pub async fn post_new_form(session: SessionUser, state: web::Data<AppState>) -> HttpResponse {
    render_post_form(&state, &session, "New Post", &PostForm::default(), FormErrors::default())
}

#[instrument(skip_all, fields(user = %session.0.username))]
pub async fn post_new(
    session: SessionUser,
    state: web::Data<AppState>,
    form: web::Form<PostForm>,
) -> Result<HttpResponse, AppError> {
    let author_id = session.0.user_id()?;
    let form = form.into_inner();

    match state.blog_handler.create_post(author_id, form.clone()).await {
        Ok(post) => Ok(redirect(post_url(post.id))),
        Err(AppError::ValidationError(errors)) => {
            Ok(render_post_form(&state, &session, "New Post", &form, FormErrors::new(errors)))
        }
        Err(e) => Err(e),
    }
}

#[instrument(skip_all, fields(post_id = *post_id))]
pub async fn post_edit_form(
    post_id: web::Path<i64>,
    session: SessionUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let post = state.blog_handler.get_post(post_id.into_inner()).await?;
    Ok(render_post_form(&state, &session, "Edit Post", &post.to_form(), FormErrors::default()))
}

#[instrument(skip_all, fields(post_id = *post_id))]
pub async fn post_edit(
    post_id: web::Path<i64>,
    session: SessionUser,
    state: web::Data<AppState>,
    form: web::Form<PostForm>,
) -> Result<HttpResponse, AppError> {
    let id = post_id.into_inner();
    let form = form.into_inner();

    match state.blog_handler.update_post(id, form.clone()).await {
        Ok(post) => Ok(redirect(post_url(post.id))),
        Err(AppError::ValidationError(errors)) => {
            Ok(render_post_form(&state, &session, "Edit Post", &form, FormErrors::new(errors)))
        }
        Err(e) => Err(e),
    }
}

#[instrument(skip_all, fields(post_id = *post_id))]
pub async fn post_publish(
    post_id: web::Path<i64>,
    _session: SessionUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let post = state.blog_handler.publish_post(post_id.into_inner()).await?;
    Ok(redirect(post_url(post.id)))
}

#[instrument(skip_all, fields(post_id = *post_id))]
pub async fn post_remove(
    post_id: web::Path<i64>,
    _session: SessionUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    state.blog_handler.delete_post(post_id.into_inner()).await?;
    Ok(redirect("/blog/"))
}
