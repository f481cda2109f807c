use actix_web::web;

use crate::handlers::{blog_posts, comments};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/blog")
            .service(
                web::resource("/")
                    .route(web::get().to(blog_posts::post_list))
                    .route(web::head().to(blog_posts::post_list))
            )
            .service(
                web::resource("/drafts/")
                    .route(web::get().to(blog_posts::post_draft_list))
            )
            .service(
                web::resource("/post/new/")
                    .route(web::get().to(blog_posts::post_new_form))
                    .route(web::post().to(blog_posts::post_new))
            )
            .service(
                web::resource("/post/{post_id}/")
                    .route(web::get().to(blog_posts::post_detail))
                    .route(web::head().to(blog_posts::post_detail))
            )
            .service(
                web::resource("/post/{post_id}/edit/")
                    .route(web::get().to(blog_posts::post_edit_form))
                    .route(web::post().to(blog_posts::post_edit))
            )
            .service(
                web::resource("/post/{post_id}/publish/")
                    .route(web::post().to(blog_posts::post_publish))
            )
            .service(
                web::resource("/post/{post_id}/remove/")
                    .route(web::get().to(blog_posts::post_remove))
            )
            .service(
                web::resource("/post/{post_id}/comment/")
                    .route(web::get().to(comments::add_comment_form))
                    .route(web::post().to(comments::add_comment))
            )
            .service(
                web::resource("/comment/{comment_id}/approve/")
                    .route(web::post().to(comments::comment_approve))
            )
            .service(
                web::resource("/comment/{comment_id}/remove/")
                    .route(web::get().to(comments::comment_remove))
            )
    );
}
