use actix_web::web;

use crate::handlers::home::home;

mod accounts;
mod blog;
mod cv;
mod extractor_errors;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .route(web::get().to(home))
            .route(web::head().to(home))
    );

    cfg.configure(extractor_errors::config_routes)
        .configure(blog::config_routes)
        .configure(cv::config_routes)
        .configure(accounts::config_routes);
}
