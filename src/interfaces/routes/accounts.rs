use actix_web::web;

use crate::handlers::accounts;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/accounts")
            .service(
                web::resource("/login/")
                    .route(web::get().to(accounts::login_form))
                    .route(web::post().to(accounts::login))
            )
            .service(
                web::resource("/logout/")
                    .route(web::get().to(accounts::logout))
                    .route(web::post().to(accounts::logout))
            )
    );
}
