use actix_web::web;

use crate::{
    entities::{
        cv::CvResource, education::Education, experience::Experience, interest::Interest,
        skill::Skill,
    },
    handlers::cv,
};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cv")
            .service(
                web::resource("/")
                    .route(web::get().to(cv::show_cv))
                    .route(web::head().to(cv::show_cv))
            )
            .configure(resource_routes::<Education>)
            .configure(resource_routes::<Skill>)
            .configure(resource_routes::<Experience>)
            .configure(resource_routes::<Interest>)
    );
}

/// new, edit and remove pages for one CV record type.
fn resource_routes<E: CvResource>(cfg: &mut web::ServiceConfig) {
    let slug = E::KIND.slug();

    cfg.service(
        web::resource(format!("/{}/new/", slug))
            .route(web::get().to(cv::new_entry_form::<E>))
            .route(web::post().to(cv::create_entry::<E>))
    )
    .service(
        web::resource(format!("/{}/{{id}}/edit/", slug))
            .route(web::get().to(cv::edit_entry_form::<E>))
            .route(web::post().to(cv::update_entry::<E>))
    )
    .service(
        web::resource(format!("/{}/{{id}}/remove/", slug))
            .route(web::get().to(cv::remove_entry::<E>))
    );
}
