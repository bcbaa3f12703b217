use actix_web::web;

use crate::handlers::resume;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/skills")
            .service(
                web::resource("")
                    .route(web::post().to(resume::create_skill))
                    .route(web::get().to(resume::list_skills)),
            )
            .service(
                web::resource("/{skill_id}")
                    .route(web::patch().to(resume::update_skill))
                    .route(web::delete().to(resume::delete_skill)),
            ),
    );

    cfg.service(
        web::scope("/experience")
            .service(
                web::resource("")
                    .route(web::post().to(resume::create_experience))
                    .route(web::get().to(resume::list_experience)),
            )
            .service(
                web::resource("/{entry_id}")
                    .route(web::patch().to(resume::update_experience))
                    .route(web::delete().to(resume::delete_experience)),
            ),
    );

    cfg.service(
        web::scope("/education")
            .service(
                web::resource("")
                    .route(web::post().to(resume::create_education))
                    .route(web::get().to(resume::list_education)),
            )
            .service(
                web::resource("/{entry_id}")
                    .route(web::patch().to(resume::update_education))
                    .route(web::delete().to(resume::delete_education)),
            ),
    );
}
