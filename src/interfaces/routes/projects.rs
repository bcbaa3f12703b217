use actix_web::web;

use crate::handlers::projects;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/projects")
            .service(
                web::resource("")
                    .route(web::post().to(projects::create_project))
                    .route(web::get().to(projects::list_projects)),
            )
            .service(
                web::resource("/{project_id}")
                    .route(web::get().to(projects::get_project))
                    .route(web::patch().to(projects::update_project))
                    .route(web::delete().to(projects::delete_project)),
            )
            .service(
                web::resource("/{project_id}/status")
                    .route(web::post().to(projects::set_project_status)),
            )
            .service(
                web::resource("/{project_id}/images")
                    .route(web::post().to(projects::attach_image)),
            )
            .service(
                web::resource("/{project_id}/images/move")
                    .route(web::post().to(projects::move_image)),
            )
            .service(
                web::resource("/{project_id}/images/reorder")
                    .route(web::post().to(projects::reorder_images)),
            )
            .service(
                web::resource("/{project_id}/images/{image_id}")
                    .route(web::delete().to(projects::remove_image)),
            ),
    );
}
