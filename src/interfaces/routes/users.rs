use actix_web::web;

use crate::handlers::users;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .service(
                web::resource("")
                    .route(web::post().to(users::create_user))
                    .route(web::get().to(users::list_users)),
            )
            .service(
                web::resource("/{user_id}")
                    .route(web::get().to(users::get_user))
                    .route(web::delete().to(users::delete_user)),
            )
            .service(
                web::resource("/{user_id}/roles")
                    .route(web::put().to(users::assign_roles)),
            ),
    );

    cfg.service(
        web::scope("/roles").service(
            web::resource("")
                .route(web::post().to(users::create_role))
                .route(web::get().to(users::list_roles)),
        ),
    );
}
