use actix_web::web;

use crate::handlers::contact;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/contact")
            .service(
                web::resource("")
                    .route(web::post().to(contact::submit_message))
                    .route(web::get().to(contact::list_messages)),
            )
            .service(
                web::resource("/{message_id}")
                    .route(web::get().to(contact::read_message))
                    .route(web::delete().to(contact::delete_message)),
            ),
    );
}
