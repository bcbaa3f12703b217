use actix_web::web;

use crate::handlers::{convert, navigation};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(
                web::resource("/navigation/resolve")
                    .route(web::get().to(navigation::resolve_admin_path)),
            )
            .service(
                web::resource("/convert/markdown")
                    .route(web::post().to(convert::convert_html_to_markdown)),
            ),
    );
}
