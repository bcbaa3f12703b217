use actix_web::web;

use crate::handlers::{home::home, system::health_check};

mod admin;
mod blog;
mod contact;
mod json_error;
mod media;
mod profile;
mod projects;
mod resume;
mod users;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(health_check);

    cfg.service(
        web::scope("/api/v1")
            .configure(blog::config_routes)
            .configure(projects::config_routes)
            .configure(resume::config_routes)
            .configure(profile::config_routes)
            .configure(contact::config_routes)
            .configure(users::config_routes)
            .configure(media::config_routes)
            .configure(admin::config_routes),
    );

    cfg.configure(json_error::config_routes);
}
