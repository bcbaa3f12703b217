use actix_web::web;

use crate::handlers::{blog_posts, comments, taxonomy};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/blog/posts")
            .service(
                web::resource("")
                    .route(web::post().to(blog_posts::create_blog_post))
                    .route(web::get().to(blog_posts::list_blog_posts)),
            )
            .service(
                web::resource("/{post_id}")
                    .route(web::get().to(blog_posts::get_blog_post))
                    .route(web::patch().to(blog_posts::update_blog_post))
                    .route(web::delete().to(blog_posts::delete_blog_post)),
            )
            .service(
                web::resource("/{post_id}/status")
                    .route(web::post().to(blog_posts::set_blog_post_status)),
            )
            .service(
                web::resource("/{post_id}/comments")
                    .route(web::post().to(comments::submit_comment))
                    .route(web::get().to(comments::list_comments)),
            ),
    );

    cfg.service(
        web::scope("/blog/comments").service(
            web::resource("/{comment_id}")
                .route(web::patch().to(comments::moderate_comment))
                .route(web::delete().to(comments::delete_comment)),
        ),
    );

    cfg.service(
        web::scope("/blog/categories")
            .service(
                web::resource("")
                    .route(web::post().to(taxonomy::create_category))
                    .route(web::get().to(taxonomy::list_categories)),
            )
            .service(
                web::resource("/{category_id}")
                    .route(web::patch().to(taxonomy::update_category))
                    .route(web::delete().to(taxonomy::delete_category)),
            ),
    );

    cfg.service(
        web::scope("/blog/tags")
            .service(
                web::resource("")
                    .route(web::post().to(taxonomy::create_tag))
                    .route(web::get().to(taxonomy::list_tags)),
            )
            .service(
                web::resource("/{tag_id}")
                    .route(web::patch().to(taxonomy::update_tag))
                    .route(web::delete().to(taxonomy::delete_tag)),
            ),
    );
}
