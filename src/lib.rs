use std::sync::Arc;

mod domain;
mod infrastructure;
mod interfaces;
pub mod background_task;
pub mod constants;
pub mod errors;
pub mod graceful_shutdown;
pub mod settings;

pub use domain::{entities, html_md, navigation, observable, ordering, slug, use_cases, validation};
pub use infrastructure::{cache, db, storage, utils};
pub use interfaces::{handlers, repositories, routes};

use cache::CollectionCache;
use repositories::sqlx_repo::{
    SqlxBlogPostRepo, SqlxCommentRepo, SqlxContactRepo, SqlxMediaRepo, SqlxProfileRepo,
    SqlxProjectRepo, SqlxResumeRepo, SqlxTaxonomyRepo, SqlxUserRepo,
};
use storage::DiskStorage;
use use_cases::{
    blog::BlogPostHandler, comment::CommentHandler, contact::ContactHandler,
    media::MediaHandler, profile::ProfileHandler, project::ProjectHandler,
    resume::ResumeHandler, taxonomy::TaxonomyHandler, user::UserHandler,
};

pub struct AppState {
    pub blog_handler: BlogPostHandler<SqlxBlogPostRepo>,
    pub taxonomy_handler: TaxonomyHandler<SqlxTaxonomyRepo>,
    pub comment_handler: CommentHandler<SqlxCommentRepo>,
    pub project_handler: ProjectHandler<SqlxProjectRepo, SqlxMediaRepo>,
    pub resume_handler: ResumeHandler<SqlxResumeRepo>,
    pub profile_handler: ProfileHandler<SqlxProfileRepo>,
    pub contact_handler: ContactHandler<SqlxContactRepo>,
    pub user_handler: UserHandler<SqlxUserRepo>,
    pub media_handler: MediaHandler<SqlxMediaRepo>,
    pub cache: Arc<CollectionCache>,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        // One cache shared by every handler so any mutation can drop the
        // cached collections of its section.
        let cache = Arc::new(CollectionCache::new());
        let disk_storage = Arc::new(DiskStorage::new(config));

        AppState {
            blog_handler: BlogPostHandler::new(
                SqlxBlogPostRepo::new(pool.clone()),
                cache.clone(),
            ),
            taxonomy_handler: TaxonomyHandler::new(
                SqlxTaxonomyRepo::new(pool.clone()),
                cache.clone(),
            ),
            comment_handler: CommentHandler::new(
                SqlxCommentRepo::new(pool.clone()),
                cache.clone(),
            ),
            project_handler: ProjectHandler::new(
                SqlxProjectRepo::new(pool.clone()),
                SqlxMediaRepo::new(pool.clone()),
                cache.clone(),
            ),
            resume_handler: ResumeHandler::new(SqlxResumeRepo::new(pool.clone()), cache.clone()),
            profile_handler: ProfileHandler::new(
                SqlxProfileRepo::new(pool.clone()),
                cache.clone(),
            ),
            contact_handler: ContactHandler::new(
                SqlxContactRepo::new(pool.clone()),
                cache.clone(),
            ),
            user_handler: UserHandler::new(SqlxUserRepo::new(pool.clone()), cache.clone()),
            media_handler: MediaHandler::new(
                SqlxMediaRepo::new(pool),
                disk_storage,
                cache.clone(),
            ),
            cache,
        }
    }
}
